//! 워크로드 로그 생성기
//!
//! 오프셋(재생 시작부터의 초)이 붙은 재현 가능한 요청 시퀀스를 만들고,
//! 한 줄에 JSON 객체 하나로 직렬화합니다:
//!
//! ```text
//! {"offset":0,"op":"index","target":"foo","body":{"message":"lazy dog","metric":{"sum":311}}}
//! {"offset":2,"op":"search","target":"foo*"}
//! ```

use std::io::Write;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EmitterError;
use crate::operation::{OpMix, Operation, OperationFactory};

/// 워크로드 로그 한 줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 재생 시작부터의 초
    pub offset: u64,
    #[serde(flatten)]
    pub operation: Operation,
}

/// 생성기 파라미터
///
/// 다음 조건이 참인 동안 생성합니다:
/// `(max_count == 0 || count < max_count) && (max_offset_seconds == 0 || offset < max_offset_seconds)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub start_offset_seconds: u64,
    /// 최대 레코드 수 (0 = 무제한)
    pub max_count: u64,
    /// 오프셋 상한, 미포함 (0 = 무제한)
    pub max_offset_seconds: u64,
    pub min_interval_seconds: u64,
    pub max_interval_seconds: u64,
    pub index_to_search_ratio: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_offset_seconds: 0,
            max_count: 1200,
            max_offset_seconds: 3500,
            min_interval_seconds: 0,
            max_interval_seconds: 3,
            index_to_search_ratio: 4,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), EmitterError> {
        if self.max_count == 0 && self.max_offset_seconds == 0 {
            return Err(EmitterError::Config {
                field: "max_count".to_owned(),
                reason: "max_count and max_offset_seconds cannot both be 0".to_owned(),
            });
        }
        if self.min_interval_seconds > self.max_interval_seconds {
            return Err(EmitterError::Config {
                field: "max_interval_seconds".to_owned(),
                reason: format!(
                    "must be >= min_interval_seconds ({})",
                    self.min_interval_seconds
                ),
            });
        }
        // 오프셋이 max_offset_seconds를 넘지 못함
        if self.max_count == 0 && self.max_interval_seconds == 0 {
            return Err(EmitterError::Config {
                field: "max_interval_seconds".to_owned(),
                reason: "must be > 0 when only max_offset_seconds bounds generation".to_owned(),
            });
        }
        Ok(())
    }

    fn keep_generating(&self, offset: u64, count: u64) -> bool {
        (self.max_count == 0 || count < self.max_count)
            && (self.max_offset_seconds == 0 || offset < self.max_offset_seconds)
    }
}

/// 검증된 [`GeneratorConfig`] 기반 로그 생성기
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    mix: OpMix,
    factory: OperationFactory,
}

impl Generator {
    /// 생성기를 만듭니다. 사용할 수 없는 상한은 거부합니다.
    pub fn new(config: GeneratorConfig) -> Result<Self, EmitterError> {
        config.validate()?;
        Ok(Self {
            config,
            mix: OpMix::new(config.index_to_search_ratio),
            factory: OperationFactory::default(),
        })
    }

    /// 기본 `foo*` / `foo` 대상을 교체합니다.
    pub fn with_factory(mut self, factory: OperationFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// `rng`로 레코드를 지연 생성합니다.
    pub fn records<'a, R: Rng + ?Sized>(&'a self, rng: &'a mut R) -> Records<'a, R> {
        Records {
            generator: self,
            rng,
            offset: self.config.start_offset_seconds,
            count: 0,
        }
    }

    /// 모든 레코드를 JSON 한 줄씩 쓰고 쓴 개수를 반환합니다.
    pub fn write_jsonl<R: Rng + ?Sized, W: Write>(
        &self,
        rng: &mut R,
        mut out: W,
    ) -> Result<u64, EmitterError> {
        let mut written = 0;
        for record in self.records(rng) {
            serde_json::to_writer(&mut out, &record).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }
}

/// [`Generator::records`]가 반환하는 iterator
pub struct Records<'a, R: ?Sized> {
    generator: &'a Generator,
    rng: &'a mut R,
    offset: u64,
    count: u64,
}

impl<R: Rng + ?Sized> Iterator for Records<'_, R> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        let config = &self.generator.config;
        if !config.keep_generating(self.offset, self.count) {
            return None;
        }

        let operation = self.generator.factory.draw(&self.generator.mix, &mut *self.rng);
        let record = LogRecord {
            offset: self.offset,
            operation,
        };

        let interval = self
            .rng
            .gen_range(config.min_interval_seconds..=config.max_interval_seconds);
        self.offset += interval;
        self.count += 1;
        Some(record)
    }
}
