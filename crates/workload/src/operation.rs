//! 요청과 무작위 요청 혼합
//!
//! 혼합은 `1 + ratio`개 항목의 가상 주머니입니다. `search` 하나와 `index`
//! `ratio`개이므로 `P(index) = ratio / (1 + ratio)`입니다.

use std::fmt;

use golden_core::config::WorkloadConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const MESSAGES: [&str; 3] = ["the quick brown fox", "jumped over the", "lazy dog"];
const METRIC_KEYS: [&str; 2] = ["count", "sum"];

/// 배포로 보내는 요청 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Search,
    Index,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 배포 데이터 엔드포인트 요청 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OpKind,
    /// 인덱스(`index`) 또는 인덱스 패턴(`search`)
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// index/search 비율에 따라 요청 종류를 추출합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpMix {
    index_to_search_ratio: u32,
}

impl OpMix {
    pub fn new(index_to_search_ratio: u32) -> Self {
        Self {
            index_to_search_ratio,
        }
    }

    /// `1 + ratio` 주머니에서 균등 추출합니다. 0번 칸이 `search`입니다.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> OpKind {
        if rng.gen_range(0..=self.index_to_search_ratio) == 0 {
            OpKind::Search
        } else {
            OpKind::Index
        }
    }

    /// `index` 추출의 기대 비율
    pub fn index_fraction(&self) -> f64 {
        let ratio = f64::from(self.index_to_search_ratio);
        ratio / (1.0 + ratio)
    }
}

/// 설정된 대상으로 구체적인 요청을 만듭니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFactory {
    search_target: String,
    index_target: String,
}

impl Default for OperationFactory {
    fn default() -> Self {
        Self::from_config(&WorkloadConfig::default())
    }
}

impl OperationFactory {
    pub fn from_config(config: &WorkloadConfig) -> Self {
        Self {
            search_target: config.search_target.clone(),
            index_target: config.index_target.clone(),
        }
    }

    /// `search`는 본문이 없고 `index`는 무작위 문서 하나를 담습니다.
    pub fn make<R: Rng + ?Sized>(&self, kind: OpKind, rng: &mut R) -> Operation {
        match kind {
            OpKind::Search => Operation {
                op: OpKind::Search,
                target: self.search_target.clone(),
                body: None,
            },
            OpKind::Index => Operation {
                op: OpKind::Index,
                target: self.index_target.clone(),
                body: Some(random_document(rng)),
            },
        }
    }

    /// `mix`에서 종류를 추출해 요청을 만듭니다.
    pub fn draw<R: Rng + ?Sized>(&self, mix: &OpMix, rng: &mut R) -> Operation {
        let kind = mix.pick(rng);
        self.make(kind, rng)
    }
}

/// `{"message": <phrase>, "metric": {<count|sum>: <0..523>}}`
pub fn random_document<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let message = MESSAGES.choose(rng).copied().unwrap_or(MESSAGES[0]);
    let key = METRIC_KEYS.choose(rng).copied().unwrap_or(METRIC_KEYS[0]);
    let value = (17 + rng.gen_range(0..10_000u32)) % 523;
    json!({ "message": message, "metric": { key: value } })
}
