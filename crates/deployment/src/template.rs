//! 배포 템플릿: 변수 선언, 기본값, 플레이스홀더 치환
//!
//! 템플릿 파일 위치: `{templates_dir}/{id}/setup/template.json`
//!
//! ```json
//! {
//!   "vars": { "region": { "type": "string", "default": "us-east-1" } },
//!   "template": { "region": "{{vars.region}}", "resources": { ... } }
//! }
//! ```
//!
//! 렌더링 순서:
//! 1. 오버라이드 변수가 모두 선언되어 있는지 검사
//! 2. 기본값 위에 오버라이드 병합
//! 3. `{{vars.NAME}}` 치환
//! 4. 결과의 `template` 객체를 배포 생성 요청으로 파싱

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use golden_core::scenario::DeploymentTemplate;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProvisionError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*vars\.([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// 템플릿 변수 선언
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VarSpec {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub default: Value,
}

#[derive(Debug, Deserialize)]
struct TemplateHeader {
    #[serde(default)]
    vars: BTreeMap<String, VarSpec>,
}

/// 로드된 템플릿 파일 (치환 전 원문 보관)
#[derive(Debug, Clone)]
pub struct TemplateFile {
    id: String,
    raw: String,
    vars: BTreeMap<String, VarSpec>,
}

impl TemplateFile {
    /// 템플릿 원문을 파싱합니다.
    pub fn parse(id: impl Into<String>, raw: impl Into<String>) -> Result<Self, ProvisionError> {
        let id = id.into();
        let raw = raw.into();
        // 플레이스홀더가 따옴표 밖에 있으면 원문은 JSON이 아니므로 헤더만 추출
        let header = extract_vars(&raw).map_err(|reason| ProvisionError::Template {
            id: id.clone(),
            reason,
        })?;
        Ok(Self {
            id,
            raw,
            vars: header.vars,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vars(&self) -> &BTreeMap<String, VarSpec> {
        &self.vars
    }

    /// 기본값 위에 오버라이드를 병합합니다.
    pub fn resolve_vars(
        &self,
        overrides: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, Value>, ProvisionError> {
        if let Some(name) = overrides.keys().find(|k| !self.vars.contains_key(*k)) {
            return Err(ProvisionError::UndefinedVariable {
                id: self.id.clone(),
                name: name.clone(),
            });
        }

        Ok(self
            .vars
            .iter()
            .map(|(name, spec)| {
                let value = overrides
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| spec.default.clone());
                (name.clone(), value)
            })
            .collect())
    }

    /// 변수를 치환하여 배포 생성 요청(`template` 객체)을 반환합니다.
    pub fn render(&self, overrides: &BTreeMap<String, Value>) -> Result<Value, ProvisionError> {
        let vars = self.resolve_vars(overrides)?;

        let mut missing = None;
        let rendered = PLACEHOLDER.replace_all(&self.raw, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => substitute(value),
                None => {
                    missing.get_or_insert_with(|| name.to_owned());
                    String::new()
                }
            }
        });
        if let Some(name) = missing {
            return Err(ProvisionError::UndefinedVariable {
                id: self.id.clone(),
                name,
            });
        }

        let mut doc: Value =
            serde_json::from_str(&rendered).map_err(|e| ProvisionError::Template {
                id: self.id.clone(),
                reason: format!("rendered template is not valid JSON: {e}"),
            })?;
        match doc.get_mut("template").map(Value::take) {
            Some(template @ Value::Object(_)) => Ok(template),
            _ => Err(ProvisionError::Template {
                id: self.id.clone(),
                reason: "missing 'template' object".to_owned(),
            }),
        }
    }
}

/// 문자열은 JSON 이스케이프된 본문만 (따옴표 안에 삽입), 그 외는 JSON 표현 그대로
fn substitute(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let quoted = Value::String(s.clone()).to_string();
            quoted[1..quoted.len() - 1].to_owned()
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 치환 전 원문에서 `vars` 선언만 파싱합니다.
fn extract_vars(raw: &str) -> Result<TemplateHeader, String> {
    // 따옴표 밖 플레이스홀더(숫자 등)를 임시 값으로 바꿔 JSON으로 읽을 수 있게 함
    let neutral = PLACEHOLDER.replace_all(raw, "0");
    serde_json::from_str(&neutral).map_err(|e| format!("invalid template file: {e}"))
}

/// 템플릿 디렉토리
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{id}/setup/template.json`
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(id).join("setup").join("template.json")
    }

    /// 템플릿 파일을 읽습니다.
    pub async fn load(&self, id: &str) -> Result<TemplateFile, ProvisionError> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(ProvisionError::Template {
                id: id.to_owned(),
                reason: "invalid template id".to_owned(),
            });
        }
        let path = self.path_for(id);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProvisionError::Template {
                id: id.to_owned(),
                reason: format!("{}: {e}", path.display()),
            })?;
        TemplateFile::parse(id, raw)
    }

    /// 시나리오의 템플릿 참조를 배포 생성 요청으로 렌더링합니다.
    pub async fn render(&self, template: &DeploymentTemplate) -> Result<Value, ProvisionError> {
        self.load(&template.id).await?.render(&template.vars)
    }
}
