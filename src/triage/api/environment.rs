//! 目标环境与基础地址

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PROD_BASE_URL: &str = "https://api.prod.polly.io";
pub const STAGE_BASE_URL: &str = "https://api.stage.polly.io";

/// 可选的 API 环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    #[default]
    Stage,
}

impl Environment {
    /// 解析环境名称，未知名称一律回落到 stage
    pub fn parse_or_stage(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "prod" => Environment::Prod,
            _ => Environment::Stage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Stage => "stage",
        }
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Environment::parse_or_stage(s))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 环境 -> 基础地址 映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    pub prod: String,
    pub stage: String,
}

impl BaseUrls {
    pub fn new(prod: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            prod: prod.into(),
            stage: stage.into(),
        }
    }

    pub fn for_env(&self, environment: Environment) -> &str {
        match environment {
            Environment::Prod => &self.prod,
            Environment::Stage => &self.stage,
        }
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self::new(PROD_BASE_URL, STAGE_BASE_URL)
    }
}
