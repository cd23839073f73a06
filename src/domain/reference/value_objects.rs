//! Reference Context - Value Objects

use serde::{Deserialize, Serialize};

/// 目标语言选项（代码 + 显示名称）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub code: String,
    pub name: String,
}

impl ReferenceOption {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// 参考数据加载状态: Loading -> Ready | Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceDataState {
    Loading,
    /// 保持服务端返回的顺序
    Ready(Vec<ReferenceOption>),
    Error(String),
}

impl ReferenceDataState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn options(&self) -> &[ReferenceOption] {
        match self {
            Self::Ready(options) => options,
            _ => &[],
        }
    }

    /// 第一个选项作为默认选择
    pub fn default_option(&self) -> Option<&ReferenceOption> {
        self.options().first()
    }

    pub fn find(&self, code: &str) -> Option<&ReferenceOption> {
        self.options().iter().find(|o| o.code == code)
    }

    /// 按代码解析显示名称；code 为 None 时回退到默认选项。空名称视为无法解析
    pub fn resolve_name(&self, code: Option<&str>) -> Option<&str> {
        let option = match code {
            Some(code) => self.find(code),
            None => self.default_option(),
        }?;
        let name = option.name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}
