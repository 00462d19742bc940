//! 组件标记定义
//!
//! 提供组件发现使用的标记类型，标记列表是封闭的

use serde::{Deserialize, Serialize};

/// 组件标记类型
///
/// 对应组件声明上的标记注解。除 [`MarkerKind::Component`] 外，
/// 每个标记自身都带有 `Component` 元标记，元标记只允许一层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// 基础组件标记
    Component,
    /// 服务组件标记
    Service,
    /// 大模型提供者标记
    LlmProvider,
    /// 存储提供者标记
    StorageProvider,
    /// 向量化提供者标记
    EmbeddingProvider,
    /// 工具提供者标记
    ToolProvider,
}

impl MarkerKind {
    /// 所有已识别的标记
    pub const fn all() -> &'static [MarkerKind] {
        &[
            MarkerKind::Component,
            MarkerKind::Service,
            MarkerKind::LlmProvider,
            MarkerKind::StorageProvider,
            MarkerKind::EmbeddingProvider,
            MarkerKind::ToolProvider,
        ]
    }

    /// 提供者类别标记列表
    pub const fn provider_markers() -> &'static [MarkerKind] {
        &[
            MarkerKind::LlmProvider,
            MarkerKind::StorageProvider,
            MarkerKind::EmbeddingProvider,
            MarkerKind::ToolProvider,
        ]
    }

    /// 获取此标记的元标记
    ///
    /// 派生标记都以 `Component` 作为元标记，`Component` 自身没有元标记。
    pub const fn implied_by(self) -> Option<MarkerKind> {
        match self {
            MarkerKind::Component => None,
            _ => Some(MarkerKind::Component),
        }
    }

    /// 检查此标记在按 `base` 扫描时是否命中
    ///
    /// 直接匹配，或通过一层元标记间接匹配。
    pub fn matches(self, base: MarkerKind) -> bool {
        self == base || self.implied_by() == Some(base)
    }

    /// 获取提供者类别名称
    ///
    /// 核心标记返回 `None`。
    pub const fn category(self) -> Option<&'static str> {
        match self {
            MarkerKind::Component | MarkerKind::Service => None,
            MarkerKind::LlmProvider => Some("llm"),
            MarkerKind::StorageProvider => Some("storage"),
            MarkerKind::EmbeddingProvider => Some("embedding"),
            MarkerKind::ToolProvider => Some("tool"),
        }
    }

    /// 检查是否为提供者类别标记
    pub const fn is_provider(self) -> bool {
        self.category().is_some()
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MarkerKind::Component => "Component",
            MarkerKind::Service => "Service",
            MarkerKind::LlmProvider => "LlmProvider",
            MarkerKind::StorageProvider => "StorageProvider",
            MarkerKind::EmbeddingProvider => "EmbeddingProvider",
            MarkerKind::ToolProvider => "ToolProvider",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for MarkerKind {
    type Err = crate::errors::DescriptorLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Component" | "component" => Ok(MarkerKind::Component),
            "Service" | "service" => Ok(MarkerKind::Service),
            "LlmProvider" | "llm_provider" => Ok(MarkerKind::LlmProvider),
            "StorageProvider" | "storage_provider" => Ok(MarkerKind::StorageProvider),
            "EmbeddingProvider" | "embedding_provider" => Ok(MarkerKind::EmbeddingProvider),
            "ToolProvider" | "tool_provider" => Ok(MarkerKind::ToolProvider),
            _ => Err(crate::errors::DescriptorLoadError::Invalid {
                message: format!("未知的组件标记: {}", s),
            }),
        }
    }
}
