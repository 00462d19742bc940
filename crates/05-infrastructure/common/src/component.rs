//! 组件基础接口定义
//!
//! 提供所有运行时组件必须实现的基础 trait 与组件描述符

use crate::conventions::NamingConventions;
use crate::marker::MarkerKind;
use crate::metadata::TypeInfo;
use std::collections::HashMap;
use std::fmt::Debug;

/// 组件基础 trait
///
/// 所有被运行时管理的组件都必须实现此 trait
pub trait Component: Send + Sync + Debug + 'static {
    /// 组件名称
    fn name(&self) -> &'static str;

    /// 组件优先级，数值越高优先级越高
    fn priority(&self) -> i32 {
        0
    }

    /// 组件是否启用
    fn is_enabled(&self) -> bool {
        true
    }
}

/// 组件描述符
///
/// 扫描阶段产生的声明性元数据，`(类别, 名称)` 在启用的描述符中必须唯一。
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 组件标记
    pub marker: MarkerKind,
    /// 组件名称
    pub name: String,
    /// 组件优先级
    pub priority: i32,
    /// 是否启用
    pub enabled: bool,
    /// 组件元数据
    pub metadata: HashMap<String, String>,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符，名称按命名约定推导
    pub fn new<T: 'static>(marker: MarkerKind) -> Self {
        let type_info = TypeInfo::of::<T>();
        let name = NamingConventions::default_component_name(&type_info);
        Self {
            type_info,
            marker,
            name,
            priority: 0,
            enabled: true,
            metadata: HashMap::new(),
        }
    }

    /// 设置组件名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 设置启用状态
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 获取提供者类别，非提供者组件返回 `None`
    pub fn category(&self) -> Option<&'static str> {
        self.marker.category()
    }

    /// 获取提供者注册键 `(类别, 名称)`
    pub fn provider_key(&self) -> Option<(&'static str, &str)> {
        self.category().map(|category| (category, self.name.as_str()))
    }
}
