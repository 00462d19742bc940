//! # Infrastructure Common
//!
//! 这个 crate 提供了 Aster 运行时内核的公共 traits 和工具。
//!
//! ## 核心组件
//!
//! - [`Component`] - 组件基础 trait
//! - [`ComponentDescriptor`] - 组件声明元数据
//! - [`MarkerKind`] - 封闭的组件标记列表
//! - [`NamingConventions`] - 组件命名约定
//! - 全局描述符登记表 - 编译时注册的组件入口
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 声明性元数据通过编译时登记表达，不依赖运行时反射
//! - 约定优于配置

pub mod component;
pub mod conventions;
pub mod errors;
pub mod marker;
pub mod metadata;

pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use marker::*;
pub use metadata::*;

/// 类型擦除的构造函数
///
/// 输入为按声明顺序解析完成的依赖实例。
pub type ConstructFn = fn(
    Vec<std::sync::Arc<dyn std::any::Any + Send + Sync>>,
) -> Result<std::sync::Arc<dyn std::any::Any + Send + Sync>, DependencyError>;

/// 描述符登记入口
///
/// 每个带标记的组件类型对应一条入口，由 `component-macros`
/// 生成的 `ctor` 函数在进程启动时提交。`load` 允许失败，
/// 以表达可选依赖缺失等加载问题，扫描器据此决定跳过策略。
#[derive(Debug, Clone, Copy)]
pub struct DescriptorEntry {
    /// 定义处的模块路径
    pub module_path: &'static str,
    /// 描述符加载函数
    pub load: fn() -> Result<ComponentDescriptor, DescriptorLoadError>,
    /// 构造依赖列表函数，顺序即交付顺序
    pub dependencies: fn() -> Vec<TypeInfo>,
    /// 类型擦除的构造函数
    pub construct: ConstructFn,
}

/// 全局描述符登记表
static DESCRIPTOR_ENTRIES: once_cell::sync::Lazy<parking_lot::RwLock<Vec<DescriptorEntry>>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(Vec::new()));

/// 向全局登记表提交一条描述符入口
pub fn submit_descriptor_entry(entry: DescriptorEntry) {
    DESCRIPTOR_ENTRIES.write().push(entry);
}

/// 获取全局登记表的当前快照
pub fn descriptor_entries() -> Vec<DescriptorEntry> {
    DESCRIPTOR_ENTRIES.read().clone()
}
