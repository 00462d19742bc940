//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::registry::BeanDefinition;
use infrastructure_common::{Component, DependencyError};
use std::any::Any;
use std::sync::Arc;

/// Bean 容器 trait
///
/// 容器独占持有全部已实例化的 Bean，启动完成后供任意线程只读查询。
pub trait BeanContainer: Send + Sync {
    /// 直接注册外部构造的单例
    fn register_singleton<T>(&self, instance: T) -> Result<(), DependencyError>
    where
        T: Component;

    /// 注册惰性工厂，首次解析时调用且至多调用一次
    fn register_factory<T, F>(&self, supplier: F) -> Result<(), DependencyError>
    where
        T: Component,
        F: FnOnce() -> T + Send + Sync + 'static;

    /// 注册发现的组件定义
    fn register_component(&self, definition: BeanDefinition) -> Result<(), DependencyError>;

    /// 按类型解析 Bean
    fn get_bean<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Component;

    /// 按名称解析 Bean
    fn get_bean_by_name(&self, name: &str) -> Result<Arc<dyn Any + Send + Sync>, DependencyError>;

    /// 检查指定类型是否可解析
    fn contains<T>(&self) -> bool
    where
        T: Component;

    /// 获取所有组件定义的快照
    fn bean_definitions(&self) -> Vec<BeanDefinition>;

    /// 清空容器，用于关闭和测试清理
    fn clear(&self);
}
