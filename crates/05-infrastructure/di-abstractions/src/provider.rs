//! 提供者注册表抽象接口

use infrastructure_common::RegistryError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 提供者注册表 trait
///
/// 以 `(类别, 名称)` 为键的实例视图，实例本身由容器持有。
/// 条目在启动时写入一次，之后只读，仅 [`ProviderRegistry::clear`]
/// 在关闭或测试清理时整体移除。
pub trait ProviderRegistry: Send + Sync {
    /// 注册提供者实例
    ///
    /// 已占用的 `(类别, 名称)` 键会返回重复注册错误，不做静默覆盖。
    fn register(
        &self,
        category: &str,
        name: &str,
        instance: Arc<dyn Any + Send + Sync>,
        type_name: &str,
    ) -> Result<(), RegistryError>;

    /// 按键查找提供者实例
    ///
    /// 未注册时返回 `None`，类型匹配由调用方通过 downcast 判断。
    fn get_dyn(&self, category: &str, name: &str) -> Option<Arc<dyn Any + Send + Sync>>;

    /// 获取指定类别下全部提供者的只读快照
    fn get_all(&self, category: &str) -> HashMap<String, Arc<dyn Any + Send + Sync>>;

    /// 已注册条目总数
    fn len(&self) -> usize;

    /// 注册表是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空注册表，用于关闭和测试清理
    fn clear(&self);
}
