//! 提供者注册表实现
//!
//! 以 `(类别, 名称)` 为键的并发查找表，条目为容器所持实例的非拥有视图

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use di_abstractions::ProviderRegistry;
use infrastructure_common::RegistryError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 注册表条目
///
/// 条目在启动时创建一次，进程存续期间不会被单独移除。
#[derive(Clone)]
pub struct RegistryEntry {
    /// 提供者实例
    pub instance: Arc<dyn Any + Send + Sync>,
    /// 实例类型名称
    pub type_name: String,
    /// 注册时间
    pub registered_at: DateTime<Utc>,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("type_name", &self.type_name)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// 提供者注册表实现
///
/// 启动后的查找来自任意工作线程，底层使用 DashMap 支撑并发读取。
#[derive(Debug, Default)]
pub struct ProviderRegistryImpl {
    entries: DashMap<(String, String), RegistryEntry>,
}

impl ProviderRegistryImpl {
    /// 创建新的提供者注册表
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// 按键做带类型的查找
    ///
    /// 未注册或运行时类型不匹配都返回 `None`，
    /// 调用方据此可以回退到默认提供者。
    pub fn get<T>(&self, category: &str, name: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get_dyn(category, name)
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 指定类别下已注册的提供者名称
    pub fn names(&self, category: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == category)
            .map(|entry| entry.key().1.clone())
            .collect();
        names.sort();
        names
    }
}

impl ProviderRegistry for ProviderRegistryImpl {
    fn register(
        &self,
        category: &str,
        name: &str,
        instance: Arc<dyn Any + Send + Sync>,
        type_name: &str,
    ) -> Result<(), RegistryError> {
        let key = (category.to_string(), name.to_string());
        match self.entries.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => {
                Err(RegistryError::DuplicateRegistration {
                    category: category.to_string(),
                    name: name.to_string(),
                    existing: occupied.get().type_name.clone(),
                    incoming: type_name.to_string(),
                })
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(RegistryEntry {
                    instance,
                    type_name: type_name.to_string(),
                    registered_at: Utc::now(),
                });
                info!("注册提供者: {}/{} ({})", category, name, type_name);
                Ok(())
            }
        }
    }

    fn get_dyn(&self, category: &str, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.entries
            .get(&(category.to_string(), name.to_string()))
            .map(|entry| Arc::clone(&entry.instance))
    }

    fn get_all(&self, category: &str) -> HashMap<String, Arc<dyn Any + Send + Sync>> {
        self.entries
            .iter()
            .filter(|entry| entry.key().0 == category)
            .map(|entry| (entry.key().1.clone(), Arc::clone(&entry.value().instance)))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&self) {
        self.entries.clear();
        debug!("提供者注册表已清空");
    }
}
