//! 组件扫描和发现功能
//!
//! 对全局描述符登记表做只读遍历，按基础模块和标记发现组件

use di_abstractions::{BeanDefinition, ComponentScanner};
use infrastructure_common::{
    descriptor_entries, ComponentDescriptor, DescriptorEntry, DescriptorLoadError, MarkerKind,
    ModulePathConventions, TypeInfo,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace, warn};

/// 描述符入口来源
enum EntrySource {
    /// 全局登记表
    Global,
    /// 固定入口列表，用于测试和手工组装
    Fixed(Vec<DescriptorEntry>),
}

/// 组件扫描器实现
///
/// 扫描没有日志之外的副作用。加载失败的入口按策略跳过，
/// 不存在的基础模块产生空结果，扫描从不中止。
pub struct ComponentScannerImpl {
    /// 入口来源
    source: EntrySource,
    /// 按基础模块缓存的扫描结果
    scan_cache: RwLock<HashMap<String, Vec<ComponentDescriptor>>>,
}

impl ComponentScannerImpl {
    /// 创建基于全局登记表的扫描器
    pub fn new() -> Self {
        Self {
            source: EntrySource::Global,
            scan_cache: RwLock::new(HashMap::new()),
        }
    }

    /// 创建基于固定入口列表的扫描器
    pub fn with_entries(entries: Vec<DescriptorEntry>) -> Self {
        Self {
            source: EntrySource::Fixed(entries),
            scan_cache: RwLock::new(HashMap::new()),
        }
    }

    /// 清空扫描缓存
    pub fn clear_cache(&self) {
        self.scan_cache.write().clear();
        debug!("扫描缓存已清空");
    }

    fn entries(&self) -> Vec<DescriptorEntry> {
        match &self.source {
            EntrySource::Global => descriptor_entries(),
            EntrySource::Fixed(entries) => entries.clone(),
        }
    }

    /// 加载入口描述符，应用跳过策略
    ///
    /// `base_module` 为 `None` 时遍历全表。
    fn load_descriptors(&self, base_module: Option<&str>) -> Vec<(ComponentDescriptor, DescriptorEntry)> {
        let candidates: Vec<DescriptorEntry> = self
            .entries()
            .into_iter()
            .filter(|entry| {
                base_module
                    .map(|base| ModulePathConventions::is_under(entry.module_path, base))
                    .unwrap_or(true)
            })
            .collect();

        if candidates.is_empty() {
            if let Some(base) = base_module {
                warn!("基础模块下没有任何组件登记: {}", base);
            }
            return Vec::new();
        }

        let mut loaded = Vec::with_capacity(candidates.len());
        for entry in candidates {
            match (entry.load)() {
                Ok(descriptor) => loaded.push((descriptor, entry)),
                Err(DescriptorLoadError::OptionalDependencyMissing { dependency }) => {
                    trace!(
                        "跳过组件入口 {}: 可选依赖缺失 {}",
                        entry.module_path,
                        dependency
                    );
                }
                Err(err) => {
                    warn!("跳过组件入口 {}: {}", entry.module_path, err);
                }
            }
        }
        loaded
    }

    /// 按类型去重，同一类型保留优先级最高的描述符
    fn dedupe(
        pairs: Vec<(ComponentDescriptor, DescriptorEntry)>,
    ) -> Vec<(ComponentDescriptor, DescriptorEntry)> {
        let mut by_type: HashMap<std::any::TypeId, (ComponentDescriptor, DescriptorEntry)> =
            HashMap::new();
        for (descriptor, entry) in pairs {
            match by_type.get(&descriptor.type_info.id) {
                Some((existing, _)) if existing.priority >= descriptor.priority => {}
                _ => {
                    by_type.insert(descriptor.type_info.id, (descriptor, entry));
                }
            }
        }
        let mut deduped: Vec<_> = by_type.into_values().collect();
        deduped.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        deduped
    }
}

impl Default for ComponentScannerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentScanner for ComponentScannerImpl {
    fn scan(&self, base_module: &str) -> HashSet<TypeInfo> {
        self.descriptors(base_module)
            .into_iter()
            .map(|descriptor| descriptor.type_info)
            .collect()
    }

    fn scan_for_marker(&self, marker: MarkerKind) -> HashSet<TypeInfo> {
        self.load_descriptors(None)
            .into_iter()
            .filter(|(descriptor, _)| descriptor.marker.matches(marker))
            .map(|(descriptor, _)| descriptor.type_info)
            .collect()
    }

    fn scan_providers(&self) -> HashMap<&'static str, HashSet<TypeInfo>> {
        let mut buckets: HashMap<&'static str, HashSet<TypeInfo>> = HashMap::new();
        for marker in MarkerKind::provider_markers() {
            let Some(category) = marker.category() else {
                continue;
            };
            let found = self.scan_for_marker(*marker);
            if !found.is_empty() {
                buckets.insert(category, found);
            }
        }
        buckets
    }

    fn descriptors(&self, base_module: &str) -> Vec<ComponentDescriptor> {
        if let Some(cached) = self.scan_cache.read().get(base_module) {
            debug!("使用缓存的扫描结果: {}", base_module);
            return cached.clone();
        }

        let descriptors: Vec<ComponentDescriptor> =
            Self::dedupe(self.load_descriptors(Some(base_module)))
                .into_iter()
                .map(|(descriptor, _)| descriptor)
                .collect();

        info!(
            "扫描模块 {} 完成, 发现 {} 个组件",
            base_module,
            descriptors.len()
        );
        self.scan_cache
            .write()
            .insert(base_module.to_string(), descriptors.clone());
        descriptors
    }

    fn definitions(&self, base_module: &str) -> Vec<BeanDefinition> {
        Self::dedupe(self.load_descriptors(Some(base_module)))
            .into_iter()
            .map(|(descriptor, entry)| BeanDefinition::from_entry(descriptor, &entry))
            .collect()
    }

    fn name(&self) -> &str {
        "ComponentScannerImpl"
    }

    fn supports(&self, target: &str) -> bool {
        // 支持扫描 crate 和模块路径
        target.starts_with("crate::") || target.contains("::")
    }
}
