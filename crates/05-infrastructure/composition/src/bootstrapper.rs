//! 运行时启动器
//!
//! 协调配置加载、组件扫描、装配与提供者注册的启动顺序

use crate::component_scanner::ComponentScannerImpl;
use crate::config::RuntimeConfig;
use crate::runtime::{AgentRuntime, RuntimeStatus};
use di_abstractions::{BeanContainer, BeanDefinition, ComponentScanner, ProviderRegistry};
use di_impl::{AppContext, ProviderRegistryImpl};
use infrastructure_common::{BootstrapResult, DependencyError, RegistryError};
use std::any::TypeId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// 外部单例的延迟注册函数
pub type ExternalRegistration =
    Box<dyn FnOnce(&AppContext) -> Result<(), DependencyError> + Send>;

/// 运行时启动器
///
/// 启动是单线程同步流程，任何一步失败都会中止整个引导，
/// 不会产生半装配的运行时。
pub struct RuntimeBootstrapper {
    /// 配置文件路径
    pub(crate) config_path: Option<PathBuf>,
    /// 构建器给出的扫描模块
    pub(crate) scan_modules: Vec<String>,
    /// 组件扫描器
    pub(crate) scanner: ComponentScannerImpl,
    /// 外部单例注册函数
    pub(crate) externals: Vec<ExternalRegistration>,
    /// 是否启用启动前校验
    pub(crate) validation_enabled: bool,
    /// 是否初始化日志
    pub(crate) logging_enabled: bool,
}

impl RuntimeBootstrapper {
    /// 启动运行时内核
    pub fn bootstrap(self) -> BootstrapResult<AgentRuntime> {
        let startup = Instant::now();
        info!("开始启动运行时内核");

        // 第一步：加载配置
        let config = RuntimeConfig::load(self.config_path.as_deref())?;
        if self.logging_enabled {
            init_logging(config.log_filter.as_deref());
        }

        // 第二步：创建上下文并注册外部单例
        let context = AppContext::new();
        for register in self.externals {
            register(&context)?;
        }

        // 第三步：扫描组件
        let mut modules = self.scan_modules;
        for module in &config.scan_modules {
            if !modules.contains(module) {
                modules.push(module.clone());
            }
        }
        let mut definitions = Vec::new();
        for module in &modules {
            definitions.extend(self.scanner.definitions(module));
        }
        let mut definitions = dedupe_by_type(definitions);

        // 第四步：应用配置覆盖并过滤禁用组件
        for definition in &mut definitions {
            config.apply_overrides(&mut definition.descriptor);
        }
        let enabled: Vec<BeanDefinition> = definitions
            .into_iter()
            .filter(|definition| {
                if !definition.descriptor.enabled {
                    debug!("跳过禁用组件: {}", definition.descriptor.name);
                }
                definition.descriptor.enabled
            })
            .collect();

        // 第五步：启用组件的 (类别, 名称) 唯一性检查
        if self.validation_enabled {
            validate_uniqueness(&enabled)?;
        }

        // 第六步：注册定义并实例化
        let component_count = enabled.len();
        for definition in &enabled {
            context.register_component(definition.clone())?;
        }
        context.instantiate_all()?;

        // 第七步：注册提供者
        let registry = ProviderRegistryImpl::new();
        for definition in &enabled {
            let Some((category, name)) = definition.descriptor.provider_key() else {
                continue;
            };
            let type_id = definition.type_info().id;
            let instance = context.get_bean_dyn(type_id)?;
            registry.register(category, name, instance, &definition.type_info().module_path)?;
            context.mark_registered(type_id);
        }

        let status = RuntimeStatus {
            component_count,
            provider_count: registry.len(),
            started_at: chrono::Utc::now(),
            startup_duration: startup.elapsed(),
        };
        info!(
            "运行时内核启动完成, 组件 {} 个, 提供者 {} 个, 耗时 {:?}",
            status.component_count, status.provider_count, status.startup_duration
        );
        Ok(AgentRuntime::new(context, registry, status))
    }
}

/// 初始化全局日志订阅器，重复初始化时保持既有订阅器
fn init_logging(filter: Option<&str>) {
    let env_filter = match filter {
        Some(expr) => tracing_subscriber::EnvFilter::new(expr),
        None => tracing_subscriber::EnvFilter::from_default_env(),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

/// 跨扫描模块按类型去重，同一类型保留优先级最高的定义
fn dedupe_by_type(definitions: Vec<BeanDefinition>) -> Vec<BeanDefinition> {
    let mut by_type: HashMap<TypeId, BeanDefinition> = HashMap::new();
    for definition in definitions {
        let type_id = definition.type_info().id;
        match by_type.get(&type_id) {
            Some(existing) if existing.descriptor.priority >= definition.descriptor.priority => {}
            _ => {
                by_type.insert(type_id, definition);
            }
        }
    }
    let mut deduped: Vec<_> = by_type.into_values().collect();
    deduped.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name));
    deduped
}

/// 检查启用组件之间没有重复的 `(类别, 名称)` 注册键
fn validate_uniqueness(definitions: &[BeanDefinition]) -> Result<(), RegistryError> {
    let mut seen: HashMap<(&str, &str), &str> = HashMap::new();
    for definition in definitions {
        let Some(key) = definition.descriptor.provider_key() else {
            continue;
        };
        let type_path = definition.type_info().module_path.as_str();
        if let Some(existing) = seen.insert(key, type_path) {
            return Err(RegistryError::DuplicateRegistration {
                category: key.0.to_string(),
                name: key.1.to_string(),
                existing: existing.to_string(),
                incoming: type_path.to_string(),
            });
        }
    }
    Ok(())
}
