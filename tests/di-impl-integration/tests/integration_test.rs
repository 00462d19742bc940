//! 依赖注入实现的集成测试

use di_abstractions::{BeanContainer, BeanDefinition, RegisterableComponent};
use infrastructure_common::{
    Component, ComponentDescriptor, DependencyError, MarkerKind, TypeInfo,
};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use di_impl::AppContext;

/// 构造顺序记录，按测试进程共享
fn construction_log() -> &'static Mutex<Vec<&'static str>> {
    static LOG: OnceLock<Mutex<Vec<&'static str>>> = OnceLock::new();
    LOG.get_or_init(|| Mutex::new(Vec::new()))
}

fn record(name: &'static str) {
    construction_log().lock().unwrap().push(name);
}

/// 配置仓库，图的叶子节点
#[derive(Debug)]
struct ConfigRepository;

impl Component for ConfigRepository {
    fn name(&self) -> &'static str {
        "configRepository"
    }
}

impl RegisterableComponent for ConfigRepository {
    fn dependencies() -> Vec<TypeInfo> {
        Vec::new()
    }

    fn construct(_deps: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError> {
        record("configRepository");
        Ok(Self)
    }
}

/// 会话仓库，依赖配置仓库
#[derive(Debug)]
struct SessionRepository {
    config: Arc<ConfigRepository>,
}

impl Component for SessionRepository {
    fn name(&self) -> &'static str {
        "sessionRepository"
    }
}

impl RegisterableComponent for SessionRepository {
    fn dependencies() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<ConfigRepository>()]
    }

    fn construct(mut deps: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError> {
        let config = deps
            .remove(0)
            .downcast::<ConfigRepository>()
            .map_err(|_| DependencyError::creation_failed("SessionRepository", "依赖类型不匹配"))?;
        record("sessionRepository");
        Ok(Self { config })
    }
}

/// 智能体服务，依赖两个仓库
#[derive(Debug)]
struct AgentService {
    config: Arc<ConfigRepository>,
    sessions: Arc<SessionRepository>,
}

impl Component for AgentService {
    fn name(&self) -> &'static str {
        "agentService"
    }
}

impl RegisterableComponent for AgentService {
    fn dependencies() -> Vec<TypeInfo> {
        vec![
            TypeInfo::of::<ConfigRepository>(),
            TypeInfo::of::<SessionRepository>(),
        ]
    }

    fn construct(mut deps: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError> {
        let config = deps
            .remove(0)
            .downcast::<ConfigRepository>()
            .map_err(|_| DependencyError::creation_failed("AgentService", "依赖类型不匹配"))?;
        let sessions = deps
            .remove(0)
            .downcast::<SessionRepository>()
            .map_err(|_| DependencyError::creation_failed("AgentService", "依赖类型不匹配"))?;
        record("agentService");
        Ok(Self { config, sessions })
    }
}

fn definition_of<T: RegisterableComponent>() -> BeanDefinition {
    BeanDefinition::of::<T>(ComponentDescriptor::new::<T>(MarkerKind::Service))
}

#[test]
fn test_dependency_ordering() {
    let context = AppContext::new();
    // 注册顺序故意与依赖顺序相反
    context
        .register_component(definition_of::<AgentService>())
        .unwrap();
    context
        .register_component(definition_of::<SessionRepository>())
        .unwrap();
    context
        .register_component(definition_of::<ConfigRepository>())
        .unwrap();

    construction_log().lock().unwrap().clear();
    let service = context.get_bean::<AgentService>().unwrap();

    let log = construction_log().lock().unwrap().clone();
    let position = |name: &str| log.iter().position(|n| *n == name).unwrap();
    // 所有依赖都在依赖者之前完成构造
    assert!(position("configRepository") < position("sessionRepository"));
    assert!(position("sessionRepository") < position("agentService"));

    // 单例在整个图中共享
    let sessions = context.get_bean::<SessionRepository>().unwrap();
    assert!(Arc::ptr_eq(&service.sessions, &sessions));
    assert!(Arc::ptr_eq(&service.config, &sessions.config));
}

/// 循环依赖对: PlannerService 与 CriticService 互相依赖
#[derive(Debug)]
struct PlannerService;

impl Component for PlannerService {
    fn name(&self) -> &'static str {
        "plannerService"
    }
}

impl RegisterableComponent for PlannerService {
    fn dependencies() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<CriticService>()]
    }

    fn construct(_deps: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

#[derive(Debug)]
struct CriticService;

impl Component for CriticService {
    fn name(&self) -> &'static str {
        "criticService"
    }
}

impl RegisterableComponent for CriticService {
    fn dependencies() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<PlannerService>()]
    }

    fn construct(_deps: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

#[test]
fn test_circular_dependency_is_detected() {
    let context = AppContext::new();
    context
        .register_component(definition_of::<PlannerService>())
        .unwrap();
    context
        .register_component(definition_of::<CriticService>())
        .unwrap();

    // 既不栈溢出也不挂起，而是报告完整循环路径
    let err = context.get_bean::<PlannerService>().unwrap_err();
    match err {
        DependencyError::CircularDependency { chain } => {
            assert_eq!(
                chain,
                "PlannerService -> CriticService -> PlannerService"
            );
        }
        other => panic!("意外的错误类型: {other:?}"),
    }
}

#[derive(Debug)]
struct MetricsSink {
    #[allow(dead_code)]
    endpoint: String,
}

impl Component for MetricsSink {
    fn name(&self) -> &'static str {
        "metricsSink"
    }
}

#[test]
fn test_factory_is_invoked_at_most_once() {
    static INVOCATIONS: AtomicUsize = AtomicUsize::new(0);

    let context = AppContext::new();
    context
        .register_factory(|| {
            INVOCATIONS.fetch_add(1, Ordering::SeqCst);
            MetricsSink {
                endpoint: "http://localhost:4317".to_string(),
            }
        })
        .unwrap();

    // 注册本身不触发提交函数
    assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 0);

    let first = context.get_bean::<MetricsSink>().unwrap();
    let second = context.get_bean::<MetricsSink>().unwrap();
    let by_name = context.get_bean_by_name("metricsSink").unwrap();

    assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(by_name.downcast::<MetricsSink>().is_ok());
}

#[derive(Debug)]
struct BootstrapFlags {
    verbose: bool,
}

impl Component for BootstrapFlags {
    fn name(&self) -> &'static str {
        "bootstrapFlags"
    }
}

#[test]
fn test_externally_constructed_singleton() {
    let context = AppContext::new();
    context
        .register_singleton(BootstrapFlags { verbose: true })
        .unwrap();

    let flags = context.get_bean::<BootstrapFlags>().unwrap();
    assert!(flags.verbose);

    let by_name = context.get_bean_by_name("bootstrapFlags").unwrap();
    let by_name = by_name.downcast::<BootstrapFlags>().unwrap();
    assert!(Arc::ptr_eq(&flags, &by_name));
}

#[test]
fn test_runtime_lookup_failure_is_recoverable() {
    let context = AppContext::new();

    let err = context.get_bean::<MetricsSink>().unwrap_err();
    assert!(matches!(err, DependencyError::BeanNotFound { .. }));

    // 查找失败后容器保持可用
    context
        .register_singleton(BootstrapFlags { verbose: false })
        .unwrap();
    assert!(context.get_bean::<BootstrapFlags>().is_ok());
}
