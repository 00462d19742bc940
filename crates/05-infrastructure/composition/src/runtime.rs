//! 运行时主入口

use crate::builder::RuntimeBuilder;
use chrono::{DateTime, Utc};
use di_abstractions::{BeanContainer, ProviderRegistry};
use di_impl::{AppContext, ProviderRegistryImpl};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Aster 运行时
///
/// 引导完成后的内核实例。上下文拥有全部 Bean，
/// 注册表是按类别组织的实例视图，两者都可以被任意线程并发读取。
pub struct AgentRuntime {
    /// 应用上下文
    context: Arc<AppContext>,
    /// 提供者注册表
    providers: Arc<ProviderRegistryImpl>,
    /// 启动状态快照
    status: RuntimeStatus,
}

/// 运行时状态快照
#[derive(Debug, Clone)]
pub struct RuntimeStatus {
    /// 启用组件数量
    pub component_count: usize,
    /// 已注册提供者数量
    pub provider_count: usize,
    /// 启动时间
    pub started_at: DateTime<Utc>,
    /// 启动耗时
    pub startup_duration: Duration,
}

impl AgentRuntime {
    /// 创建运行时构建器
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// 内部构造函数
    pub(crate) fn new(
        context: AppContext,
        providers: ProviderRegistryImpl,
        status: RuntimeStatus,
    ) -> Self {
        Self {
            context: Arc::new(context),
            providers: Arc::new(providers),
            status,
        }
    }

    /// 获取应用上下文
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// 获取提供者注册表
    pub fn providers(&self) -> &Arc<ProviderRegistryImpl> {
        &self.providers
    }

    /// 获取启动状态快照
    pub fn status(&self) -> &RuntimeStatus {
        &self.status
    }

    /// 关闭运行时，整体清空注册表与上下文
    pub fn shutdown(self) {
        info!("关闭运行时内核");
        self.providers.clear();
        self.context.clear();
    }
}

impl std::fmt::Debug for AgentRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("status", &self.status)
            .finish()
    }
}
