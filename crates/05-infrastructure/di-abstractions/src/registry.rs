//! 组件注册抽象接口

use infrastructure_common::{
    ComponentDescriptor, DependencyError, DescriptorEntry, TypeInfo,
};
use std::any::Any;
use std::sync::Arc;

/// Bean 状态
///
/// `Failed` 是终止状态，进入该状态会中止应用启动。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeanState {
    /// 已发现，尚未解析
    Discovered,
    /// 正在解析依赖
    Resolving,
    /// 已实例化
    Instantiated,
    /// 已注册到提供者注册表
    Registered,
    /// 失败
    Failed,
}

/// 组件工厂函数类型
///
/// 输入为按声明顺序解析完成的依赖实例。
pub type ComponentFactoryFn = Arc<
    dyn Fn(Vec<Arc<dyn Any + Send + Sync>>) -> Result<Arc<dyn Any + Send + Sync>, DependencyError>
        + Send
        + Sync,
>;

/// Bean 定义
///
/// 发现的组件在容器中的登记形式，描述符与构造方式在此汇合。
#[derive(Clone)]
pub struct BeanDefinition {
    /// 组件描述符
    pub descriptor: ComponentDescriptor,
    /// 构造依赖，按构造顺序排列
    pub dependencies: Vec<TypeInfo>,
    /// 组件工厂
    pub factory: ComponentFactoryFn,
    /// Bean 状态
    pub state: BeanState,
}

impl BeanDefinition {
    /// 从可注册组件创建 Bean 定义
    pub fn of<T: RegisterableComponent>(descriptor: ComponentDescriptor) -> Self {
        let factory: ComponentFactoryFn = Arc::new(|deps| {
            let instance = T::construct(deps)?;
            Ok(Arc::new(instance) as Arc<dyn Any + Send + Sync>)
        });
        Self {
            descriptor,
            dependencies: T::dependencies(),
            factory,
            state: BeanState::Discovered,
        }
    }

    /// 从登记入口创建 Bean 定义
    ///
    /// `descriptor` 由调用方加载，允许其名称、优先级等已被配置覆盖。
    pub fn from_entry(descriptor: ComponentDescriptor, entry: &DescriptorEntry) -> Self {
        let construct = entry.construct;
        let factory: ComponentFactoryFn = Arc::new(move |deps| construct(deps));
        Self {
            descriptor,
            dependencies: (entry.dependencies)(),
            factory,
            state: BeanState::Discovered,
        }
    }

    /// 组件类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.descriptor.type_info
    }
}

impl std::fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("descriptor", &self.descriptor)
            .field("dependencies", &self.dependencies)
            .field("state", &self.state)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 可注册组件 trait
///
/// 声明构造依赖并由解析完成的依赖构造自身，
/// 通常由 `component-macros` 生成实现。
pub trait RegisterableComponent: infrastructure_common::Component + Sized {
    /// 获取构造依赖列表，顺序即交付顺序
    fn dependencies() -> Vec<TypeInfo>;

    /// 由解析完成的依赖构造组件实例
    fn construct(dependencies: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self, DependencyError>;
}
