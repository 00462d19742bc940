//! 应用上下文实现
//!
//! 容器独占持有全部单例 Bean，按需对构造依赖图做深度优先解析

use di_abstractions::{BeanContainer, BeanDefinition, BeanState, ResolveContext};
use infrastructure_common::{Component, DependencyError, TypeInfo};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 惰性工厂的提交函数
///
/// 返回实例与其组件名称，名称在实例化后才可得。
type FactorySupplier = Box<dyn FnOnce() -> (Arc<dyn Any + Send + Sync>, &'static str) + Send + Sync>;

/// 惰性工厂槽位
///
/// `supplier` 被取走即表示已触发，实例随后进入单例表。
struct FactorySlot {
    type_name: &'static str,
    supplier: Option<FactorySupplier>,
}

/// 应用上下文
///
/// 启动阶段单线程完成注册与装配，之后作为读多写少的共享状态
/// 供任意工作线程查询。实例一经注册不再变更。
pub struct AppContext {
    /// 组件定义表
    definitions: RwLock<HashMap<TypeId, BeanDefinition>>,
    /// 已实例化的单例表
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 惰性工厂表
    factories: RwLock<HashMap<TypeId, FactorySlot>>,
    /// 名称索引
    names: RwLock<HashMap<String, TypeId>>,
}

impl AppContext {
    /// 创建新的应用上下文
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            factories: RwLock::new(HashMap::new()),
            names: RwLock::new(HashMap::new()),
        }
    }

    /// 将名称映射到类型，冲突时保留先注册者
    fn index_name(&self, name: &str, type_id: TypeId) {
        let mut names = self.names.write();
        match names.get(name) {
            Some(existing) if *existing != type_id => {
                warn!("Bean 名称冲突: {}, 保留先注册的映射", name);
            }
            Some(_) => {}
            None => {
                names.insert(name.to_string(), type_id);
            }
        }
    }

    /// 更新组件定义状态
    fn set_state(&self, type_id: TypeId, state: BeanState) {
        if let Some(definition) = self.definitions.write().get_mut(&type_id) {
            definition.state = state;
        }
    }

    /// 解析指定类型，必要时沿依赖图递归实例化
    fn resolve(
        &self,
        type_id: TypeId,
        ctx: &mut ResolveContext,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        // 已实例化的单例直接复用
        if let Some(instance) = self.instances.read().get(&type_id) {
            return Ok(Arc::clone(instance));
        }

        // 惰性工厂至多触发一次
        {
            let mut factories = self.factories.write();
            if let Some(slot) = factories.get_mut(&type_id) {
                if let Some(supplier) = slot.supplier.take() {
                    debug!("触发惰性工厂: {}", slot.type_name);
                    let (instance, name) = supplier();
                    self.instances.write().insert(type_id, Arc::clone(&instance));
                    drop(factories);
                    self.index_name(name, type_id);
                    return Ok(instance);
                }
                // 工厂已触发，实例在单例表中
                drop(factories);
                if let Some(instance) = self.instances.read().get(&type_id) {
                    return Ok(Arc::clone(instance));
                }
            }
        }

        // 回退到组件定义装配
        let definition = self.definitions.read().get(&type_id).cloned();
        let Some(definition) = definition else {
            return Err(match ctx.last() {
                Some(parent) => DependencyError::UnresolvedDependency {
                    type_name: parent.short_name().to_string(),
                    dependency: format!("{:?}", type_id),
                },
                None => DependencyError::bean_not_found(format!("{:?}", type_id)),
            });
        };

        self.instantiate(definition, ctx)
    }

    /// 实例化一个组件定义
    ///
    /// 先递归解析全部构造依赖，依赖全部就绪后才执行构造，
    /// 因此实例化顺序天然是依赖图的拓扑序。
    fn instantiate(
        &self,
        definition: BeanDefinition,
        ctx: &mut ResolveContext,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let type_info = definition.type_info().clone();
        let type_id = type_info.id;

        ctx.push(type_info.clone())?;
        self.set_state(type_id, BeanState::Resolving);

        let mut resolved = Vec::with_capacity(definition.dependencies.len());
        for dependency in &definition.dependencies {
            match self.resolve_dependency(dependency, &type_info, ctx) {
                Ok(instance) => resolved.push(instance),
                Err(err) => {
                    self.set_state(type_id, BeanState::Failed);
                    ctx.pop();
                    return Err(err);
                }
            }
        }

        let instance = match (definition.factory)(resolved) {
            Ok(instance) => instance,
            Err(err) => {
                self.set_state(type_id, BeanState::Failed);
                ctx.pop();
                return Err(err);
            }
        };

        self.instances.write().insert(type_id, Arc::clone(&instance));
        self.set_state(type_id, BeanState::Instantiated);
        ctx.pop();

        debug!("实例化组件: {}", type_info.short_name());
        Ok(instance)
    }

    /// 解析单个构造依赖，未注册时报告依赖者
    fn resolve_dependency(
        &self,
        dependency: &TypeInfo,
        dependent: &TypeInfo,
        ctx: &mut ResolveContext,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let known = {
            let has_instance = self.instances.read().contains_key(&dependency.id);
            has_instance
                || self.factories.read().contains_key(&dependency.id)
                || self.definitions.read().contains_key(&dependency.id)
        };
        if !known {
            return Err(DependencyError::UnresolvedDependency {
                type_name: dependent.short_name().to_string(),
                dependency: dependency.short_name().to_string(),
            });
        }
        self.resolve(dependency.id, ctx)
    }

    /// 饿汉式实例化全部已注册的组件定义
    ///
    /// 同优先级之间按名称排序，优先级高者先实例化。
    /// 任何失败立即中止并向上传播。
    pub fn instantiate_all(&self) -> Result<usize, DependencyError> {
        let mut pending: Vec<(i32, String, TypeId)> = self
            .definitions
            .read()
            .values()
            .map(|d| (d.descriptor.priority, d.descriptor.name.clone(), d.type_info().id))
            .collect();
        pending.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let mut count = 0;
        for (_, name, type_id) in pending {
            let mut ctx = ResolveContext::new();
            self.resolve(type_id, &mut ctx).map_err(|err| {
                warn!("组件实例化失败: {}", name);
                err
            })?;
            count += 1;
        }

        info!("组件实例化完成, 共 {} 个", count);
        Ok(count)
    }

    /// 将组件定义标记为已注册
    pub fn mark_registered(&self, type_id: TypeId) {
        self.set_state(type_id, BeanState::Registered);
    }

    /// 按类型ID解析 Bean
    pub fn get_bean_dyn(
        &self,
        type_id: TypeId,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let mut ctx = ResolveContext::new();
        self.resolve(type_id, &mut ctx)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("definitions", &self.definitions.read().len())
            .field("instances", &self.instances.read().len())
            .field("factories", &self.factories.read().len())
            .finish()
    }
}

impl BeanContainer for AppContext {
    fn register_singleton<T>(&self, instance: T) -> Result<(), DependencyError>
    where
        T: Component,
    {
        let type_id = TypeId::of::<T>();
        let name = instance.name();
        debug!("注册单例组件: {}", name);

        self.instances
            .write()
            .insert(type_id, Arc::new(instance) as Arc<dyn Any + Send + Sync>);
        self.index_name(name, type_id);
        Ok(())
    }

    fn register_factory<T, F>(&self, supplier: F) -> Result<(), DependencyError>
    where
        T: Component,
        F: FnOnce() -> T + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();
        debug!("注册惰性工厂: {}", type_name);

        let wrapped: FactorySupplier = Box::new(move || {
            let instance = supplier();
            let name = instance.name();
            (Arc::new(instance) as Arc<dyn Any + Send + Sync>, name)
        });

        self.factories.write().insert(
            type_id,
            FactorySlot {
                type_name,
                supplier: Some(wrapped),
            },
        );
        Ok(())
    }

    fn register_component(&self, definition: BeanDefinition) -> Result<(), DependencyError> {
        let type_id = definition.type_info().id;
        let name = definition.descriptor.name.clone();
        debug!(
            "注册组件定义: {} ({})",
            name,
            definition.type_info().short_name()
        );

        if self.definitions.write().insert(type_id, definition).is_some() {
            debug!("组件定义被替换: {}", name);
        }
        self.index_name(&name, type_id);
        Ok(())
    }

    fn get_bean<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Component,
    {
        let type_info = TypeInfo::of::<T>();
        let mut ctx = ResolveContext::new();
        let instance = self.resolve(type_info.id, &mut ctx).map_err(|err| match err {
            DependencyError::BeanNotFound { .. } => {
                DependencyError::bean_not_found(type_info.short_name())
            }
            other => other,
        })?;

        instance.downcast::<T>().map_err(|_| {
            DependencyError::creation_failed(type_info.short_name(), "类型转换失败")
        })
    }

    fn get_bean_by_name(&self, name: &str) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let type_id = self
            .names
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| DependencyError::bean_not_found(name))?;

        let mut ctx = ResolveContext::new();
        self.resolve(type_id, &mut ctx).map_err(|err| match err {
            DependencyError::BeanNotFound { .. } => DependencyError::bean_not_found(name),
            other => other,
        })
    }

    fn contains<T>(&self) -> bool
    where
        T: Component,
    {
        let type_id = TypeId::of::<T>();
        let has_instance = self.instances.read().contains_key(&type_id);
        let has_factory = self.factories.read().contains_key(&type_id);
        has_instance || has_factory || self.definitions.read().contains_key(&type_id)
    }

    fn bean_definitions(&self) -> Vec<BeanDefinition> {
        self.definitions.read().values().cloned().collect()
    }

    fn clear(&self) {
        self.definitions.write().clear();
        self.instances.write().clear();
        self.factories.write().clear();
        self.names.write().clear();
        debug!("应用上下文已清空");
    }
}
