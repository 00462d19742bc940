//! 组件扫描器抽象接口
//!
//! 提供基于描述符登记表的组件发现能力

use crate::registry::BeanDefinition;
use infrastructure_common::{ComponentDescriptor, MarkerKind, TypeInfo};
use std::collections::{HashMap, HashSet};

/// 组件扫描器 trait
///
/// 扫描是对登记表的只读遍历，除日志外没有任何副作用。
/// 缺失的基础模块和加载失败的入口按跳过策略处理，扫描从不中止。
pub trait ComponentScanner: Send + Sync {
    /// 扫描指定基础模块下的组件类型
    fn scan(&self, base_module: &str) -> HashSet<TypeInfo>;

    /// 全表扫描带有指定标记的组件类型
    ///
    /// 标记直接命中，或通过一层元标记间接命中。
    fn scan_for_marker(&self, marker: MarkerKind) -> HashSet<TypeInfo>;

    /// 按提供者类别分桶扫描
    fn scan_providers(&self) -> HashMap<&'static str, HashSet<TypeInfo>>;

    /// 获取指定基础模块下可加载的组件描述符
    fn descriptors(&self, base_module: &str) -> Vec<ComponentDescriptor>;

    /// 获取指定基础模块下可加载组件的 Bean 定义
    fn definitions(&self, base_module: &str) -> Vec<BeanDefinition>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的扫描目标
    fn supports(&self, target: &str) -> bool;
}
