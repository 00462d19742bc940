//! 组件解析抽象接口
//!
//! 提供依赖解析过程中的解析链维护能力

use infrastructure_common::{DependencyError, TypeInfo};

/// 解析上下文
///
/// 维护当前解析链，用于在递归解析时检测循环依赖。
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链
    chain: Vec<TypeInfo>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// 将类型压入解析链
    ///
    /// 如果类型已在链上，返回带完整循环路径的错误，
    /// 例如 `AgentService -> MemoryStore -> AgentService`。
    pub fn push(&mut self, type_info: TypeInfo) -> Result<(), DependencyError> {
        if let Some(start) = self.chain.iter().position(|t| t.id == type_info.id) {
            let mut cycle: Vec<&str> = self.chain[start..]
                .iter()
                .map(TypeInfo::short_name)
                .collect();
            cycle.push(type_info.short_name());
            return Err(DependencyError::CircularDependency {
                chain: cycle.join(" -> "),
            });
        }
        self.chain.push(type_info);
        Ok(())
    }

    /// 将最近压入的类型弹出解析链
    pub fn pop(&mut self) {
        self.chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// 查看链上最近压入的类型
    pub fn last(&self) -> Option<&TypeInfo> {
        self.chain.last()
    }
}
