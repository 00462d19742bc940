//! 约定规范定义
//!
//! 提供组件命名和模块路径的约定规范

use crate::metadata::TypeInfo;

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 从类型信息推导默认组件名称
    ///
    /// 取类型简名并将首字母小写，`OpenAiChatModel` 推导为 `openAiChatModel`。
    pub fn default_component_name(type_info: &TypeInfo) -> String {
        Self::decapitalize(type_info.short_name())
    }

    /// 将首字母转为小写
    pub fn decapitalize(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// 模块路径约定规范
#[derive(Debug)]
pub struct ModulePathConventions;

impl ModulePathConventions {
    /// 检查模块路径是否位于基础模块之下
    ///
    /// `aster::providers` 覆盖 `aster::providers` 自身及
    /// `aster::providers::llm` 等子模块，但不覆盖 `aster::providers_ext`。
    pub fn is_under(module_path: &str, base_module: &str) -> bool {
        module_path == base_module
            || module_path
                .strip_prefix(base_module)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}
