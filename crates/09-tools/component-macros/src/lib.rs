//! # Component Macros
//!
//! 这个 crate 提供了用于编译时组件登记的过程宏，
//! 标记宏列表与运行时的标记列表一一对应且封闭。
//!
//! ## 核心宏
//!
//! - [`macro@component`] - 基础组件标记
//! - [`macro@service`] - 服务组件标记
//! - [`macro@llm_provider`] / [`macro@storage_provider`] /
//!   [`macro@embedding_provider`] / [`macro@tool_provider`] - 提供者类别标记
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::llm_provider;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! #[llm_provider(name = "openai", priority = 10)]
//! pub struct OpenAiChatModel {
//!     gateway: Arc<HttpGateway>,
//! }
//! ```
//!
//! 结构体中的 `Arc<T>` 字段按声明顺序构成构造依赖，
//! 其余字段在构造时使用 `Default::default()` 填充。
//!
//! ## 参数
//!
//! - `name = "custom_name"` - 自定义组件名称，缺省按类型简名首字母小写推导
//! - `priority = N` - 组件优先级，缺省为 0
//! - `disabled` - 声明即禁用，缺省启用
//! - `guard = "path::to::probe"` - 可用性探测函数，探测失败的组件在扫描时跳过

use proc_macro::TokenStream;

mod component;
mod utils;

/// 基础组件标记宏
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("Component", args, input)
}

/// 服务组件标记宏，自身带有基础组件元标记
#[proc_macro_attribute]
pub fn service(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("Service", args, input)
}

/// 大模型提供者标记宏，注册到 `llm` 类别
#[proc_macro_attribute]
pub fn llm_provider(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("LlmProvider", args, input)
}

/// 存储提供者标记宏，注册到 `storage` 类别
#[proc_macro_attribute]
pub fn storage_provider(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("StorageProvider", args, input)
}

/// 向量化提供者标记宏，注册到 `embedding` 类别
#[proc_macro_attribute]
pub fn embedding_provider(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("EmbeddingProvider", args, input)
}

/// 工具提供者标记宏，注册到 `tool` 类别
#[proc_macro_attribute]
pub fn tool_provider(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand("ToolProvider", args, input)
}
