//! # 基础设施组合层
//!
//! 这个 crate 是 Aster 运行时内核的组合层，负责把组件扫描、
//! 依赖装配与提供者注册串成一个完整的启动流程。
//!
//! ## 主要功能
//!
//! - **运行时构建器**: 使用建造者模式组装启动器
//! - **组件扫描发现**: 遍历编译时登记表发现带标记的组件
//! - **运行时配置**: TOML 文件叠加环境变量的配置载体
//! - **启动编排**: 扫描、覆盖、校验、装配、注册的固定顺序
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::AgentRuntime;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = AgentRuntime::builder()
//!         .scan_module("aster::providers")
//!         .scan_module("aster::services")
//!         .build()
//!         .bootstrap()?;
//!
//!     let status = runtime.status();
//!     println!("组件 {} 个, 提供者 {} 个", status.component_count, status.provider_count);
//!
//!     runtime.shutdown();
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod component_scanner;
pub mod config;
pub mod runtime;

// 重新导出主要类型
pub use bootstrapper::RuntimeBootstrapper;
pub use builder::RuntimeBuilder;
pub use component_scanner::ComponentScannerImpl;
pub use config::{ComponentOverride, RuntimeConfig};
pub use runtime::{AgentRuntime, RuntimeStatus};

// 重新导出错误类型
pub use infrastructure_common::BootstrapError;
