//! 错误类型定义

use thiserror::Error;

/// 描述符加载错误类型
///
/// 扫描阶段的非致命错误，扫描器按策略跳过并继续。
#[derive(Error, Debug)]
pub enum DescriptorLoadError {
    #[error("可选依赖缺失: {dependency}")]
    OptionalDependencyMissing { dependency: String },

    #[error("描述符无效: {message}")]
    Invalid { message: String },
}

impl DescriptorLoadError {
    /// 创建可选依赖缺失错误
    pub fn optional_dependency_missing(dependency: impl Into<String>) -> Self {
        Self::OptionalDependencyMissing {
            dependency: dependency.into(),
        }
    }

    /// 创建描述符无效错误
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("Bean 未找到: {name}")]
    BeanNotFound { name: String },

    #[error("依赖无法解析: {type_name} 依赖的 {dependency} 没有任何注册或可发现的提供者")]
    UnresolvedDependency {
        type_name: String,
        dependency: String,
    },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("Bean 创建失败: {type_name}, 原因: {message}")]
    CreationFailed { type_name: String, message: String },
}

impl DependencyError {
    /// 创建 Bean 未找到错误
    pub fn bean_not_found(name: impl Into<String>) -> Self {
        Self::BeanNotFound { name: name.into() }
    }

    /// 创建 Bean 创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CreationFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 提供者注册表错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("提供者重复注册: 类别 {category} 下的名称 {name} 已被 {existing} 占用, 无法注册 {incoming}")]
    DuplicateRegistration {
        category: String,
        name: String,
        existing: String,
        incoming: String,
    },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}, 原因: {message}")]
    FileRead { path: String, message: String },

    #[error("配置解析失败: {source}")]
    Parse {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置无效: {message}")]
    Invalid { message: String },
}

/// 启动错误类型
///
/// 启动阶段的任何错误都会中止整个引导流程，不存在部分启动的运行时。
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error("提供者注册错误: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("组件描述符无效: {type_name}, 原因: {message}")]
    InvalidDescriptor { type_name: String, message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BootstrapResult<T> = Result<T, BootstrapError>;
