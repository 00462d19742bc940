//! 运行时构建器

use crate::bootstrapper::{ExternalRegistration, RuntimeBootstrapper};
use crate::component_scanner::ComponentScannerImpl;
use di_abstractions::BeanContainer;
use infrastructure_common::{BootstrapError, Component, ConfigError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 运行时构建器
///
/// 使用建造者模式组装启动器，随后一次性完成引导。
pub struct RuntimeBuilder {
    /// 要扫描的基础模块
    scan_modules: Vec<String>,
    /// 配置文件路径
    config_path: Option<PathBuf>,
    /// 组件扫描器，缺省使用全局登记表
    scanner: Option<ComponentScannerImpl>,
    /// 外部单例注册函数
    externals: Vec<ExternalRegistration>,
    /// 是否启用启动前校验
    validation_enabled: bool,
    /// 是否初始化日志
    logging_enabled: bool,
}

impl RuntimeBuilder {
    /// 创建新的运行时构建器
    pub fn new() -> Self {
        Self {
            scan_modules: Vec::new(),
            config_path: None,
            scanner: None,
            externals: Vec::new(),
            validation_enabled: true,
            logging_enabled: false,
        }
    }

    /// 添加要扫描的基础模块
    pub fn scan_module<S: Into<String>>(mut self, module: S) -> Self {
        let module = module.into();
        debug!("添加扫描模块: {}", module);
        self.scan_modules.push(module);
        self
    }

    /// 指定 TOML 配置文件
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, BootstrapError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BootstrapError::Config {
                source: ConfigError::FileRead {
                    path: path.display().to_string(),
                    message: "文件不存在".to_string(),
                },
            });
        }
        info!("使用配置文件: {}", path.display());
        self.config_path = Some(path.to_path_buf());
        Ok(self)
    }

    /// 使用自定义组件扫描器
    pub fn with_scanner(mut self, scanner: ComponentScannerImpl) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 注册外部构造的单例
    pub fn with_singleton<T: Component>(mut self, instance: T) -> Self {
        debug!("登记外部单例: {}", instance.name());
        self.externals
            .push(Box::new(move |context| context.register_singleton(instance)));
        self
    }

    /// 设置是否启用启动前校验
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    /// 设置是否初始化日志
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 构建运行时启动器
    pub fn build(self) -> RuntimeBootstrapper {
        RuntimeBootstrapper {
            config_path: self.config_path,
            scan_modules: self.scan_modules,
            scanner: self.scanner.unwrap_or_default(),
            externals: self.externals,
            validation_enabled: self.validation_enabled,
            logging_enabled: self.logging_enabled,
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
