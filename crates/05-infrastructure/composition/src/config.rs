//! 运行时配置
//!
//! 组合层的配置载体，TOML 文件之上叠加环境变量

use infrastructure_common::{ComponentDescriptor, ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// 环境变量前缀
const ENV_PREFIX: &str = "ASTER";

/// 运行时配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfig {
    /// 要扫描的基础模块列表
    #[serde(default)]
    pub scan_modules: Vec<String>,
    /// 按组件名称的覆盖项
    #[serde(default)]
    pub components: HashMap<String, ComponentOverride>,
    /// 日志过滤表达式
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// 单个组件的配置覆盖项
///
/// 覆盖在扫描之后、唯一性检查之前生效，
/// 因此配置文件可以禁用冲突提供者中的一个。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentOverride {
    /// 覆盖启用状态
    pub enabled: Option<bool>,
    /// 覆盖优先级
    pub priority: Option<i32>,
}

impl RuntimeConfig {
    /// 加载运行时配置
    ///
    /// 显式给出的配置文件必须存在且可解析，
    /// 未给出文件时仅从环境变量读取。
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileRead {
                    path: path.display().to_string(),
                    message: "文件不存在".to_string(),
                });
            }
            info!("加载配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| ConfigError::Parse {
            source: Box::new(e),
        })?;
        config.try_deserialize().map_err(|e| ConfigError::Parse {
            source: Box::new(e),
        })
    }

    /// 将覆盖项应用到组件描述符
    pub fn apply_overrides(&self, descriptor: &mut ComponentDescriptor) {
        let Some(overrides) = self.components.get(&descriptor.name) else {
            return;
        };
        if let Some(enabled) = overrides.enabled {
            debug!("配置覆盖组件启用状态: {} -> {}", descriptor.name, enabled);
            descriptor.enabled = enabled;
        }
        if let Some(priority) = overrides.priority {
            debug!("配置覆盖组件优先级: {} -> {}", descriptor.name, priority);
            descriptor.priority = priority;
        }
    }
}
