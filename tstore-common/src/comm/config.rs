use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 环境变量前缀 / Environment variable prefix
pub const ENV_PREFIX: &str = "TSTORE";
/// 运行环境变量名 / Variable selecting the profile file
pub const PROFILE_ENV: &str = "TSTORE_ENV";

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 配置数据源信息
#[derive(Debug, Clone)]
pub struct ConfigSourceInfo {
    pub source_type: String,
    pub description: String,
    pub priority: u8,
    pub loaded: bool,
}

/// 配置管理器
pub struct ConfigManager {
    config: Config,
    sources_info: Vec<ConfigSourceInfo>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Result<Self> {
        Self::with_sources(vec![])
    }

    /// 使用指定的配置源创建配置管理器
    ///
    /// 优先级从低到高：default.toml -> {TSTORE_ENV}.toml -> 环境变量 -> 额外配置源
    /// Priority low to high: default.toml -> {TSTORE_ENV}.toml -> env vars -> extra sources
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| "development".to_string());
        let default_sources = vec![
            ConfigSource::File {
                path: "config/default.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: format!("config/{}.toml", profile),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::Env {
                prefix: ENV_PREFIX.to_string(),
                separator: "__",
            },
        ];

        let mut builder = Config::builder();
        let mut sources_info = Vec::new();

        for (index, source) in default_sources.into_iter().chain(sources).enumerate() {
            let info = source.get_source_info(index as u8 + 1);

            // 可选文件不存在时记录但不添加 / Skip missing optional files but keep a record
            if let ConfigSource::File { path, required, .. } = &source {
                if !std::path::Path::new(path).exists() {
                    if *required {
                        return Err(anyhow!("必需的配置文件不存在: {}", path));
                    }
                    sources_info.push(info);
                    continue;
                }
            }

            builder = source
                .add_to_builder(builder)
                .map_err(|e| anyhow!("添加配置源失败: {}", e))?;
            sources_info.push(ConfigSourceInfo {
                loaded: true,
                ..info
            });
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self {
            config,
            sources_info,
        })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取指定 key 的配置值，如果不存在返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// 安全获取配置值，返回详细错误信息
    pub fn get_safe<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, ConfigError> {
        self.config.get(key).map_err(|e| match e {
            config::ConfigError::NotFound(_) => ConfigError::KeyNotFound {
                key: key.to_string(),
            },
            other => ConfigError::TypeConversionError {
                key: key.to_string(),
                message: other.to_string(),
            },
        })
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    /// 检查配置项是否存在
    pub fn exists(&self, key: &str) -> bool {
        self.config.get::<config::Value>(key).is_ok()
    }

    /// 获取所有配置源信息
    pub fn get_sources_info(&self) -> &[ConfigSourceInfo] {
        &self.sources_info
    }

    /// 获取当前活跃的配置源（已成功加载的）
    pub fn get_active_sources(&self) -> Vec<&ConfigSourceInfo> {
        self.sources_info.iter().filter(|info| info.loaded).collect()
    }

    /// 记录配置源详细信息 / Log configuration source details
    pub fn log_sources_info(&self) {
        tracing::info!(
            "已加载 {}/{} 个配置源 / {} of {} configuration sources loaded",
            self.get_active_sources().len(),
            self.sources_info.len(),
            self.get_active_sources().len(),
            self.sources_info.len()
        );
        for info in &self.sources_info {
            tracing::debug!(
                source = %info.source_type,
                priority = info.priority,
                loaded = info.loaded,
                "{}",
                info.description
            );
        }
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 覆盖项配置源（点号路径 -> 值）
    /// Override source (dotted path -> value)
    Overrides(Vec<(String, String)>),
    /// 字符串配置源
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    /// 获取配置源信息
    pub fn get_source_info(&self, priority: u8) -> ConfigSourceInfo {
        let (source_type, description) = match self {
            ConfigSource::File { path, required, .. } => (
                "File",
                format!("文件配置源: {} (必需: {})", path, required),
            ),
            ConfigSource::Env { prefix, separator } => (
                "Environment",
                format!("环境变量配置源: 前缀={}, 分隔符={}", prefix, separator),
            ),
            ConfigSource::Overrides(items) => (
                "Overrides",
                format!("覆盖项配置源: {} 个配置项", items.len()),
            ),
            ConfigSource::String { .. } => ("String", "字符串配置源".to_string()),
        };
        ConfigSourceInfo {
            source_type: source_type.to_string(),
            description,
            priority,
            loaded: false,
        }
    }

    pub fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let file_source = match format {
                    Some(format) => File::with_name(&path).format(format),
                    None => File::with_name(&path),
                };
                Ok(builder.add_source(file_source.required(required)))
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .ignore_empty(true),
            )),
            ConfigSource::Overrides(items) => {
                let mut builder = builder;
                for (key, value) in items {
                    builder = builder
                        .set_override(key.as_str(), value)
                        .map_err(|e| anyhow!("设置覆盖项 '{}' 失败: {}", key, e))?;
                }
                Ok(builder)
            }
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}

/// 安装全局配置管理器 / Install the process-global configuration manager
pub fn set_global_config_manager(manager: ConfigManager) -> Result<Arc<ConfigManager>> {
    let manager = Arc::new(manager);
    let mut slot = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    *slot = Some(Arc::clone(&manager));
    Ok(manager)
}

/// 获取全局配置管理器实例（单例模式）
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let manager = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("读取全局配置管理器锁失败: {}", e))?;
        if let Some(ref config_manager) = *manager {
            return Ok(Arc::clone(config_manager));
        }
    }
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    match manager.as_ref() {
        Some(existing) => Ok(Arc::clone(existing)),
        None => {
            let config_manager =
                Arc::new(ConfigManager::new().map_err(|e| anyhow!("创建配置管理器失败: {}", e))?);
            *manager = Some(Arc::clone(&config_manager));
            Ok(config_manager)
        }
    }
}

/// 全局配置获取函数（使用单例）
pub fn get_config<T: DeserializeOwned>(key: &str) -> Result<T> {
    let manager = get_global_config_manager()?;
    manager.get(key)
}
