use std::fmt::Write as _;

use anyhow::Result;
use serde::Deserialize;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, EnvFilter};

use crate::comm::config::get_config;

/// 本地时间戳，精确到毫秒 / Local timestamp with millisecond precision
struct LocalTimer;

impl fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// `[logging]` 配置节 / The `[logging]` configuration section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 全局级别 / Global level
    pub level: String,
    /// 按模块追加的过滤指令，如 `actix_web=info`
    /// Per-module directives appended after the level, e.g. `actix_web=info`
    pub filter: Vec<String>,
    /// 是否输出事件目标 / Whether to print the event target
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: vec!["actix_web=info".to_string()],
            target: false,
        }
    }
}

impl LoggingConfig {
    /// 从全局配置读取，缺失或无法解析时使用默认值
    /// Read from the global configuration, defaults when missing or malformed
    pub fn load() -> Self {
        get_config("logging").unwrap_or_default()
    }

    /// EnvFilter 指令串 / EnvFilter directive string
    pub fn directives(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.filter.iter().map(String::as_str))
            .filter(|d| !d.trim().is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 初始化日志订阅器；`RUST_LOG` 优先于 `[logging]` 配置
/// Initialize the log subscriber; `RUST_LOG` wins over the `[logging]` section
pub fn init_tracing() -> Result<()> {
    let logging = LoggingConfig::load();
    let directives = logging.directives();

    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => match EnvFilter::try_new(&directives) {
            Ok(filter) => (filter, None),
            Err(e) => (EnvFilter::new("info"), Some(e)),
        },
    };

    LogTracer::init().ok();
    fmt::SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_timer(LocalTimer)
        .compact()
        .with_target(logging.target)
        .try_init()
        .ok();

    if let Some(e) = rejected {
        tracing::warn!(directives = %directives, "日志过滤指令无效，回退到 info / invalid log directives, falling back to info: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::config::{ConfigManager, ConfigSource};
    use config::FileFormat;

    fn logging_from(toml: &str) -> LoggingConfig {
        let manager = ConfigManager::with_sources(vec![ConfigSource::String {
            content: toml.to_string(),
            format: FileFormat::Toml,
        }])
        .unwrap();
        manager.get_or("logging", LoggingConfig::default())
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(LoggingConfig::default().directives(), "info,actix_web=info");
    }

    #[test]
    fn test_section_overrides_filter() {
        let logging = logging_from(
            "[logging]\nlevel = \"debug\"\nfilter = [\"tstore_gateway=trace\", \"\"]\ntarget = true",
        );
        assert_eq!(logging.directives(), "debug,tstore_gateway=trace");
        assert!(logging.target);
        assert!(EnvFilter::try_new(logging.directives()).is_ok());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let logging = logging_from("[logging]\nlevel = \"warn\"");
        assert_eq!(logging.filter, LoggingConfig::default().filter);
        assert_eq!(logging.directives(), "warn,actix_web=info");
    }
}
