use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use tracing::{error, info, instrument};
use serde::de::DeserializeOwned;
use tstore_common::{ConfigError, ConfigManager};

use crate::error::{GatewayError, GatewayResult};
use crate::route_registry::FallbackRegistry;

/// 网关配置结构体
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl GatewayConfig {
    /// 从配置管理器读取 `server.*`：缺失项使用默认值，类型错误或空主机名报错
    /// Read `server.*`: defaults for missing keys, an error for malformed values or an empty host
    pub fn from_config(manager: &ConfigManager) -> GatewayResult<Self> {
        let defaults = Self::default();
        let host: String = read_or(manager, "server.host", defaults.host)?;
        if host.trim().is_empty() {
            return Err(GatewayError::Config("server.host 不能为空 / must not be empty".to_string()));
        }
        let workers: usize = read_or(manager, "server.workers", 0)?;
        Ok(Self {
            host,
            port: read_or(manager, "server.port", defaults.port)?,
            workers: (workers > 0).then_some(workers),
        })
    }
}

fn read_or<T: DeserializeOwned>(manager: &ConfigManager, key: &str, default: T) -> GatewayResult<T> {
    match manager.get_safe(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::KeyNotFound { .. }) => Ok(default),
        Err(e) => Err(GatewayError::Config(e.to_string())),
    }
}

/// 兜底处理器：网关没有可用后端路由时由降级路由表作答
/// Catch-all handler: the fallback table answers whenever no backend route is available
pub async fn fallback_handler(req: HttpRequest, registry: web::Data<FallbackRegistry>) -> HttpResponse {
    let route = req.path();
    let cause = GatewayError::no_route(route);
    match registry.respond(route, &cause) {
        Some(resp) => resp.into_http_response(),
        None => {
            error!(route, "没有可用的降级提供者 / no fallback provider registered");
            HttpResponse::BadGateway().finish()
        }
    }
}

/// 网关启动器
pub struct GatewayBootstrap {
    config: GatewayConfig,
    registry: Arc<FallbackRegistry>,
}

impl GatewayBootstrap {
    /// 创建新的网关启动器（预装通配降级响应器）
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            registry: Arc::new(FallbackRegistry::standard()),
        }
    }

    /// 替换降级路由表
    pub fn with_registry(mut self, registry: FallbackRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// 运行网关服务器
    #[instrument(skip(self))]
    pub async fn run(self) -> GatewayResult<()> {
        let config = self.config.clone();
        info!("启动网关服务器，配置: {:?}", config);

        let registry = web::Data::from(Arc::clone(&self.registry));
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(registry.clone())
                .default_service(web::to(fallback_handler))
        });
        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }

        let result = server
            .bind((config.host.as_str(), config.port))
            .map_err(GatewayError::from)?
            .run()
            .await;

        match result {
            Ok(()) => {
                info!("网关服务器已停止 / gateway server stopped");
                Ok(())
            }
            Err(e) => {
                error!("网关服务器运行失败: {}", e);
                Err(GatewayError::Server(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tstore_common::ConfigSource;

    #[test]
    fn test_config_defaults_when_keys_missing() {
        let manager = ConfigManager::with_sources(vec![]).unwrap();
        let config = GatewayConfig::from_config(&manager).unwrap();
        assert!(!config.host.is_empty());
        assert!(config.port > 0);
    }

    #[test]
    fn test_config_reads_server_section() {
        let manager = ConfigManager::with_sources(vec![ConfigSource::Overrides(vec![
            ("server.host".to_string(), "0.0.0.0".to_string()),
            ("server.port".to_string(), "9191".to_string()),
            ("server.workers".to_string(), "2".to_string()),
        ])])
        .unwrap();
        let config = GatewayConfig::from_config(&manager).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9191);
        assert_eq!(config.workers, Some(2));
    }

    fn overridden(key: &str, value: &str) -> ConfigManager {
        ConfigManager::with_sources(vec![ConfigSource::Overrides(vec![(
            key.to_string(),
            value.to_string(),
        )])])
        .unwrap()
    }

    #[test]
    fn test_malformed_port_is_a_config_error() {
        let result = GatewayConfig::from_config(&overridden("server.port", "not-a-port"));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_blank_host_is_a_config_error() {
        let result = GatewayConfig::from_config(&overridden("server.host", "  "));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
