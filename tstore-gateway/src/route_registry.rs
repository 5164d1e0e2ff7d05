use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::fallback::{FallbackProvider, FallbackResponse, GatewayFallbackResponder, WILDCARD_ROUTE};

/// 降级路由表：按路由键查找提供者，通配提供者占据默认槽位
/// Fallback routing table: providers looked up by route key, the wildcard
/// provider occupies the default slot
#[derive(Default)]
pub struct FallbackRegistry {
    routes: HashMap<String, Arc<dyn FallbackProvider>>,
    default: Option<Arc<dyn FallbackProvider>>,
}

impl FallbackRegistry {
    /// 创建空的路由表
    pub fn new() -> Self {
        Self::default()
    }

    /// 预装网关通配降级响应器的路由表
    /// Table with the gateway wildcard responder installed
    pub fn standard() -> Self {
        Self::new().with_provider(Arc::new(GatewayFallbackResponder))
    }

    /// 注册提供者；同一路由键后注册者覆盖先注册者
    /// Register a provider; a later registration replaces an earlier one for the same key
    pub fn register(&mut self, provider: Arc<dyn FallbackProvider>) {
        let route = provider.route().to_string();
        tracing::debug!(route = %route, "注册降级提供者 / fallback provider registered");
        if route == WILDCARD_ROUTE {
            self.default = Some(provider);
        } else {
            self.routes.insert(route, provider);
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn FallbackProvider>) -> Self {
        self.register(provider);
        self
    }

    /// 精确路由优先，否则使用默认提供者
    /// Exact route first, otherwise the default provider
    pub fn resolve(&self, route: &str) -> Option<&Arc<dyn FallbackProvider>> {
        self.routes.get(route).or(self.default.as_ref())
    }

    /// 查找提供者并生成降级响应；没有任何提供者时返回 `None`
    /// Resolve and invoke; `None` when no provider applies
    pub fn respond(
        &self,
        route: &str,
        cause: &(dyn StdError + Send + Sync),
    ) -> Option<FallbackResponse> {
        let provider = self.resolve(route)?;
        tracing::info!(route, cause = %cause, "后端路由不可达，返回降级响应 / backend unreachable, serving fallback");
        Some(provider.fallback_response(route, cause))
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// 已注册的精确路由键（已排序）/ Registered exact route keys, sorted
    pub fn routes(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// 提供者总数（含默认槽位）/ Provider count, default slot included
    pub fn len(&self) -> usize {
        self.routes.len() + usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
