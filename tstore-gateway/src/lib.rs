//! # tstore 网关降级服务 / tstore Gateway Fallback Service
//!
//! 当反向代理无法访问后端路由时，由降级提供者合成固定的 HTTP 响应。
//! When the reverse proxy cannot reach a backend route, a fallback provider
//! synthesizes a fixed HTTP response instead of a raw connection failure.

pub mod app_bootstrap;
pub mod error;
pub mod fallback;
pub mod route_registry;

pub use app_bootstrap::*;
pub use error::*;
pub use fallback::*;
pub use route_registry::*;
