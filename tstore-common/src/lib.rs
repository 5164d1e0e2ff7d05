// tstore-common 库主入口，按需导出模块
// tstore-common crate entry, re-exports on demand

pub mod comm;
pub use crate::comm::config::*;
pub use crate::comm::tracing::{init_tracing, LoggingConfig};

pub mod domain;
pub use crate::domain::*;

pub mod error;
pub use crate::error::*;

pub mod http;
pub use crate::http::*;

// 通用仓库（持久化管理器）Trait
// Generic repository (persistence manager) trait
pub mod repo;
pub use crate::repo::*;

pub mod service;
pub use crate::service::*;

#[cfg(feature = "web_actix")]
pub mod controller;
#[cfg(feature = "web_actix")]
pub use crate::controller::configure_crud;

// 重新导出 tracing 宏，方便业务服务使用
// Re-export tracing macros for business services
pub use tracing::{debug, error, info, trace, warn};
