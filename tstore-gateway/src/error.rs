use thiserror::Error;

/// 网关错误：既用作降级原因，也用于服务启动失败
/// Gateway error: used as fallback cause and for server start-up failures
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("上游不可达: {route}")]
    Unreachable { route: String },

    #[error("上游超时: {route}")]
    Timeout { route: String },

    #[error("没有匹配的上游路由: {path}")]
    NoRoute { path: String },

    #[error("配置错误: {0}")]
    Config(String),

    #[error("服务器错误: {0}")]
    Server(#[from] std::io::Error),
}

impl GatewayError {
    pub fn unreachable<T: Into<String>>(route: T) -> Self {
        Self::Unreachable {
            route: route.into(),
        }
    }

    pub fn timeout<T: Into<String>>(route: T) -> Self {
        Self::Timeout {
            route: route.into(),
        }
    }

    pub fn no_route<T: Into<String>>(path: T) -> Self {
        Self::NoRoute { path: path.into() }
    }
}

/// 网关结果类型
pub type GatewayResult<T> = Result<T, GatewayError>;
