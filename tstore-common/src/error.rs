use thiserror::Error;

/// 服务层结果类型 / Service-layer result type
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// 通用 CRUD 层错误 / Generic CRUD layer error
///
/// 服务层自身不产生新错误，这里的变体都来自持久化管理器。
/// The service layer defines no error of its own; every variant originates in the manager.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("资源未找到: {resource}")]
    NotFound { resource: String },

    #[error("验证错误: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("持久化管理器错误: {0}")]
    Manager(#[from] anyhow::Error),
}

impl ServiceError {
    /// 创建资源未找到错误
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 创建验证错误
    pub fn validation<T: Into<String>, U: Into<String>>(field: T, message: U) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建管理器错误
    pub fn manager<T: std::fmt::Display>(message: T) -> Self {
        Self::Manager(anyhow::anyhow!("{}", message))
    }

    /// 获取错误代码
    pub fn error_code(&self) -> i32 {
        match self {
            ServiceError::Manager(_) => 1000,
            ServiceError::Validation { .. } => 1004,
            ServiceError::NotFound { .. } => 1009,
        }
    }

    /// 获取 HTTP 状态码 / HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. } => 404,
            ServiceError::Validation { .. } => 400,
            ServiceError::Manager(_) => 500,
        }
    }
}

/// 获取详细错误描述（中英文） / Get detailed error description (CN/EN)
pub fn describe_error(e: &ServiceError) -> String {
    match e {
        ServiceError::NotFound { resource } => {
            format!("资源未找到 / Resource not found: {}", resource)
        }
        ServiceError::Validation { field, message } => {
            format!("验证错误 / Validation error: {}: {}", field, message)
        }
        ServiceError::Manager(err) => format!("持久化管理器错误 / Manager error: {}", err),
    }
}

#[cfg(feature = "web_actix")]
mod actix {
    use super::{describe_error, ServiceError};
    use crate::http::response::ApiResponse;
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};

    impl ResponseError for ServiceError {
        fn status_code(&self) -> StatusCode {
            StatusCode::from_u16(ServiceError::status_code(self))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }

        fn error_response(&self) -> HttpResponse {
            let message = describe_error(self);
            match self {
                ServiceError::Manager(_) => tracing::error!("Internal error: {}", message),
                _ => tracing::info!("Client error: {}", message),
            }
            HttpResponse::build(ResponseError::status_code(self))
                .json(ApiResponse::<()>::failure(self.error_code(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_codes() {
        let e = ServiceError::not_found("sku#3");
        assert_eq!(e.status_code(), 404);
        assert_eq!(e.error_code(), 1009);
        assert!(describe_error(&e).contains("sku#3"));

        let e = ServiceError::validation("pageSize", "must be >= 1");
        assert_eq!(e.status_code(), 400);
        assert_eq!(e.to_string(), "验证错误: pageSize: must be >= 1");

        let e = ServiceError::manager("connection reset");
        assert_eq!(e.status_code(), 500);
        assert!(describe_error(&e).contains("connection reset"));
    }

    #[test]
    fn test_anyhow_converts_into_manager_error() {
        fn storage() -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn call() -> ServiceResult<()> {
            storage()?;
            Ok(())
        }
        assert!(matches!(call(), Err(ServiceError::Manager(_))));
    }
}
