use serde::{Deserialize, Serialize};

use crate::error::{describe_error, ServiceResult};

/// 成功响应代码 / Success code
pub const SUCCESS_CODE: i32 = 0;

/// 统一结果封装（HTTP 边界） / Uniform result envelope at the HTTP boundary
///
/// 成功时 `data` 可以为空（无返回值的操作或未找到的查询）。
/// On success `data` may be absent (void-like operations or lookups that found nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::build(true, SUCCESS_CODE, "success".to_string(), Some(data))
    }

    /// 无返回值的成功 / Success without payload
    pub fn ok() -> Self {
        Self::build(true, SUCCESS_CODE, "success".to_string(), None)
    }

    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self::build(false, code, message.into(), None)
    }

    fn build(success: bool, code: i32, message: String, data: Option<T>) -> Self {
        Self {
            success,
            code,
            message,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl<T> From<ServiceResult<T>> for ApiResponse<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::success(data),
            Err(e) => ApiResponse::failure(e.error_code(), describe_error(&e)),
        }
    }
}
