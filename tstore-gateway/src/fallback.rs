//! 路由降级响应 / Route fallback responses

use std::error::Error as StdError;

use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::HttpResponse;

/// 通配路由键，匹配所有后端路由 / Wildcard route key matching every backend route
pub const WILDCARD_ROUTE: &str = "*";

/// 降级提供者：后端路由不可达时合成响应
/// Fallback provider: synthesizes a response when a backend route is unreachable
pub trait FallbackProvider: Send + Sync {
    /// 该提供者负责的路由键，`"*"` 表示全部路由
    /// Route key this provider serves, `"*"` for every route
    fn route(&self) -> &str;

    /// 为失败的路由生成响应，不得失败
    /// Produce the response for a failed route; must not fail
    fn fallback_response(
        &self,
        route: &str,
        cause: &(dyn StdError + Send + Sync),
    ) -> FallbackResponse;
}

/// 合成的 HTTP 形态响应 / Synthetic HTTP-shaped response
#[derive(Debug, Clone)]
pub struct FallbackResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FallbackResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn raw_status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// 释放钩子；响应不持有任何资源 / Disposal hook; the response holds no resources
    pub fn close(self) {}

    pub fn into_http_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for (name, value) in self.headers.iter() {
            builder.insert_header((name.clone(), value.clone()));
        }
        builder.body(self.body)
    }
}

impl From<FallbackResponse> for HttpResponse {
    fn from(resp: FallbackResponse) -> Self {
        resp.into_http_response()
    }
}

/// 网关通配降级响应器
///
/// 对任何路由、任何原因都返回 501，响应体为 `fallback:{route}`，
/// 并声明 `Content-Type: application/json`（响应体实际为纯文本，保持原有行为）。
///
/// Gateway wildcard fallback responder: 501 with body `fallback:{route}` for any
/// route and any cause, declared as `Content-Type: application/json` although the
/// body is plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewayFallbackResponder;

impl FallbackProvider for GatewayFallbackResponder {
    fn route(&self) -> &str {
        WILDCARD_ROUTE
    }

    fn fallback_response(
        &self,
        route: &str,
        cause: &(dyn StdError + Send + Sync),
    ) -> FallbackResponse {
        tracing::debug!(route, cause = %cause, "路由降级 / route fallback");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        FallbackResponse::new(
            StatusCode::NOT_IMPLEMENTED,
            headers,
            format!("fallback:{}", route),
        )
    }
}
