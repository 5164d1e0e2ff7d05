//! 通用 CRUD HTTP 端点 / Generic CRUD HTTP endpoints
//!
//! 主键与分页参数取自路径，记录取自请求体。
//! Ids and paging inputs come from the path, records from the request body.

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ServiceError;
use crate::http::pagination::build_link_header;
use crate::http::response::ApiResponse;
use crate::service::RecordService;

type HandlerResult = Result<HttpResponse, ServiceError>;

/// 在 `base_path` 下注册全部 CRUD 路由，服务从 `web::Data<S>` 获取。
/// Register every CRUD route under `base_path`; the service comes from `web::Data<S>`.
///
/// 批量与逻辑删除路由先于 `{id}` 路由注册。
/// Batch and logical routes are registered before the `{id}` routes.
pub fn configure_crud<T, ID, S>(cfg: &mut web::ServiceConfig, base_path: &str)
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
    ID: DeserializeOwned + Send + 'static,
    S: RecordService<T, ID> + 'static,
{
    let base = base_path.trim_end_matches('/');
    cfg.service(web::resource(format!("{}/list", base)).route(web::post().to(list::<T, ID, S>)))
        .service(
            web::resource(format!("{}/list/{{page_num}}/{{page_size}}", base))
                .route(web::post().to(list_page::<T, ID, S>)),
        )
        .service(
            web::resource(format!("{}/batch", base))
                .route(web::post().to(insert_batch::<T, ID, S>))
                .route(web::put().to(update_batch::<T, ID, S>))
                .route(web::delete().to(delete_batch::<T, ID, S>)),
        )
        .service(
            web::resource(format!("{}/logic/batch", base))
                .route(web::delete().to(delete_logic_batch::<T, ID, S>)),
        )
        .service(
            web::resource(format!("{}/logic/{{id}}", base))
                .route(web::delete().to(delete_logic::<T, ID, S>)),
        )
        .service(
            web::resource(format!("{}/{{id}}", base))
                .route(web::get().to(get::<T, ID, S>))
                .route(web::delete().to(delete::<T, ID, S>)),
        )
        .service(
            web::resource(base.to_string())
                .route(web::post().to(insert::<T, ID, S>))
                .route(web::put().to(update::<T, ID, S>)),
        );
}

async fn list<T, ID, S>(svc: web::Data<S>, filter: web::Json<T>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let records = svc.list(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

async fn list_page<T, ID, S>(
    req: HttpRequest,
    svc: web::Data<S>,
    path: web::Path<(i64, i64)>,
    filter: web::Json<T>,
) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let (page_num, page_size) = path.into_inner();
    let page = svc.list_page(&filter, page_num, page_size).await?;

    let base = req.path().rsplitn(3, '/').nth(2).unwrap_or_default();
    let link = build_link_header(base, page.page_num, page.page_size, page.pages);
    Ok(HttpResponse::Ok()
        .insert_header((header::LINK, link))
        .json(ApiResponse::success(page)))
}

async fn get<T, ID, S>(svc: web::Data<S>, id: web::Path<ID>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    // 未找到时 data 为 null / data is null when nothing was found
    let record = svc.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse {
        data: record,
        ..ApiResponse::ok()
    }))
}

async fn insert<T, ID, S>(svc: web::Data<S>, record: web::Json<T>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let mut record = record.into_inner();
    svc.insert(&mut record).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

async fn update<T, ID, S>(svc: web::Data<S>, record: web::Json<T>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let mut record = record.into_inner();
    svc.update(&mut record).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

async fn delete<T, ID, S>(svc: web::Data<S>, id: web::Path<ID>) -> HandlerResult
where
    T: Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    svc.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::ok()))
}

async fn delete_logic<T, ID, S>(svc: web::Data<S>, id: web::Path<ID>) -> HandlerResult
where
    T: Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    svc.delete_logic(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::ok()))
}

async fn insert_batch<T, ID, S>(svc: web::Data<S>, records: web::Json<Vec<T>>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let mut records = records.into_inner();
    svc.insert_batch(&mut records).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

async fn update_batch<T, ID, S>(svc: web::Data<S>, records: web::Json<Vec<T>>) -> HandlerResult
where
    T: Serialize + Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    let mut records = records.into_inner();
    svc.update_batch(&mut records).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

async fn delete_batch<T, ID, S>(svc: web::Data<S>, records: web::Json<Vec<T>>) -> HandlerResult
where
    T: Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    svc.delete_batch(&records).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::ok()))
}

async fn delete_logic_batch<T, ID, S>(
    svc: web::Data<S>,
    records: web::Json<Vec<T>>,
) -> HandlerResult
where
    T: Send + Sync,
    ID: Send,
    S: RecordService<T, ID>,
{
    svc.delete_logic_batch(&records).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::ok()))
}
