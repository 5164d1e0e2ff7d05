//! 网关兜底路由集成测试 / Gateway catch-all route integration tests

use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test, web, App, HttpResponse};
use tstore_gateway::{fallback_handler, FallbackRegistry};

#[actix_web::test]
async fn unrouted_request_gets_the_fallback_response() {
    let registry = web::Data::from(Arc::new(FallbackRegistry::standard()));
    let app = test::init_service(
        App::new()
            .app_data(registry)
            .default_service(web::to(fallback_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/orders").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"fallback:/orders");
}

#[actix_web::test]
async fn every_method_and_path_is_covered() {
    let registry = web::Data::from(Arc::new(FallbackRegistry::standard()));
    let app = test::init_service(
        App::new()
            .app_data(registry)
            .default_service(web::to(fallback_handler)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/user-service/api/users/7?verbose=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"fallback:/user-service/api/users/7");
}

#[actix_web::test]
async fn registered_routes_are_served_normally() {
    let registry = web::Data::from(Arc::new(FallbackRegistry::standard()));
    let app = test::init_service(
        App::new()
            .app_data(registry)
            .route("/health", web::get().to(|| async { HttpResponse::Ok().body("UP") }))
            .default_service(web::to(fallback_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn empty_registry_answers_bad_gateway() {
    let registry = web::Data::from(Arc::new(FallbackRegistry::new()));
    let app = test::init_service(
        App::new()
            .app_data(registry)
            .default_service(web::to(fallback_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/orders").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
