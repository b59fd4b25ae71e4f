//! Handlers receive the extension through the request context.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use cfext::{Application, CloudFlare};
use tower::ServiceExt;

async fn app_name(cloudflare: CloudFlare) -> String {
    cloudflare.app_name().unwrap_or_default().to_string()
}

fn configured() -> CloudFlare {
    let mut app = Application::new("site");
    app.config_mut()
        .insert("CLOUDFLARE_AUTH_EMAIL", "user@example.com")
        .insert("CLOUDFLARE_AUTH_KEY", "secret");
    CloudFlare::new(Some(&mut app)).unwrap()
}

fn request() -> Request<Body> {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn handler_receives_the_extension() {
    let cloudflare = configured();
    let router = Router::new()
        .route("/", get(app_name))
        .layer(cloudflare.layer());

    let response = router.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"site");
}

#[tokio::test]
async fn missing_layer_is_a_server_error() {
    let router = Router::new().route("/", get(app_name));
    let response = router.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn uninitialized_extension_is_a_server_error() {
    let cloudflare: CloudFlare = CloudFlare::new(None).unwrap();
    let router = Router::new()
        .route("/", get(app_name))
        .layer(cloudflare.layer());
    let response = router.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
