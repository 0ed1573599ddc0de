use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::items;
use super::handlers::stores;
use super::handlers::tags;
use super::handlers::users;
use super::middleware::require_access;
use super::middleware::require_fresh_access;
use super::middleware::require_refresh;
use crate::config::Config;
use crate::domain::item::service::ItemService;
use crate::domain::store::service::StoreService;
use crate::domain::tag::service::TagService;
use crate::domain::user::service::UserService;
use crate::outbound::mail::MailgunMailer;
use crate::outbound::repositories::SqliteItemRepository;
use crate::outbound::repositories::SqliteStoreRepository;
use crate::outbound::repositories::SqliteTagRepository;
use crate::outbound::repositories::SqliteUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<SqliteUserRepository, MailgunMailer>>,
    pub item_service: Arc<ItemService<SqliteItemRepository>>,
    pub store_service: Arc<StoreService<SqliteStoreRepository>>,
    pub tag_service: Arc<TagService<SqliteTagRepository>>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Wire the services over one SQLite pool.
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let authenticator = Authenticator::new(config.jwt.secret.as_bytes()).with_lifetimes(
            chrono::Duration::minutes(config.jwt.access_token_expiration_minutes),
            chrono::Duration::days(config.jwt.refresh_token_expiration_days),
        );

        let user_service = UserService::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(MailgunMailer::new(&config.mail)),
        )
        .with_admin_usernames(config.admin.usernames.iter().cloned())
        .with_mail_timeout(Duration::from_secs(config.mail.timeout_secs));

        Self {
            user_service: Arc::new(user_service),
            item_service: Arc::new(ItemService::new(Arc::new(SqliteItemRepository::new(
                pool.clone(),
            )))),
            store_service: Arc::new(StoreService::new(Arc::new(SqliteStoreRepository::new(
                pool.clone(),
            )))),
            tag_service: Arc::new(TagService::new(Arc::new(SqliteTagRepository::new(pool)))),
            authenticator: Arc::new(authenticator),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let access = middleware::from_fn_with_state(state.clone(), require_access);
    let fresh_access = middleware::from_fn_with_state(state.clone(), require_fresh_access);
    let refresh = middleware::from_fn_with_state(state.clone(), require_refresh);

    let user_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh", post(users::refresh).route_layer(refresh))
        .route("/logout", post(users::logout).route_layer(access.clone()))
        .route("/user/:user_id", get(users::get_user).delete(users::delete_user));

    // Guards are attached per method: PUT /item/:item_id stays open.
    let item_routes = Router::new()
        .route(
            "/item",
            get(items::list_items)
                .route_layer(access.clone())
                .merge(post(items::create_item).route_layer(fresh_access)),
        )
        .route(
            "/item/:item_id",
            get(items::get_item)
                .delete(items::delete_item)
                .route_layer(access)
                .merge(put(items::put_item)),
        );

    let store_routes = Router::new()
        .route("/store", get(stores::list_stores).post(stores::create_store))
        .route(
            "/store/:store_id",
            get(stores::get_store).delete(stores::delete_store),
        );

    let tag_routes = Router::new()
        .route(
            "/store/:store_id/tag",
            get(tags::list_store_tags).post(tags::create_tag),
        )
        .route("/tag/:tag_id", get(tags::get_tag).delete(tags::delete_tag))
        .route(
            "/item/:item_id/tag/:tag_id",
            post(tags::link_item_tag).delete(tags::unlink_item_tag),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(user_routes)
        .merge(item_routes)
        .merge(store_routes)
        .merge(tag_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminConfig;
    use crate::config::DatabaseConfig;
    use crate::config::JwtConfig;
    use crate::config::MailConfig;
    use crate::config::ServerConfig;

    async fn router() -> Router {
        let config = Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            server: ServerConfig { http_port: 0 },
            jwt: JwtConfig {
                secret: "router_test_secret_at_least_32_bytes".to_string(),
                access_token_expiration_minutes: 15,
                refresh_token_expiration_days: 30,
            },
            mail: MailConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                domain: "mg.example.com".to_string(),
                api_key: String::new(),
                from_email: "noreply@example.com".to_string(),
                timeout_secs: 1,
            },
            admin: AdminConfig::default(),
        };

        // Guards reject before any query runs, so the schema is not needed.
        let pool = SqlitePoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        create_router(AppState::new(pool, &config))
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Chair","price":1.0,"store_id":1}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_guarded_methods_require_token() {
        for (method, uri) in [
            ("GET", "/item"),
            ("POST", "/item"),
            ("GET", "/item/1"),
            ("DELETE", "/item/1"),
            ("POST", "/logout"),
            ("POST", "/refresh"),
        ] {
            let response = router().await.oneshot(request(method, uri)).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{} {} was not guarded",
                method,
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_method_is_not_allowed() {
        let response = router()
            .await
            .oneshot(request("PATCH", "/item/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
