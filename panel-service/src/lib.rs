pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::PanelConfig;
use crate::handlers::{
    app::{health_check, render_metrics},
    servers::{
        add_url, create_server, delete_server, delete_url, disable_folder, disable_url,
        enable_folder, enable_url, get_server, list_servers, start_scan, update_server,
    },
    tasks::{complete_task, list_tasks},
    users::{create_user, get_user_detail, issue_user_token, set_user_permissions},
};
use crate::middleware::{auth_middleware, require_admin, resource_guard_middleware, RouteGuard};
use crate::models::PermissionLevel;
use crate::services::{ServerStore, TaskStore, TokenService, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: PanelConfig,
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
    pub servers: Arc<dyn ServerStore>,
    pub tasks: Arc<dyn TaskStore>,
}

pub fn build_router(state: AppState) -> Router {
    let viewer = RouteGuard::server(PermissionLevel::Viewer);
    let editor = RouteGuard::server(PermissionLevel::Editor);
    let owner = RouteGuard::server(PermissionLevel::Owner);

    let protected = Router::new()
        .route(
            "/servers",
            get(list_servers).post(create_server.layer(from_fn(require_admin))),
        )
        .route(
            "/servers/:server_id",
            get(get_server.layer(from_fn_with_state(viewer, resource_guard_middleware)))
                .patch(update_server.layer(from_fn_with_state(
                    editor.clone(),
                    resource_guard_middleware,
                )))
                .delete(delete_server.layer(from_fn_with_state(owner, resource_guard_middleware))),
        )
        .route(
            "/servers/:server_id/urls",
            post(add_url.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/urls/:url_id",
            delete(delete_url.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/urls/:url_id/enable",
            post(enable_url.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/urls/:url_id/disable",
            post(disable_url.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/folders/:folder_id/enable",
            post(enable_folder.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/folders/:folder_id/disable",
            post(disable_folder.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/scan",
            post(start_scan.layer(from_fn_with_state(
                editor.clone(),
                resource_guard_middleware,
            ))),
        )
        .route(
            "/servers/:server_id/tasks/:task_id/complete",
            post(complete_task.layer(from_fn_with_state(editor, resource_guard_middleware))),
        )
        .route("/tasks", get(list_tasks))
        .route(
            "/users",
            post(create_user).route_layer(from_fn(require_admin)),
        )
        .route(
            "/users/:user_id",
            get(get_user_detail).route_layer(from_fn(require_admin)),
        )
        .route(
            "/users/:user_id/permissions",
            put(set_user_permissions).route_layer(from_fn(require_admin)),
        )
        .route(
            "/users/:user_id/tokens",
            post(issue_user_token).route_layer(from_fn(require_admin)),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .merge(protected)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(config: &PanelConfig) -> CorsLayer {
    let origins = &config.security.allowed_origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
