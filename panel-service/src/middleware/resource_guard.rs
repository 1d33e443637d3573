//! HTTP binding of [`ResourceGuard`].

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use service_core::error::AppError;
use std::collections::HashMap;

use super::auth::principal_from_extensions;
use crate::models::PermissionLevel;
use crate::services::{Decision, DenialReason, Operation, ResourceGuard};

/// Path parameter naming the targeted server.
pub const SERVER_ID_PARAM: &str = "server_id";

/// Guard applied to a route: which tier, read from which path parameter.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    pub guard: ResourceGuard,
    pub param: &'static str,
}

impl RouteGuard {
    pub fn server(required_level: PermissionLevel) -> Self {
        Self {
            guard: ResourceGuard::new(required_level),
            param: SERVER_ID_PARAM,
        }
    }
}

/// Must sit behind [`super::auth_middleware`]; mount with
/// `from_fn_with_state(RouteGuard::server(level), resource_guard_middleware)`.
pub async fn resource_guard_middleware(
    State(route): State<RouteGuard>,
    params: Option<Path<HashMap<String, String>>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = principal_from_extensions(req.extensions())?;
    let path = req.uri().path().to_string();
    let resource_id = params
        .as_ref()
        .and_then(|Path(params)| params.get(route.param))
        .map(String::as_str);

    let decision = route.guard.authorize(&Operation {
        resource_id,
        principal: &principal,
        path: &path,
    });

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny(denial) => {
            let reason = match denial.reason {
                DenialReason::MissingResourceId => "missing_resource_id",
                DenialReason::InsufficientPermission { .. } => "insufficient_permission",
            };
            tracing::warn!(
                principal_id = %principal.id,
                resource_id = resource_id.unwrap_or(""),
                required_level = %route.guard.required_level(),
                path = %path,
                reason,
                "Authorization denied"
            );
            record_denial(reason, route.guard.required_level());

            Ok(denial.into_response())
        }
    }
}

fn record_denial(reason: &'static str, required_level: PermissionLevel) {
    counter!(
        "authorization_denials_total",
        "reason" => reason,
        "required_level" => required_level.as_str()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_denials_are_counted_per_tier() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_denial("insufficient_permission", PermissionLevel::Editor);
            record_denial("insufficient_permission", PermissionLevel::Editor);
            record_denial("missing_resource_id", PermissionLevel::Viewer);
        });

        let rendered = handle.render();
        let samples: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("authorization_denials_total{"))
            .collect();

        assert_eq!(samples.len(), 2);
        let editor = samples
            .iter()
            .find(|line| line.contains(r#"required_level="Editor""#))
            .unwrap();
        assert!(editor.contains(r#"reason="insufficient_permission""#));
        assert!(editor.ends_with(" 2"));

        let viewer = samples
            .iter()
            .find(|line| line.contains(r#"required_level="Viewer""#))
            .unwrap();
        assert!(viewer.contains(r#"reason="missing_resource_id""#));
        assert!(viewer.ends_with(" 1"));
    }
}
