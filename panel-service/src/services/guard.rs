//! Resource-scoped permission guard.
//!
//! Decides whether a principal may act on one resource instance. The check
//! is synchronous and pure: it reads the principal's grants, never mutates
//! them, and performs no I/O. The HTTP binding lives in
//! [`crate::middleware::resource_guard`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::{PermissionLevel, Principal};

/// One inbound operation addressed to a specific resource.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    /// Target extracted from the request addressing; `None` or empty when
    /// the addressing did not yield one.
    pub resource_id: Option<&'a str>,
    pub principal: &'a Principal,
    /// Echoed back on denial.
    pub path: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingResourceId,
    InsufficientPermission { required: PermissionLevel },
}

/// Structured refusal. Always maps to 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub message: String,
    pub path: String,
}

impl Denial {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Guard enforcing a minimum [`PermissionLevel`] on one kind of resource.
#[derive(Debug, Clone)]
pub struct ResourceGuard {
    required_level: PermissionLevel,
    resource_label: &'static str,
}

impl ResourceGuard {
    /// Guard for servers, the resource every panel route is scoped to.
    pub fn new(required_level: PermissionLevel) -> Self {
        Self::for_resource("server", required_level)
    }

    pub fn for_resource(resource_label: &'static str, required_level: PermissionLevel) -> Self {
        Self {
            required_level,
            resource_label,
        }
    }

    pub fn required_level(&self) -> PermissionLevel {
        self.required_level
    }

    pub fn authorize(&self, operation: &Operation<'_>) -> Decision {
        // Malformed requests are refused before looking at who sent them.
        let resource_id = match operation.resource_id {
            Some(id) if !id.is_empty() => id,
            _ => return Decision::Deny(self.missing_resource_id(operation.path)),
        };

        let principal = operation.principal;
        if principal.is_global_admin() {
            return Decision::Allow;
        }

        // No grant and a grant below the tier are the same refusal.
        match principal.grant_for(resource_id) {
            Some(grant) if grant.level.satisfies(self.required_level) => Decision::Allow,
            _ => Decision::Deny(self.insufficient_permission(operation.path)),
        }
    }

    fn missing_resource_id(&self, path: &str) -> Denial {
        Denial {
            reason: DenialReason::MissingResourceId,
            message: format!("{} id is required.", capitalize(self.resource_label)),
            path: path.to_string(),
        }
    }

    fn insufficient_permission(&self, path: &str) -> Denial {
        Denial {
            reason: DenialReason::InsufficientPermission {
                required: self.required_level,
            },
            message: format!(
                "This action requires \"{}\" {} permissions.",
                self.required_level, self.resource_label
            ),
            path: path.to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct DenialError<'a> {
    message: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct DenialBody<'a> {
    error: DenialError<'a>,
    response: &'static str,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = DenialBody {
            error: DenialError {
                message: &self.message,
                path: &self.path,
            },
            response: "Error",
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
