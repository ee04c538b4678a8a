//! Authentication middleware

use axum::{extract::Request, middleware::Next, response::Response};
use shared::models::{Actor, Capability, Role};

use crate::utils::{AppError, ErrorCode};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Authentication middleware - requires identity headers on `/api/` routes
///
/// Injects [`CurrentUser`] into the request extensions.
///
/// | Error | HTTP status |
/// |-------|-------------|
/// | missing / non-numeric user id | 401 NotAuthenticated |
/// | missing / unknown role | 401 UnknownRole |
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, AppError> {
    // CORS preflight and non-API paths pass through
    if req.method() == http::Method::OPTIONS || !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let Some(id) = header(&req, USER_ID_HEADER).and_then(|v| v.parse::<i64>().ok()) else {
        tracing::warn!(uri = %req.uri(), "Request without a valid user id");
        return Err(AppError::not_authenticated());
    };

    let role = match header(&req, ROLE_HEADER).map(str::parse::<Role>) {
        Some(Ok(role)) => role,
        Some(Err(e)) => {
            tracing::warn!(uri = %req.uri(), user_id = id, error = %e, "Request with unknown role");
            return Err(AppError::with_message(ErrorCode::UnknownRole, e.to_string()));
        }
        None => {
            tracing::warn!(uri = %req.uri(), user_id = id, "Request without a role");
            return Err(AppError::new(ErrorCode::UnknownRole));
        }
    };

    req.extensions_mut().insert(CurrentUser { id, role });
    Ok(next.run(req).await)
}

/// Capability middleware - requires the caller's role to grant `capability`
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_capability(Capability::ManageOrders)));
/// ```
///
/// Returns 403 RoleRequired when the role lacks the capability.
pub fn require_capability(
    capability: Capability,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .copied()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.role.has_capability(capability) {
                tracing::warn!(
                    user_id = user.id,
                    role = %user.role,
                    ?capability,
                    uri = %req.uri(),
                    "Capability denied"
                );
                return Err(AppError::with_message(
                    ErrorCode::RoleRequired,
                    format!("role {} lacks {:?}", user.role, capability),
                ));
            }

            Ok(next.run(req).await)
        })
    }
}
