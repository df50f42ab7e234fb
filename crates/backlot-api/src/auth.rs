//! Admin API key authentication
//!
//! Every admin route requires `Authorization: Bearer <key>` matching the
//! configured admin API key. Comparison is constant-time.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use backlot_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AdminAuthState {
    pub admin_api_key: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    if secure_compare(token, &auth_state.admin_api_key) {
        return next.run(request).await;
    }

    HttpAppError(AppError::Unauthorized("Invalid API key".to_string())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_compare_matches_equal_keys() {
        assert!(secure_compare("backlot-admin", "backlot-admin"));
    }

    #[test]
    fn test_secure_compare_rejects_different_keys() {
        assert!(!secure_compare("backlot-admin", "backlot-edmin"));
    }

    #[test]
    fn test_secure_compare_rejects_length_mismatch() {
        assert!(!secure_compare("backlot", "backlot-admin"));
        assert!(!secure_compare("backlot-admin", ""));
    }
}
