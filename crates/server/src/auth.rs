use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use enjoyrecord_core::error::ApiError;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Constant-time compare of two secrets.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    a_bytes.ct_eq(b_bytes).into()
}

/// Check a provided header value against the configured admin password.
pub fn check_admin_password(required: Option<&str>, provided: Option<&str>) -> Result<(), ApiError> {
    let Some(required) = required else {
        return Ok(());
    };

    let provided = provided
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing admin password.".into()))?;

    if !constant_time_eq(provided, required) {
        return Err(ApiError::Forbidden("Invalid admin password.".into()));
    }
    Ok(())
}

/// Extractor gating admin routes on the `x-admin-password` header.
///
/// Passes everything through when no admin password is configured.
#[derive(Debug, Clone, Copy)]
pub struct AdminGate;

impl FromRequestParts<AppState> for AdminGate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok());

        check_admin_password(state.admin_password.as_deref(), provided)?;
        Ok(AdminGate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_when_unconfigured() {
        assert!(check_admin_password(None, None).is_ok());
        assert!(check_admin_password(None, Some("anything")).is_ok());
    }

    #[test]
    fn missing_or_blank_header_is_unauthorized() {
        for provided in [None, Some(""), Some("   ")] {
            let err = check_admin_password(Some("s3cret"), provided).unwrap_err();
            assert_eq!(err.status_code(), 401);
            assert_eq!(err.to_string(), "Missing admin password.");
        }
    }

    #[test]
    fn wrong_password_is_forbidden() {
        let err = check_admin_password(Some("s3cret"), Some("s3cre")).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Invalid admin password.");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(check_admin_password(Some("s3cret"), Some(" s3cret ")).is_ok());
    }
}
