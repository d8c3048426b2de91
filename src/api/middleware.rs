/// Request identity extraction
///
/// Session handling lives in front of this service; requests arrive with the
/// authenticated username in a header. No token validation happens here.
use crate::error::{DeskError, DeskResult};
use axum::http::HeaderMap;

/// Header carrying the authenticated username
pub const USER_HEADER: &str = "x-desk-user";

/// Extract the authenticated user from request headers
pub fn require_user(headers: &HeaderMap) -> DeskResult<String> {
    let user = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if user.is_empty() {
        return Err(DeskError::Authentication(format!(
            "missing {} header",
            USER_HEADER
        )));
    }

    Ok(user.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, "alice".parse().unwrap());
        assert_eq!(require_user(&headers).unwrap(), "alice");
    }

    #[test]
    fn test_missing_header_is_authentication_error() {
        let err = require_user(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, DeskError::Authentication(_)));
    }

    #[test]
    fn test_blank_header_is_authentication_error() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, "  ".parse().unwrap());
        assert!(require_user(&headers).is_err());
    }
}
