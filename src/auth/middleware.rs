//! Authentication middleware and extractors

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::server::SharedState;
use crate::auth::jwt::{validate_token, Claims};
use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Extract session claims from a request.
///
/// Looks for a bearer token in the Authorization header first, then for the
/// session cookie.
pub fn extract_claims(req: &Request, auth: &AuthConfig) -> Result<Claims> {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return validate_token(token, auth);
            }
        }
    }

    let cookie_prefix = format!("{}=", auth.cookie_name);
    if let Some(cookie_header) = req.headers().get("Cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix(cookie_prefix.as_str()) {
                    return validate_token(token, auth);
                }
            }
        }
    }

    Err(Error::Other("No valid session token found".to_string()))
}

/// 401 body pointing clients at the configured sign-in page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnauthorizedBody {
    success: bool,
    error: String,
    sign_in: String,
}

/// Middleware for requiring an authenticated session.
///
/// On success the decoded [`Claims`] are inserted into request extensions for
/// handlers to pick up.
pub async fn require_auth(State(state): State<SharedState>, mut req: Request, next: Next) -> Response {
    match extract_claims(&req, &state.config.auth) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(UnauthorizedBody {
                success: false,
                error: e.to_string(),
                sign_in: state.config.server.sign_in_path.clone(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use crate::auth::models::User;

    fn test_user() -> User {
        let mut user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            "123456".to_string(),
        );
        user.is_verified = true;
        user
    }

    fn request_with_header(name: &str, value: &str) -> Request {
        axum::http::Request::builder()
            .method("GET")
            .uri("/")
            .header(name, value)
            .body(axum::body::Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_claims_no_token() {
        let auth = AuthConfig::default();
        let req = axum::http::Request::builder()
            .method("GET")
            .uri("/")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_claims(&req, &auth).is_err());
    }

    #[test]
    fn test_extract_claims_from_bearer() {
        let auth = AuthConfig::default();
        let token = create_token(&test_user(), &auth).unwrap();
        let req = request_with_header("Authorization", &format!("Bearer {}", token));

        let claims = extract_claims(&req, &auth).expect("bearer token should validate");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_extract_claims_from_cookie() {
        let auth = AuthConfig::default();
        let token = create_token(&test_user(), &auth).unwrap();
        let req = request_with_header(
            "Cookie",
            &format!("other=1; {}={}", auth.cookie_name, token),
        );

        let claims = extract_claims(&req, &auth).expect("cookie token should validate");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_extract_claims_rejects_tampered_token() {
        let auth = AuthConfig::default();
        let token = create_token(&test_user(), &auth).unwrap();
        let req = request_with_header("Authorization", &format!("Bearer {}x", token));

        assert!(extract_claims(&req, &auth).is_err());
    }
}
