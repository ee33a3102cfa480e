use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the authenticated user's id, set by the auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role, set by the auth gateway
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Role granted by the auth gateway
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Anything other than the literal ADMIN role is a regular user
    fn from_header(value: &str) -> Self {
        if value.trim() == "ADMIN" {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Caller identity established by the upstream auth gateway.
///
/// Credential validation happens before requests reach this service; the
/// gateway strips any client-supplied identity headers and injects its
/// own. This extractor only reads them. Routes that take an
/// [`AuthIdentity`] parameter reject requests without one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: String,
    pub role: Role,
}

impl AuthIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthorized("User Id not found in context".to_string()))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Role::from_header)
            .unwrap_or(Role::User);

        Ok(AuthIdentity {
            user_id: user_id.to_string(),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthIdentity, AppError> {
        let (mut parts, _) = request.into_parts();
        AuthIdentity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_user_id_and_role() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .header(USER_ROLE_HEADER, "ADMIN")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();
        assert_eq!(identity.user_id, "user-1");
        assert!(identity.is_admin());
    }

    #[tokio::test]
    async fn test_missing_user_id_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();

        let result = extract(request).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_blank_user_id_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();

        let result = extract(request).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_missing_role_defaults_to_user() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();
        assert_eq!(identity.role, Role::User);
        assert!(!identity.is_admin());
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_admin() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .header(USER_ROLE_HEADER, "MODERATOR")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();
        assert!(!identity.is_admin());
    }
}
