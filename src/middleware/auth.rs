use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Any signed-in panel user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

/// A signed-in user holding the admin role. Admin routes take this extractor
/// instead of checking roles inside handlers.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Kitchen staff or an admin. Guards the order board: polling, the event
/// stream and moving orders along.
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

/// The platform scheduler, authenticated by `Authorization: Bearer <CRON_SECRET>`.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    if user.role == ROLE_ADMIN || user.role == ROLE_STAFF {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid Authorization scheme".into()))
}

pub fn decode_user(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

pub fn verify_cron_secret(headers: &HeaderMap, secret: Option<&str>) -> Result<(), AppError> {
    let secret = secret.ok_or(AppError::Forbidden)?;
    let token = bearer_token(headers).map_err(|_| AppError::Unauthorized)?;
    if constant_time_eq(token.as_bytes(), secret.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        decode_user(token, &state.config.jwt_secret)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, ROLE_ADMIN)?;
        Ok(AdminUser(user))
    }
}

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_staff(&user)?;
        Ok(StaffUser(user))
    }
}

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify_cron_secret(&parts.headers, state.config.cron_secret.as_deref())?;
        Ok(CronAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn cron_secret_must_match() {
        assert!(verify_cron_secret(&headers("Bearer s3cret"), Some("s3cret")).is_ok());
        assert!(matches!(
            verify_cron_secret(&headers("Bearer nope"), Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_cron_secret(&HeaderMap::new(), Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn cron_endpoint_closed_without_secret() {
        assert!(matches!(
            verify_cron_secret(&headers("Bearer anything"), None),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn token_round_trip_keeps_role() {
        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            role: ROLE_STAFF.into(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let user = decode_user(&token, "test-secret").unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(matches!(ensure_role(&user, ROLE_ADMIN), Err(AppError::Forbidden)));
        assert!(matches!(
            decode_user(&token, "other-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn staff_and_admin_pass_the_staff_check() {
        let user = |role: &str| AuthUser {
            user_id: Uuid::new_v4(),
            role: role.into(),
        };
        assert!(ensure_staff(&user(ROLE_STAFF)).is_ok());
        assert!(ensure_staff(&user(ROLE_ADMIN)).is_ok());
        assert!(matches!(ensure_staff(&user("customer")), Err(AppError::Forbidden)));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), "abc");
    }
}
