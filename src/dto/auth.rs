use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::middleware::auth::{ROLE_ADMIN, ROLE_STAFF};

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "password must have at least 8 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role == ROLE_ADMIN || role == ROLE_STAFF {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_role"))
    }
}
