/// User self-service routes
///
/// Profile lookup and password/phone changes for the token's own user.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{check_password, compute_password_hash, Claims};
use crate::configuration::PasswordSettings;
use crate::error::{AppError, ValidationError};
use crate::store::{User, UserStore};
use crate::validators::{is_valid_password, is_valid_phone_number};

/// Profile without the password hash
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub role: String,
    pub phone_number: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            role: user.role,
            phone_number: user.phone_number,
        }
    }
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ChangePhoneNumberRequest {
    pub new_phone_number: String,
}

async fn current_user(store: &dyn UserStore, claims: &Claims) -> Result<User, AppError> {
    store
        .find_user_by_id(claims.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

/// GET /users/user-info
pub async fn get_user_info(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(store.get_ref(), &claims).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /users/change-password
///
/// # Errors
/// - 400: Current password is wrong, or the new one is invalid
pub async fn change_password(
    claims: web::ReqData<Claims>,
    body: web::Json<ChangePasswordRequest>,
    store: web::Data<dyn UserStore>,
    password_settings: web::Data<PasswordSettings>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    is_valid_password("new_password", &body.new_password)?;

    let user = current_user(store.get_ref(), &claims).await?;
    if !check_password(body.old_password, user.hashed_password).await? {
        return Err(ValidationError::Incorrect("old_password".into()).into());
    }

    let hashed = compute_password_hash(body.new_password, password_settings.hash_cost).await?;
    if !store.update_password_hash(user.id, &hashed).await? {
        return Err(AppError::not_found("User"));
    }

    tracing::info!(user_id = user.id, "Password changed");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /users/change-phone-number
pub async fn change_phone_number(
    claims: web::ReqData<Claims>,
    body: web::Json<ChangePhoneNumberRequest>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let phone_number = is_valid_phone_number(&body.new_phone_number)?;

    if !store.update_phone_number(claims.id, &phone_number).await? {
        return Err(AppError::not_found("User"));
    }

    tracing::info!(user_id = claims.id, "Phone number changed");
    Ok(HttpResponse::NoContent().finish())
}
