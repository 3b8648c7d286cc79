/// Authentication Routes
///
/// Registration and login. Both are public; everything else in the service
/// sits behind the bearer middleware.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    check_password, compute_password_hash, verify_against_decoy, TokenAuthority, USER_ROLE,
};
use crate::configuration::PasswordSettings;
use crate::error::{AppError, AuthError};
use crate::store::{NewUser, User, UserStore};
use crate::validators::{
    is_valid_email, is_valid_name, is_valid_password, is_valid_phone_number, is_valid_role,
    is_valid_username,
};

/// User registration request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub role: Option<String>,
    pub phone_number: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user_id: i64,
}

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /auth/new-user
///
/// # Errors
/// - 400: Validation errors
/// - 409: Username already registered
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    store: web::Data<dyn UserStore>,
    password_settings: web::Data<PasswordSettings>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let username = is_valid_username(&form.username)?;
    let email = is_valid_email(&form.email)?;
    let first_name = is_valid_name("first_name", &form.first_name)?;
    let last_name = is_valid_name("last_name", &form.last_name)?;
    is_valid_password("password", &form.password)?;
    let role = is_valid_role(form.role.as_deref().unwrap_or(USER_ROLE))?;
    let phone_number = form
        .phone_number
        .as_deref()
        .map(is_valid_phone_number)
        .transpose()?;

    let hashed_password = compute_password_hash(form.password, password_settings.hash_cost).await?;

    let user_id = store
        .insert_user(NewUser {
            email,
            username,
            first_name,
            last_name,
            hashed_password,
            is_active: form.is_active,
            role,
            phone_number,
        })
        .await?;

    tracing::info!(user_id = user_id, "User registered successfully");

    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user_id,
    }))
}

/// POST /auth/token
///
/// # Errors
/// - 401: Unknown username or wrong password (same response for both)
/// - 403: Correct password, inactive account
pub async fn login(
    form: web::Form<LoginRequest>,
    store: web::Data<dyn UserStore>,
    authority: web::Data<TokenAuthority>,
    password_settings: web::Data<PasswordSettings>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let user = authenticate_user(
        store.get_ref(),
        form.username.trim(),
        form.password,
        password_settings.hash_cost,
    )
    .await?;

    let access_token = authority.issue_access_token(&user.username, user.id, &user.role)?;

    tracing::info!(user_id = user.id, "User logged in successfully");

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: authority.access_token_ttl().num_seconds(),
    }))
}

/// Unknown usernames still pay for one bcrypt verify, so timing does not
/// reveal which accounts exist.
async fn authenticate_user(
    store: &dyn UserStore,
    username: &str,
    password: String,
    hash_cost: u32,
) -> Result<User, AppError> {
    let user = match store.find_user_by_username(username).await? {
        Some(user) => user,
        None => {
            verify_against_decoy(password, hash_cost).await?;
            return Err(AuthError::UserNotFound.into());
        }
    };

    if !check_password(password, user.hashed_password.clone()).await? {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(AuthError::AccountInactive.into());
    }

    Ok(user)
}
