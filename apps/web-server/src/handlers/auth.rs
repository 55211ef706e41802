//! Account handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, HttpResponseBuilder, web};

use yatube_core::domain::User;
use yatube_shared::dto::{AuthResponse, LoginRequest, SignupRequest, StaticPage, UserResponse};

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Respond with a fresh token, in the body and as a cookie for form posts.
fn issue_token(
    state: &AppState,
    user: &User,
    mut response: HttpResponseBuilder,
) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;
    let expires_in = state.tokens.expiration_seconds();

    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(expires_in))
        .finish();

    Ok(response.cookie(cookie).json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expires_in.max(0) as u64,
    }))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    User::validate_username(&req.username)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .insert(User::new(req.username, password_hash))
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    issue_token(&state, &user, HttpResponse::Created())
}

/// GET /auth/login/
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok().json(StaticPage {
        title: "Log in".to_string(),
        body: "POST a JSON body with username and password to this address.".to_string(),
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %user.username, "Login failed");
        return Err(AppError::Unauthorized);
    }

    issue_token(&state, &user, HttpResponse::Ok())
}

/// GET /auth/me/ - Protected route
pub async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse {
        id: identity.user_id,
        username: identity.username,
    })
}
