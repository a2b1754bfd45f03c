use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};

use super::jwt::generate_session_token;
use super::middleware::{AdminUser, AUTH_COOKIE};
use super::model::{
    CreateUserRequest, CurrentUser, LoginRequest, LoginResponse, NewUser, Role, SessionUser,
    UserInfo,
};
use crate::config::AdminSeed;
use crate::quote::model::MessageResponse;
use crate::quote::validation::{validate_email, ValidationError, ValidationErrors};
use crate::store::{StoreError, UserStore};
use crate::AppState;

fn session_cookie(token: String, state: &AppState) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.session.secure_cookie)
        .max_age(Duration::seconds(state.session.ttl_seconds))
        .finish()
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
        "Unauthorized",
        "Invalid email or password",
    ))
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(
            "Email and password are required",
        ));
    }

    let user = match state.users.find_by_email(email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            log::error!("Database error during login: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Login failed"));
        }
    };

    if !verify(&body.password, &user.password_hash).unwrap_or(false) {
        return invalid_credentials();
    }

    let token = match generate_session_token(&state.session.secret, &user, state.session.ttl_seconds)
    {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate session token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    log::info!("User {} logged in", user.email);

    HttpResponse::Ok()
        .cookie(session_cookie(token.clone(), &state))
        .json(LoginResponse {
            message: "Login successful".to_string(),
            user: SessionUser {
                email: user.email,
                role: user.role,
            },
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: state.session.ttl_seconds,
        })
}

/// Logout endpoint, clears the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout() -> impl Responder {
    let mut cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(user)
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = Vec<UserInfo>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(_admin: AdminUser, state: web::Data<AppState>) -> impl Responder {
    match state.users.list().await {
        Ok(users) => {
            let infos: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
            HttpResponse::Ok().json(infos)
        }
        Err(e) => {
            log::error!("Failed to get users: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to get users"))
        }
    }
}

/// Create new user (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/users",
    tag = "Authentication",
    request_body = CreateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid email or password"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let email = body.email.trim().to_string();

    let mut errors = ValidationErrors::new();
    validate_email(&email, "email", &mut errors);
    if body.password.is_empty() {
        errors.add(ValidationError::empty_field("password", "Password"));
    }
    if let Err(message) = errors.into_result() {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(&message));
    }

    let password_hash = match hash(&body.password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to create user"));
        }
    };

    let new_user = NewUser {
        email,
        password_hash,
        role: body.role,
    };

    match state.users.create(new_user).await {
        Ok(user) => {
            log::info!("User {} created by {}", user.email, admin.0.email);
            HttpResponse::Created().json(UserInfo::from(user))
        }
        Err(StoreError::Conflict(_)) => HttpResponse::Conflict().json(crate::ErrorResponse::new(
            "Conflict",
            "Email already exists",
        )),
        Err(e) => {
            log::error!("Failed to create user: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to create user"))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to hash admin password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create the configured admin account unless an admin already exists.
/// Returns whether an account was created.
pub async fn seed_admin(users: &dyn UserStore, seed: &AdminSeed) -> Result<bool, SeedError> {
    if users.count_admins().await? > 0 {
        log::info!("Admin account present, skipping seed");
        return Ok(false);
    }

    let password_hash = hash(&seed.password, DEFAULT_COST)?;
    match users
        .create(NewUser {
            email: seed.email.trim().to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await
    {
        Ok(user) => {
            log::info!("Seeded admin account {}", user.email);
            Ok(true)
        }
        Err(StoreError::Conflict(_)) => {
            log::warn!(
                "Admin seed email {} already belongs to a non-admin user",
                seed.email
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me))
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user)),
    );
}
