//! Authentication route handlers.
//!
//! Handles login and registration against the local `users` table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::set_current_user;
use crate::models::CurrentUser;
use crate::services::auth::{
    AuthError, AuthService, LOGGED_IN_MESSAGE, REGISTERED_MESSAGE, Registration,
};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. Absent fields re-render the page.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Registration form data. Absent fields re-render the page.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub msg: String,
}

/// Register page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub msg: String,
}

fn form_message(err: &AuthError) -> String {
    err.form_message().unwrap_or_default().to_string()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate::default()
}

/// Handle login form submission.
///
/// On success the account is stored in the session and the bare text
/// `Logged in successfully!` is returned.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Ok(LoginTemplate::default().into_response());
    };

    let auth = AuthService::new(state.pool(), &state.config().secret_key);

    match auth.login(&username, &password).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user))
                .await
                .map_err(|e| AppError::Internal(format!("Failed to set session: {e}")))?;
            set_sentry_user(&user.id, &user.username);

            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
            Ok(LOGGED_IN_MESSAGE.into_response())
        }
        Err(AuthError::Repository(e)) => Err(e.into()),
        Err(e) => {
            tracing::warn!(username = %username, "Login failed: {e}");
            Ok(LoginTemplate {
                msg: form_message(&e),
            }
            .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate::default()
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let (Some(username), Some(password), Some(email), Some(role)) =
        (form.username, form.password, form.email, form.role)
    else {
        return Ok(RegisterTemplate::default().into_response());
    };

    let auth = AuthService::new(state.pool(), &state.config().secret_key);
    let registration = Registration {
        username: &username,
        password: &password,
        email: &email,
        role: &role,
    };

    let msg = match auth.register(registration).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = %user.role, "User registered");
            REGISTERED_MESSAGE.to_string()
        }
        Err(AuthError::Repository(e)) => return Err(e.into()),
        Err(e) => {
            tracing::info!(username = %username, "Registration rejected: {e}");
            form_message(&e)
        }
    };

    Ok(RegisterTemplate { msg }.into_response())
}
