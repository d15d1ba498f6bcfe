use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{page, redirect};
use crate::error::AppResult;
use crate::middleware::{PageForm, PageQuery, Session};
use crate::routes::{return_target, safe_return_to, Route};
use crate::services::auth::{self, LoginForm, RegisterForm, RegisterOutcome};
use crate::session::FlashMessage;
use crate::views::pages::{self, RegisterValues};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(Route::Login.path(), get(login_page).post(login))
        .route(Route::Register.path(), get(register_page).post(register))
        .route(Route::Logout.path(), post(logout))
}

#[derive(Debug, Deserialize)]
struct ReturnToQuery {
    return_to: Option<String>,
}

fn with_status(mut response: Response, status: StatusCode) -> Response {
    *response.status_mut() = status;
    response
}

// GET /login
async fn login_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    PageQuery(params): PageQuery<ReturnToQuery>,
) -> AppResult<Response> {
    if session.current_user(&state).await?.is_some() {
        let target = return_target(params.return_to.as_deref(), Route::Home);
        return redirect(&state, session, &target).await;
    }

    let return_to = safe_return_to(params.return_to.as_deref());
    let body = pages::login_form("", return_to.as_deref(), &[]);
    page(&state, session, "Log in", None, body).await
}

// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    PageForm(form): PageForm<LoginForm>,
) -> AppResult<Response> {
    match auth::authenticate(&*state.users, &form.email, &form.password).await? {
        Some(user) => {
            session.log_in(user.user_id);
            session.flash(FlashMessage::success(format!("Welcome back, {}!", user.first_name)));
            let target = return_target(form.return_to.as_deref(), Route::Home);
            redirect(&state, session, &target).await
        }
        None => {
            let return_to = safe_return_to(form.return_to.as_deref());
            let body = pages::login_form(
                &form.email,
                return_to.as_deref(),
                &["Invalid email or password.".to_string()],
            );
            let response = page(&state, session, "Log in", None, body).await?;
            Ok(with_status(response, StatusCode::UNAUTHORIZED))
        }
    }
}

// GET /register
async fn register_page(State(state): State<Arc<AppState>>, session: Session) -> AppResult<Response> {
    if session.current_user(&state).await?.is_some() {
        return redirect(&state, session, Route::Home.path()).await;
    }

    let values = RegisterValues { email: "", first_name: "", surname: "" };
    let body = pages::register_form(&values, &[]);
    page(&state, session, "Register", None, body).await
}

// POST /register
async fn register(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    PageForm(form): PageForm<RegisterForm>,
) -> AppResult<Response> {
    let (email, first_name, surname) = (form.email.clone(), form.first_name.clone(), form.surname.clone());

    let (status, errors) = match auth::register(&*state.users, form, state.config.auth.bcrypt_cost).await? {
        RegisterOutcome::Registered(user) => {
            session.log_in(user.user_id);
            session.flash(FlashMessage::success("Welcome to Catchify! Your account is ready."));
            return redirect(&state, session, Route::Home.path()).await;
        }
        RegisterOutcome::EmailTaken => (
            StatusCode::CONFLICT,
            vec!["An account with this email already exists.".to_string()],
        ),
        RegisterOutcome::Invalid(messages) => (StatusCode::UNPROCESSABLE_ENTITY, messages),
    };

    let values = RegisterValues {
        email: &email,
        first_name: &first_name,
        surname: &surname,
    };
    let body = pages::register_form(&values, &errors);
    let response = page(&state, session, "Register", None, body).await?;
    Ok(with_status(response, status))
}

// POST /logout
async fn logout(State(state): State<Arc<AppState>>, mut session: Session) -> AppResult<Response> {
    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id, "user logged out");
    }
    session.log_out();
    redirect(&state, session, Route::Home.path()).await
}
