use serde::Deserialize;
use tokio::task;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::error::AppResult;
use crate::models::{NewUser, User};
use crate::store::UserStore;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub return_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Surname is required."))]
    pub surname: String,
}

impl RegisterForm {
    fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.first_name = self.first_name.trim().to_string();
        self.surname = self.surname.trim().to_string();
        self
    }
}

#[derive(Debug)]
pub enum RegisterOutcome {
    Registered(User),
    EmailTaken,
    Invalid(Vec<String>),
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flattens validator output into sorted, human readable messages.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value ({})", e.code),
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages
}

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hash = task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(hash)
}

async fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let user = user.clone();
    let password = password.to_string();
    let ok = task::spawn_blocking(move || user.verify_password(&password))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(ok)
}

/// Returns the user when the credentials match an active account.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let email = normalize_email(email);
    let Some(user) = users.find_by_email(&email).await? else {
        return Ok(None);
    };

    if !user.is_active || !verify_password(&user, password).await? {
        info!(user_id = user.user_id, "login rejected");
        return Ok(None);
    }

    if let Err(e) = users.touch_last_login(user.user_id).await {
        warn!(user_id = user.user_id, "failed to update last_logged_in: {:?}", e);
    }

    info!(user_id = user.user_id, "user logged in");
    Ok(Some(user))
}

pub async fn register(
    users: &dyn UserStore,
    form: RegisterForm,
    bcrypt_cost: u32,
) -> AppResult<RegisterOutcome> {
    let form = form.normalized();
    if let Err(errors) = form.validate() {
        return Ok(RegisterOutcome::Invalid(validation_messages(&errors)));
    }

    let password_hash = hash_password(form.password, bcrypt_cost).await?;
    let created = users
        .create_user(NewUser {
            email: form.email,
            password_hash,
            first_name: form.first_name,
            surname: form.surname,
        })
        .await?;

    Ok(match created {
        Some(user) => {
            info!(user_id = user.user_id, "user registered");
            RegisterOutcome::Registered(user)
        }
        None => RegisterOutcome::EmailTaken,
    })
}
