mod params;

pub use params::{FragmentQuery, PageForm, PageQuery};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::session::{new_token, FlashMessage, SessionData};
use crate::AppState;

/// Per-request view of the visitor's session.
///
/// Changes are only written back by [`Session::finish`], which also yields
/// the cookie to attach to the response.
#[derive(Debug)]
pub struct Session {
    token: String,
    data: SessionData,
    // token to drop from the store on finish (rotation or logout)
    retired_token: Option<String>,
    stored: bool,
    dirty: bool,
    logged_out: bool,
}

impl Session {
    fn fresh() -> Self {
        Session {
            token: new_token(),
            data: SessionData::default(),
            retired_token: None,
            stored: false,
            dirty: false,
            logged_out: false,
        }
    }

    fn existing(token: String, data: SessionData) -> Self {
        Session {
            token,
            data,
            retired_token: None,
            stored: true,
            dirty: false,
            logged_out: false,
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.data.user_id
    }

    /// Loads the logged-in user, ignoring accounts deactivated since login.
    pub async fn current_user(&self, state: &AppState) -> AppResult<Option<User>> {
        let Some(user_id) = self.data.user_id else {
            return Ok(None);
        };
        let user = state.users.find_by_id(user_id).await?;
        Ok(user.filter(|u| u.is_active))
    }

    /// Binds the session to `user_id` under a brand-new token.
    pub fn log_in(&mut self, user_id: i32) {
        if self.stored {
            self.retired_token = Some(std::mem::replace(&mut self.token, new_token()));
            self.stored = false;
        }
        self.data.user_id = Some(user_id);
        self.dirty = true;
    }

    pub fn log_out(&mut self) {
        self.logged_out = true;
        self.data = SessionData::default();
    }

    pub fn flash(&mut self, message: FlashMessage) {
        self.data.flash.push(message);
        self.dirty = true;
    }

    pub fn take_flash(&mut self) -> Vec<FlashMessage> {
        if self.data.flash.is_empty() {
            return Vec::new();
        }
        self.dirty = true;
        std::mem::take(&mut self.data.flash)
    }

    /// Persists pending changes and returns the cookie updates for the response.
    pub async fn finish(self, state: &AppState) -> AppResult<CookieJar> {
        let cookie_name = state.config.session.cookie_name.clone();
        let jar = CookieJar::new();

        if self.logged_out {
            if self.stored {
                state.sessions.destroy(&self.token).await?;
            }
            // Nothing to `remove` from a fresh response jar; send an expired cookie
            let mut expired = Cookie::build((cookie_name, "")).path("/").build();
            expired.make_removal();
            return Ok(jar.add(expired));
        }

        if let Some(old) = &self.retired_token {
            state.sessions.destroy(old).await?;
        }

        if !self.dirty {
            return Ok(jar);
        }

        state.sessions.save(&self.token, &self.data).await?;
        tracing::debug!(user_id = ?self.data.user_id, "session saved");

        if self.stored {
            // Cookie already points at this token
            return Ok(jar);
        }

        let cookie = Cookie::build((cookie_name, self.token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(state.config.session.secure_cookie);
        Ok(jar.add(cookie))
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string());

        if let Some(token) = token {
            if let Some(data) = state.sessions.load(&token).await? {
                return Ok(Session::existing(token, data));
            }
        }

        Ok(Session::fresh())
    }
}
