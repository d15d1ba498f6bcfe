use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub surname: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub registered_at: NaiveDateTime,
    pub last_logged_in: Option<NaiveDateTime>,
}

impl User {
    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(password, &self.password_hash)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Registration payload after validation and hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub surname: String,
}
