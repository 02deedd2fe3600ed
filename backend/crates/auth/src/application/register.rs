//! Register Use Case
//!
//! Creates a new staff account.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let full_name = required_name(input.full_name)?;
        let email = Email::new(input.email)?;
        let role = parse_role(&input.role)?;
        let password = ClearTextPassword::new(input.password)?;

        if self.user_repo.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password.hash()?;
        let sequence = self.user_repo.next_user_sequence(role).await?;
        let user = User::new(
            UserId::generate(role, sequence),
            full_name,
            email,
            password_hash,
            role,
        );

        self.user_repo.create_user(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            "User registered"
        );

        Ok(user)
    }
}

pub(crate) fn required_name(raw: String) -> AuthResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Validation("Full name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_role(raw: &str) -> AuthResult<UserRole> {
    UserRole::from_code(raw.trim()).ok_or_else(|| {
        AuthError::Validation("Role must be one of admin, doctor, staff".to_string())
    })
}
