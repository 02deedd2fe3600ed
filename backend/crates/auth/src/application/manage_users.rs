//! User Management Use Case
//!
//! Listing, lookup, update and soft delete of staff accounts.

use std::sync::Arc;

use kernel::pagination::{PageRequest, Paginated};
use platform::password::ClearTextPassword;

use crate::application::register::{parse_role, required_name};
use crate::domain::entity::{auth_context::AuthContext, user::User, user::UserChanges};
use crate::domain::repository::{UserFilter, UserRepository, UserSortField};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Update input. Absent or blank fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// User management use case
pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn list(
        &self,
        filter: UserFilter,
        page: PageRequest<UserSortField>,
    ) -> AuthResult<Paginated<User>> {
        self.user_repo.list_users(&filter, &page).await
    }

    pub async fn get(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(
        &self,
        caller: &AuthContext,
        user_id: &UserId,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        if !caller.may_manage(user_id) {
            return Err(AuthError::Forbidden("You can only update your own account"));
        }

        let mut user = self.get(user_id).await?;
        let changes = self.build_changes(caller, &user, input).await?;

        user.apply(changes);
        self.user_repo.update_user(&user).await?;

        tracing::info!(user_id = %user.user_id, updated_by = %caller.user_id, "User updated");

        Ok(user)
    }

    pub async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        if !self.user_repo.soft_delete_user(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    async fn build_changes(
        &self,
        caller: &AuthContext,
        current: &User,
        input: UpdateUserInput,
    ) -> AuthResult<UserChanges> {
        let mut changes = UserChanges::default();

        if let Some(full_name) = present(input.full_name) {
            changes.full_name = Some(required_name(full_name)?);
        }

        if let Some(email) = present(input.email) {
            let email = Email::new(email)?;
            if email != current.email {
                if self.user_repo.email_exists(&email).await? {
                    return Err(AuthError::EmailTaken);
                }
                changes.email = Some(email);
            }
        }

        if let Some(password) = present(input.password) {
            changes.password_hash = Some(ClearTextPassword::new(password)?.hash()?);
        }

        if let Some(role) = present(input.role) {
            let role = parse_role(&role)?;
            if role != current.role {
                if !caller.role.is_admin() {
                    return Err(AuthError::Forbidden("Only admin can change roles"));
                }
                changes.role = Some(role);
            }
        }

        Ok(changes)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
