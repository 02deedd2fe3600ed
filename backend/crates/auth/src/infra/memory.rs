//! In-memory user store
//!
//! Used by router tests and by crates that need accounts without a database.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::pagination::{PageRequest, Paginated, SortOrder};
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::{UserFilter, UserRepository, UserSortField};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    deleted: HashMap<UserId, User>,
    sequences: HashMap<UserRole, i64>,
}

impl State {
    fn email_in_use(&self, email: &Email, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|u| &u.email == email && Some(&u.user_id) != except)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if state.email_in_use(&user.email, None) {
            return Err(AuthError::EmailTaken);
        }
        state.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.state.read().await.email_in_use(email, None))
    }

    async fn next_user_sequence(&self, role: UserRole) -> AuthResult<i64> {
        let mut state = self.state.write().await;
        let counter = state.sequences.entry(role).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageRequest<UserSortField>,
    ) -> AuthResult<Paginated<User>> {
        let state = self.state.read().await;
        let needle = page.search.as_deref().map(str::to_lowercase);

        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .filter(|u| match &needle {
                Some(n) => u.full_name.to_lowercase().contains(n) || u.email.as_str().contains(n),
                None => true,
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| {
            let ord = match page.sort {
                UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                UserSortField::FullName => a.full_name.cmp(&b.full_name),
                UserSortField::Email => a.email.as_str().cmp(b.email.as_str()),
                UserSortField::Role => a.role.code().cmp(b.role.code()),
            };
            let ord = match page.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then_with(|| a.user_id.as_str().cmp(b.user_id.as_str()))
        });

        Ok(page.window(users))
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if state.email_in_use(&user.email, Some(&user.user_id)) {
            return Err(AuthError::EmailTaken);
        }
        match state.users.get_mut(&user.user_id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(AuthError::UserNotFound),
        }
    }

    async fn soft_delete_user(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        match state.users.remove(user_id) {
            Some(user) => {
                state.deleted.insert(user_id.clone(), user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
