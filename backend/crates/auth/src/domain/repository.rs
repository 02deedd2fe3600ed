//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::pagination::{PageRequest, Paginated, SortField, SortOrder};

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

/// Sortable columns of the user list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    CreatedAt,
    FullName,
    Email,
    Role,
}

impl SortField for UserSortField {
    const DEFAULT: Self = UserSortField::CreatedAt;
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created_at" => Some(UserSortField::CreatedAt),
            "full_name" => Some(UserSortField::FullName),
            "email" => Some(UserSortField::Email),
            "role" => Some(UserSortField::Role),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            UserSortField::CreatedAt => "created_at",
            UserSortField::FullName => "full_name",
            UserSortField::Email => "email",
            UserSortField::Role => "role",
        }
    }
}

/// Extra list filters
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}

/// User repository trait
///
/// Soft-deleted accounts are invisible to every read.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new account. Fails with `EmailTaken` on a live duplicate.
    async fn create_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn email_exists(&self, email: &Email) -> AuthResult<bool>;

    /// Next value of the per-role id counter. Never reused.
    async fn next_user_sequence(&self, role: UserRole) -> AuthResult<i64>;

    /// Search matches full name or email, case-insensitively.
    async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageRequest<UserSortField>,
    ) -> AuthResult<Paginated<User>>;

    async fn update_user(&self, user: &User) -> AuthResult<()>;

    /// Returns `false` if no live account had this id.
    async fn soft_delete_user(&self, user_id: &UserId) -> AuthResult<bool>;
}
