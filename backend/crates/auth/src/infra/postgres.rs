//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::pagination::{PageRequest, Paginated, SortField};
use platform::password::HashedPassword;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::user::User;
use crate::domain::repository::{UserFilter, UserRepository, UserSortField};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, created_at, updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                full_name,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.as_str())
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.code())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND deleted_at IS NULL)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn next_user_sequence(&self, role: UserRole) -> AuthResult<i64> {
        let sql = match role {
            UserRole::Admin => "SELECT nextval('user_admin_seq')",
            UserRole::Doctor => "SELECT nextval('user_doctor_seq')",
            UserRole::Staff => "SELECT nextval('user_staff_seq')",
        };

        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageRequest<UserSortField>,
    ) -> AuthResult<Paginated<User>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_user_filters(&mut count, filter, page);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filters(&mut select, filter, page);
        select
            .push(format!(
                " ORDER BY {} {}, id ASC LIMIT ",
                page.sort.column(),
                page.order.as_sql()
            ))
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?;

        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok(Paginated::new(users, total, page))
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                email = $3,
                password_hash = $4,
                role = $5,
                updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.user_id.as_str())
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.code())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(())
    }

    async fn soft_delete_user(&self, user_id: &UserId) -> AuthResult<bool> {
        let affected = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

fn push_user_filters<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    filter: &'a UserFilter,
    page: &PageRequest<UserSortField>,
) {
    qb.push(" WHERE deleted_at IS NULL");

    if let Some(pattern) = page.search_pattern() {
        qb.push(" AND (full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role.code());
    }
}

/// The partial unique index on live emails is the final arbiter for
/// concurrent registrations.
fn map_unique_email(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::EmailTaken,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    full_name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role in users table: {}", self.role)))?;

        Ok(User {
            user_id: UserId::from_db(self.id),
            full_name: self.full_name,
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_db(self.password_hash),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
