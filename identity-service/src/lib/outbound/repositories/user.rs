use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::NewUser;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::identity::errors::StoreError;
use crate::identity::ports::CredentialStore;

/// Postgres-backed credential store.
///
/// Schema lives in `migrations/`. The `email` column carries a unique index
/// and is matched exactly; no case folding happens on either side.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<User, StoreError> {
        let email: String = row.try_get("email").map_err(database)?;
        let role: String = row.try_get("role").map_err(database)?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(database)?),
            email: EmailAddress::new(email).map_err(|e| StoreError::Database(e.to_string()))?,
            password_hash: row.try_get("password_hash").map_err(database)?,
            first_name: row.try_get("first_name").map_err(database)?,
            last_name: row.try_get("last_name").map_err(database)?,
            role: role
                .parse::<Role>()
                .map_err(|e| StoreError::Database(e.to_string()))?,
            last_login: row.try_get("last_login").map_err(database)?,
        })
    }
}

fn database(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: UserId::new(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            last_login: None,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, last_login)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.last_login)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::EmailTaken(user.email.as_str().to_string());
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn update_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET last_login = $2
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, role, last_login
            "#,
        )
        .bind(id.0)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?;

        match row {
            Some(row) => Self::map_row(&row),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(database)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(email.to_string()));
        }

        Ok(())
    }
}
