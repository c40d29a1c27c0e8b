//! # User Repository
//!
//! Database operations for accounts. Password hashes are read and written
//! here and nowhere else; [`User`] never carries one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shop_core::{Role, User, UserId};

const USER_COLUMNS: &str = "id, username, role, full_name, email, phone";

/// An account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// PHC-format argon2 hash.
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts an account.
    ///
    /// ## Returns
    /// * `Ok(UserId)` - the new row id
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn insert(&self, user: &NewUser) -> DbResult<UserId> {
        debug!(username = %user.username, role = ?user.role, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, full_name, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("username", &user.username))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up an account together with its password hash.
    pub async fn find_credentials(&self, username: &str) -> DbResult<Option<(User, String)>> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    pub async fn exists(&self, username: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Customers ordered by full name (manager view).
    pub async fn list_customers(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY full_name, id"
        ))
        .bind(Role::Customer)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed customers");
        Ok(users)
    }

    pub async fn count_customers(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(Role::Customer)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_user, test_db};

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let id = insert_user(&db, "juan", Role::Customer, "Juan Dela Cruz").await;

        let user = db.users().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.username, "juan");
        assert_eq!(user.role, Role::Customer);

        let (found, hash) = db.users().find_credentials("juan").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(hash.starts_with("$argon2"));

        assert!(db.users().exists("juan").await.unwrap());
        assert!(db.users().get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let db = test_db().await;
        insert_user(&db, "juan", Role::Customer, "Juan Dela Cruz").await;

        let err = db
            .users()
            .insert(&NewUser {
                username: "juan".to_string(),
                password_hash: "x".to_string(),
                role: Role::Customer,
                full_name: "Other Juan".to_string(),
                email: String::new(),
                phone: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "username" && value == "juan"
        ));
    }

    #[tokio::test]
    async fn test_list_customers_excludes_managers() {
        let db = test_db().await;
        insert_user(&db, "zed", Role::Customer, "Zed Santos").await;
        insert_user(&db, "ana", Role::Customer, "Ana Reyes").await;
        insert_user(&db, "boss", Role::Manager, "Store Manager").await;

        let customers = db.users().list_customers().await.unwrap();
        let names: Vec<&str> = customers.iter().map(|u| u.full_name.as_str()).collect();
        assert_eq!(names, ["Ana Reyes", "Zed Santos"]);
        assert_eq!(db.users().count_customers().await.unwrap(), 2);
    }
}
