use anyhow::Result;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::AccountId;

/// A registered user.
///
/// The password hash stays server-side: it is skipped whenever an account is
/// serialized into a response payload.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Register an account, hashing the password with bcrypt. A taken
    /// username surfaces as a uniqueness violation.
    pub async fn register(
        username: &str,
        email: &str,
        password: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let password_hash = hash(password, DEFAULT_COST)?;
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(AccountId::new())
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Check a login password against the stored hash. Any verification
    /// failure reads as a wrong password.
    pub fn verify_password(&self, password: &str) -> bool {
        verify(password, &self.password_hash).unwrap_or(false)
    }

    /// Find an account by username
    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(account)
    }

    /// Every account, for the community directory
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with_hash(password_hash: &str) -> Account {
        Account {
            id: AccountId::new(),
            username: "foo".to_string(),
            email: "foo@bar.com".to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_round_trip() {
        // Minimum cost keeps the test quick.
        let password_hash = hash("hunter2hunter2", 4).unwrap();
        let account = account_with_hash(&password_hash);
        assert!(account.verify_password("hunter2hunter2"));
        assert!(!account.verify_password("wrong-password"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let account = account_with_hash("not-a-bcrypt-hash");
        assert!(!account.verify_password("anything"));
    }

    #[test]
    fn test_password_hash_stays_out_of_payloads() {
        let password_hash = hash("hunter2hunter2", 4).unwrap();
        let account = account_with_hash(&password_hash);
        let value = serde_json::to_value(&account).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["username"], "foo");
    }
}
