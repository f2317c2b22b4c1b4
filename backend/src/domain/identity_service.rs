//! Resolves the identity asserted by the upstream gateway to a user row.

use chrono::Utc;
use tracing::info;

use super::errors::{LedgerError, LedgerResult};
use super::models::user::AuthenticatedUser;
use super::validation;
use crate::storage::{DbConnection, UserRepository};

#[derive(Clone)]
pub struct IdentityService {
    db: DbConnection,
    user_repository: UserRepository,
}

impl IdentityService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            user_repository: UserRepository,
        }
    }

    /// Look the user up by email, registering them on first sight.
    pub async fn resolve(
        &self,
        email: &str,
        display_name: Option<&str>,
    ) -> LedgerResult<AuthenticatedUser> {
        let email = validation::email(email)?;

        {
            let mut conn = self.db.acquire().await?;
            if let Some(user) = self.user_repository.find_by_email(&mut conn, &email).await? {
                return Ok(AuthenticatedUser::from(&user));
            }
        }

        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&email);

        let mut tx = self.db.begin().await?;
        if self
            .user_repository
            .insert_if_absent(&mut tx, &email, display_name, Utc::now())
            .await?
        {
            info!("Registered new user {}", email);
        }

        let user = self
            .user_repository
            .find_by_email(&mut tx, &email)
            .await?
            .ok_or_else(|| LedgerError::not_found("user"))?;
        tx.commit().await?;

        Ok(AuthenticatedUser::from(&user))
    }
}
