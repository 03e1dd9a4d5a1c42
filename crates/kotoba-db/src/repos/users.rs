//! User repository: registration, login and deletion.

use std::collections::BTreeMap;

use kotoba_auth::AuthError;
use kotoba_auth::password::hash_password;
use kotoba_core::entities::{NewUser, User};
use kotoba_core::responses::LoginResponse;
use serde_json::{Value, json};

use crate::descriptor::{Fields, fields, to_fields};
use crate::error::DatabaseError;
use crate::service::KotobaService;

impl KotobaService {
    /// Register a user, hashing the password and deriving the slug from the
    /// name when none is given.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a malformed email and
    /// `AlreadyExists` when the email is taken.
    pub async fn register_user(
        &self,
        name: &str,
        slug: Option<String>,
        email: &str,
        password: &str,
    ) -> Result<User, DatabaseError> {
        let mut payload = NewUser::new(name, slug, email, None)?;
        payload.hashed_password = Some(hash_password(password, self.bcrypt_cost()).await?);
        let user = self
            .users
            .insert_with_derived_slug(self.conn(), to_fields(&payload)?)
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Check a password and issue an access token for the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` (wrapped) for an unknown email
    /// or a wrong password, without saying which.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, DatabaseError> {
        let credentials = self.credentials()?;
        let user = self
            .users
            .get_one_matching(self.conn(), &fields([("email", json!(email))]))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let hash = user
            .hashed_password
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !credentials.verify(password, hash).await? {
            tracing::warn!(user_id = user.id, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        let (access_token, _) = credentials.issue_token(&user.id.to_string())?;
        Ok(LoginResponse {
            user_id: user.id,
            access_token,
        })
    }

    /// The user a token was issued for.
    ///
    /// # Errors
    ///
    /// Returns the token's `AuthError`, or `AuthError::InvalidToken` if the
    /// subject is not a user id or the user no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<User, DatabaseError> {
        let claims = self.credentials()?.decode_token(token)?;
        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("subject '{}' is not a user id", claims.sub)))?;
        self.users
            .get_by_id(self.conn(), id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken(format!("user {id} no longer exists")).into())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no user has this id.
    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        self.users
            .get_by_id(self.conn(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "user".into(),
                detail: format!("id = {id}"),
            })
    }

    /// Every user, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Timeout` or `Storage` when the query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        self.users.get_all_matching(self.conn(), &Fields::new()).await
    }

    /// Delete the one user with this name; cascades to everything they own.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if zero or several users share the name.
    pub async fn delete_user_by_name(&self, name: &str) -> Result<(), DatabaseError> {
        self.users
            .delete(self.conn(), &fields([("name", json!(name))]))
            .await?;
        tracing::info!(name, "user deleted");
        Ok(())
    }

    /// Bulk delete by column membership, e.g. `{"email": [a, b]}`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for an empty filter map.
    pub async fn delete_users(
        &self,
        filters: &BTreeMap<String, Vec<Value>>,
    ) -> Result<u64, DatabaseError> {
        let deleted = self.users.delete_bulk(self.conn(), filters).await?;
        tracing::info!(deleted, "users deleted");
        Ok(deleted)
    }
}
