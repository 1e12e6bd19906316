//! Account and profile domain service: registration, login, profile access.
//!
//! Registration delegates to the repository's transactional
//! create-with-profile so an empty profile exists for every registered
//! principal. Credential failures never reveal whether the username exists.

use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::domain::ports::{
    Account, AccountAccess, AccountRepository, AccountRepositoryError, NewAccount, Registration,
    UserProfileRepository, UserProfileRepositoryError,
};
use crate::domain::principal::{Principal, UserId};
use crate::domain::profile::{ProfileUpdate, UserProfile};
use crate::domain::Error;

const MIN_PASSWORD_CHARS: usize = 8;
const MAX_USERNAME_CHARS: usize = 64;

/// Account service implementing the driving port.
#[derive(Clone)]
pub struct AccountsService<A, P> {
    accounts: Arc<A>,
    profiles: Arc<P>,
}

impl<A, P> AccountsService<A, P> {
    /// Create a new service over the account and profile stores.
    pub fn new(accounts: Arc<A>, profiles: Arc<P>) -> Self {
        Self { accounts, profiles }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account store unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername { username } => {
            Error::invalid_request(format!("username {username} is already registered"))
                .with_details(json!({ "field": "username", "code": "duplicate_username" }))
        }
    }
}

fn map_profile_error(error: UserProfileRepositoryError) -> Error {
    match error {
        UserProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        UserProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
    }
}

fn validate_registration(registration: &Registration) -> Result<(), Error> {
    let username = registration.username.trim();
    if username.is_empty() {
        return Err(Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(Error::invalid_request(format!(
            "username must be at most {MAX_USERNAME_CHARS} characters"
        ))
        .with_details(json!({ "field": "username", "code": "username_too_long" })));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(Error::invalid_request("username must not contain whitespace")
            .with_details(json!({ "field": "username", "code": "username_whitespace" })));
    }
    if registration.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(Error::invalid_request(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        ))
        .with_details(json!({ "field": "password", "code": "password_too_short" })));
    }
    Ok(())
}

fn generate_salt() -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl<A, P> AccountAccess for AccountsService<A, P>
where
    A: AccountRepository,
    P: UserProfileRepository,
{
    async fn register(&self, registration: Registration) -> Result<Account, Error> {
        validate_registration(&registration)?;
        let salt = generate_salt();
        let new_account = NewAccount {
            id: UserId::random(),
            username: registration.username.trim().to_owned(),
            password_digest: hash_password(&salt, &registration.password),
            password_salt: salt,
        };
        self.accounts
            .create_with_profile(&new_account)
            .await
            .map_err(map_account_error)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Principal, Error> {
        let credentials = self
            .accounts
            .find_credentials(username)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        let presented = hash_password(&credentials.password_salt, password);
        if presented != credentials.password_digest {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(Principal::new(
            credentials.account.id,
            credentials.account.is_admin,
        ))
    }

    async fn fetch_profile(
        &self,
        principal: &Principal,
        user_id: &UserId,
    ) -> Result<UserProfile, Error> {
        principal.authorize_owner(user_id, "profile")?;
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        principal.authorize_owner(user_id, "profile")?;
        if update.is_empty() {
            return Err(Error::invalid_request("profile update contains no fields"));
        }
        self.profiles
            .update(user_id, &update)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }
}
