//! User identity service implementing the credential lifecycle ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    LoginService, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    Error, LoginCredentials, Password, PasswordVerifier, User, UserId, UserSnapshot, Username,
};

/// Identity service over a user repository.
///
/// Registration derives an Argon2 verifier before anything touches the
/// repository; the plaintext password never leaves the request scope.
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict(format!("username already taken: {username}"))
            }
            UserPersistenceError::Missing { id } => {
                Error::not_found(format!("no user with id {id}"))
            }
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn register(
        &self,
        username: Username,
        password: &Password,
    ) -> Result<UserSnapshot, Error> {
        let verifier = PasswordVerifier::derive(password)
            .map_err(|err| Error::internal(format!("failed to derive verifier: {err}")))?;
        let user = User::new(UserId::random(), username, verifier);

        self.repo
            .insert(&user)
            .await
            .map_err(Self::map_persistence_error)?;

        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(user.snapshot())
    }

    async fn rename(&self, id: &UserId, username: Username) -> Result<UserSnapshot, Error> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no user with id {id}")))?;

        user.rename(username);
        self.repo
            .update(&user)
            .await
            .map_err(Self::map_persistence_error)?;

        info!(user_id = %user.id(), username = %user.username(), "user renamed");
        Ok(user.snapshot())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get(&self, id: &UserId) -> Result<UserSnapshot, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .map(|user| user.snapshot())
            .ok_or_else(|| Error::not_found(format!("no user with id {id}")))
    }

    async fn list(&self) -> Result<Vec<UserSnapshot>, Error> {
        let users = self
            .repo
            .list()
            .await
            .map_err(Self::map_persistence_error)?;
        Ok(users.iter().map(User::snapshot).collect())
    }
}

#[async_trait]
impl<R> LoginService for UserService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(user) = self
            .repo
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_persistence_error)?
        else {
            // Same sentinel for unknown users and wrong passwords.
            return Err(Error::unauthorized("invalid credentials"));
        };

        let matches = user
            .verifier()
            .matches(credentials.password())
            .map_err(|err| Error::internal(format!("stored verifier unreadable: {err}")))?;

        if matches {
            Ok(*user.id())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
