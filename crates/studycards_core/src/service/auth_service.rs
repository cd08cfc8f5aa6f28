//! Local email/password authentication.
//!
//! # Responsibility
//! - Own the session value read by the navigation gate.
//! - Register and sign in users against the local user store.
//!
//! # Invariants
//! - Passwords are only ever persisted as Argon2 hashes.
//! - A failed sign-in leaves `user == None`.
//! - Emails and passwords are never written to logs.

use crate::model::session::{Identity, Session, UserId};
use crate::repo::card_repo::RepoError;
use crate::repo::user_repo::{UserRecord, UserRepository};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Source of the session value consumed by navigation.
pub trait AuthProvider {
    fn session(&self) -> Session;
    /// Ends the current session. Afterwards `session().user` is `None`.
    fn logout(&mut self);
}

#[derive(Debug)]
pub enum AuthError {
    InvalidEmail,
    WeakPassword { min_chars: usize },
    EmailTaken,
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// Initial session has not been resolved yet.
    StillLoading,
    PasswordHash(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::WeakPassword { min_chars } => {
                write!(f, "password must have at least {min_chars} characters")
            }
            Self::EmailTaken => write!(f, "email is already registered"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::StillLoading => write!(f, "session is still loading"),
            Self::PasswordHash(message) => write!(f, "password hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Auth provider backed by the local user table.
pub struct LocalAuthService<R: UserRepository> {
    repo: R,
    session: Session,
}

impl<R: UserRepository> LocalAuthService<R> {
    /// Creates a provider in the loading state.
    pub fn new(repo: R) -> Self {
        Self::with_session(repo, Session::loading())
    }

    /// Creates a provider continuing an existing session value.
    pub fn with_session(repo: R, session: Session) -> Self {
        Self { repo, session }
    }

    /// Finishes initial loading, restoring `remembered` if that user still exists.
    pub fn resolve_initial_session(&mut self, remembered: Option<UserId>) -> Result<(), AuthError> {
        let user = match remembered {
            Some(id) => self.repo.find_by_id(id)?.map(identity_of),
            None => None,
        };
        let restored = user.is_some();
        self.session = Session {
            user,
            loading: false,
        };
        info!("event=auth_restore module=auth status=ok restored={restored}");
        Ok(())
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// - `InvalidEmail`, `WeakPassword` for malformed input.
    /// - `EmailTaken` when the address is already registered.
    pub fn register(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.ensure_resolved()?;
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword {
                min_chars: MIN_PASSWORD_CHARS,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?
            .to_string();

        let record = UserRecord {
            id: Uuid::new_v4(),
            email,
            password_hash,
        };
        if !self.repo.insert_user(&record)? {
            warn!("event=auth_register module=auth status=error error_code=email_taken");
            return Err(AuthError::EmailTaken);
        }

        info!(
            "event=auth_register module=auth status=ok user_id={}",
            record.id
        );
        Ok(self.sign_in(record))
    }

    /// Signs in with email and password.
    ///
    /// Any current user is signed out first, so on failure the session is
    /// anonymous even if someone was signed in before the call.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.ensure_resolved()?;
        if let Some(previous) = self.session.user.take() {
            info!(
                "event=auth_logout module=auth status=ok reason=login_attempt user_id={}",
                previous.user_id
            );
        }

        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let Some(record) = self.repo.find_by_email(&email)? else {
            warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        info!("event=auth_login module=auth status=ok user_id={}", record.id);
        Ok(self.sign_in(record))
    }

    fn sign_in(&mut self, record: UserRecord) -> Identity {
        let identity = identity_of(record);
        self.session = Session::authenticated(identity.clone());
        identity
    }

    fn ensure_resolved(&self) -> Result<(), AuthError> {
        if self.session.loading {
            return Err(AuthError::StillLoading);
        }
        Ok(())
    }
}

impl<R: UserRepository> AuthProvider for LocalAuthService<R> {
    fn session(&self) -> Session {
        self.session.clone()
    }

    fn logout(&mut self) {
        if let Some(identity) = self.session.user.take() {
            info!(
                "event=auth_logout module=auth status=ok user_id={}",
                identity.user_id
            );
        }
    }
}

fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

fn identity_of(record: UserRecord) -> Identity {
    Identity {
        user_id: record.id,
        email: record.email,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, AuthError};

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Ana@Example.COM ").expect("valid email"),
            "ana@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_malformed_addresses() {
        for raw in ["", "ana", "ana@", "ana@example", "a na@example.com"] {
            assert!(matches!(
                normalize_email(raw),
                Err(AuthError::InvalidEmail)
            ));
        }
    }
}
