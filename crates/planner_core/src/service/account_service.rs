//! Account use-case service.
//!
//! # Responsibility
//! - Validate sign-up forms before reaching the identity provider.
//! - Create the profile row for a newly issued identity.
//!
//! # Invariants
//! - Passwords never reach storage; only the provider sees them.
//! - A profile exists for every user after a successful sign-up or sign-in.

use crate::model::profile::Profile;
use crate::model::UserId;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
}

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError(pub String);

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for IdentityError {}

/// External email/password identity service.
pub trait IdentityProvider {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
}

#[derive(Debug)]
pub enum AccountError {
    InvalidEmail,
    PasswordMismatch,
    PasswordTooShort,
    Identity(IdentityError),
    Repo(RepoError),
}

impl AccountError {
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail => "Please enter a valid email address".to_string(),
            Self::PasswordMismatch => "Passwords do not match".to_string(),
            Self::PasswordTooShort => {
                format!("Password must be at least {MIN_PASSWORD_CHARS} characters")
            }
            Self::Identity(err) => err.0.clone(),
            Self::Repo(_) => "Failed to create account. Please try again.".to_string(),
        }
    }
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::PasswordMismatch => write!(f, "password confirmation does not match"),
            Self::PasswordTooShort => {
                write!(f, "password shorter than {MIN_PASSWORD_CHARS} characters")
            }
            Self::Identity(err) => write!(f, "identity provider error: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Identity(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<IdentityError> for AccountError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub full_name: Option<String>,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Checks the sign-up form in display order.
pub fn validate_sign_up(request: &SignUpRequest) -> Result<(), AccountError> {
    if !EMAIL_RE.is_match(request.email.trim()) {
        return Err(AccountError::InvalidEmail);
    }
    if request.password != request.confirm_password {
        return Err(AccountError::PasswordMismatch);
    }
    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AccountError::PasswordTooShort);
    }
    Ok(())
}

pub struct AccountService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates the form, registers with the provider and creates the profile.
    pub fn sign_up<I: IdentityProvider>(
        &self,
        identity: &I,
        request: SignUpRequest,
    ) -> Result<Profile, AccountError> {
        validate_sign_up(&request)?;
        let email = request.email.trim().to_ascii_lowercase();
        let session = identity.sign_up(&email, &request.password).map_err(|err| {
            warn!("event=sign_up module=account status=error error_code=identity_rejected");
            AccountError::from(err)
        })?;

        let profile = Profile::new(session.user_id, session.email, request.full_name);
        self.repo.create_profile(&profile)?;
        info!("event=sign_up module=account status=ok");
        Ok(profile)
    }

    /// Signs in and makes sure the profile row exists.
    pub fn sign_in<I: IdentityProvider>(
        &self,
        identity: &I,
        email: &str,
        password: &str,
    ) -> Result<(Session, Profile), AccountError> {
        let email = email.trim().to_ascii_lowercase();
        let session = identity.sign_in(&email, password)?;
        let profile = match self.repo.get_profile(session.user_id)? {
            Some(profile) => profile,
            None => {
                let profile = Profile::new(session.user_id, session.email.clone(), None);
                self.repo.create_profile(&profile)?;
                profile
            }
        };
        info!("event=sign_in module=account status=ok");
        Ok((session, profile))
    }

    pub fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, AccountError> {
        Ok(self.repo.get_profile(user_id)?)
    }

    pub fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AccountError> {
        Ok(self
            .repo
            .find_profile_by_email(&email.trim().to_ascii_lowercase())?)
    }

    pub fn update_full_name(
        &self,
        user_id: UserId,
        full_name: Option<String>,
    ) -> Result<Profile, AccountError> {
        let mut profile = self.repo.get_profile(user_id)?.ok_or(AccountError::Repo(
            RepoError::NotFound {
                entity: "profile",
                id: user_id,
            },
        ))?;
        profile.full_name = full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self.repo.update_profile(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_sign_up, AccountError, SignUpRequest};

    fn request(email: &str, password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            full_name: None,
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        validate_sign_up(&request("ada@example.com", "longenough", "longenough")).unwrap();
    }

    #[test]
    fn mismatch_is_reported_before_length() {
        let err = validate_sign_up(&request("ada@example.com", "short", "other")).unwrap_err();
        assert!(matches!(err, AccountError::PasswordMismatch));
        assert_eq!(err.user_message(), "Passwords do not match");
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_sign_up(&request("ada@example.com", "1234567", "1234567")).unwrap_err();
        assert_eq!(err.user_message(), "Password must be at least 8 characters");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = validate_sign_up(&request("ada.example.com", "longenough", "longenough"))
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidEmail));
    }
}
