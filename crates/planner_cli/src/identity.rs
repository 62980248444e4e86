//! Offline identity provider backed by the local profile table.
//!
//! Passwords are checked for shape by the account service and then
//! discarded; this provider only maps emails to user ids.

use planner_core::repo::profile_repo::ProfileRepository;
use planner_core::service::account_service::{IdentityError, IdentityProvider, Session};
use uuid::Uuid;

pub struct LocalIdentity<R: ProfileRepository> {
    profiles: R,
}

impl<R: ProfileRepository> LocalIdentity<R> {
    pub fn new(profiles: R) -> Self {
        Self { profiles }
    }

    fn lookup(&self, email: &str) -> Result<Option<Uuid>, IdentityError> {
        self.profiles
            .find_profile_by_email(email)
            .map(|profile| profile.map(|profile| profile.id))
            .map_err(|err| IdentityError(format!("identity lookup failed: {err}")))
    }
}

impl<R: ProfileRepository> IdentityProvider for LocalIdentity<R> {
    fn sign_up(&self, email: &str, _password: &str) -> Result<Session, IdentityError> {
        if self.lookup(email)?.is_some() {
            return Err(IdentityError("User already registered".to_string()));
        }
        Ok(Session {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
        })
    }

    fn sign_in(&self, email: &str, _password: &str) -> Result<Session, IdentityError> {
        match self.lookup(email)? {
            Some(user_id) => Ok(Session {
                user_id,
                email: email.to_string(),
            }),
            None => Err(IdentityError("Invalid login credentials".to_string())),
        }
    }
}
