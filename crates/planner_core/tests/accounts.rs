use planner_core::db::open_db_in_memory;
use planner_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use planner_core::service::account_service::{
    AccountError, AccountService, IdentityError, IdentityProvider, Session, SignUpRequest,
};
use std::cell::RefCell;
use uuid::Uuid;

/// Provider that remembers issued ids by email.
#[derive(Default)]
struct FakeIdentity {
    issued: RefCell<Vec<Session>>,
}

impl IdentityProvider for FakeIdentity {
    fn sign_up(&self, email: &str, _password: &str) -> Result<Session, IdentityError> {
        if self.issued.borrow().iter().any(|session| session.email == email) {
            return Err(IdentityError("User already registered".to_string()));
        }
        let session = Session {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
        };
        self.issued.borrow_mut().push(session.clone());
        Ok(session)
    }

    fn sign_in(&self, email: &str, _password: &str) -> Result<Session, IdentityError> {
        self.issued
            .borrow()
            .iter()
            .find(|session| session.email == email)
            .cloned()
            .ok_or_else(|| IdentityError("Invalid login credentials".to_string()))
    }
}

fn request(email: &str, password: &str, confirm: &str) -> SignUpRequest {
    SignUpRequest {
        full_name: Some("  Ada Lovelace ".to_string()),
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    }
}

#[test]
fn sign_up_creates_profile_for_issued_id() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
    let identity = FakeIdentity::default();

    let profile = accounts
        .sign_up(&identity, request("Ada@Example.com", "analytical", "analytical"))
        .unwrap();

    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
    let stored = SqliteProfileRepository::new(&conn)
        .get_profile(profile.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored, profile);
}

#[test]
fn password_rules_are_checked_before_provider() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
    let identity = FakeIdentity::default();

    let mismatch = accounts
        .sign_up(&identity, request("ada@example.com", "analytical", "analytica1"))
        .unwrap_err();
    assert_eq!(mismatch.user_message(), "Passwords do not match");

    let short = accounts
        .sign_up(&identity, request("ada@example.com", "short", "short"))
        .unwrap_err();
    assert_eq!(short.user_message(), "Password must be at least 8 characters");
    assert!(identity.issued.borrow().is_empty());
}

#[test]
fn provider_rejection_surfaces_its_message() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
    let identity = FakeIdentity::default();

    accounts
        .sign_up(&identity, request("ada@example.com", "analytical", "analytical"))
        .unwrap();
    let err = accounts
        .sign_up(&identity, request("ada@example.com", "analytical", "analytical"))
        .unwrap_err();
    assert!(matches!(err, AccountError::Identity(_)));
    assert_eq!(err.user_message(), "User already registered");
}

#[test]
fn sign_in_recreates_missing_profile() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
    let identity = FakeIdentity::default();
    identity.sign_up("grace@example.com", "compiler1").unwrap();

    let (session, profile) = accounts
        .sign_in(&identity, "grace@example.com", "compiler1")
        .unwrap();
    assert_eq!(profile.id, session.user_id);
    assert!(accounts.get_profile(session.user_id).unwrap().is_some());

    let found = accounts
        .find_profile_by_email("GRACE@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, session.user_id);
}

#[test]
fn full_name_can_be_updated_and_cleared() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
    let identity = FakeIdentity::default();
    let profile = accounts
        .sign_up(&identity, request("ada@example.com", "analytical", "analytical"))
        .unwrap();

    let renamed = accounts
        .update_full_name(profile.id, Some("Countess".to_string()))
        .unwrap();
    assert_eq!(renamed.display_name(), "Countess");

    let cleared = accounts.update_full_name(profile.id, Some("  ".to_string())).unwrap();
    assert_eq!(cleared.full_name, None);
}
