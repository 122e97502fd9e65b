//! Authentication service
//!
//! Local stand-in for a hosted identity provider: sign-up, sign-in and
//! sign-out against the user repository, the persisted session that gates
//! every expense operation, and the re-authenticate-then-update password flow.

use crate::audit::{EntityType, Operation};
use crate::config::Settings;
use crate::crypto::{hash_password, verify_password};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::user::is_valid_email;
use crate::models::User;
use crate::storage::{Session, Storage};

/// Service for user accounts and the sign-in session
pub struct AuthService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Register a new user and sign them in
    pub fn sign_up(&self, email: &str, password: &str) -> ExpenseResult<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ExpenseError::Validation(
                "Email and password are required.".into(),
            ));
        }
        if !is_valid_email(email) {
            return Err(ExpenseError::Validation(
                "The email address is badly formatted.".into(),
            ));
        }
        self.check_password_length(password)?;

        let user = User::new(email, hash_password(password)?);
        self.storage.users.insert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.short(),
            Some(user.email.clone()),
            &serde_json::json!({ "email": user.email }),
        )?;

        self.start_session(&user)?;
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub fn sign_in(&self, email: &str, password: &str) -> ExpenseResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ExpenseError::Validation(
                "Email and password are required.".into(),
            ));
        }

        let user = self
            .storage
            .users
            .find_by_email(email)?
            .ok_or(ExpenseError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ExpenseError::InvalidCredentials);
        }

        self.start_session(&user)?;
        Ok(user)
    }

    fn start_session(&self, user: &User) -> ExpenseResult<()> {
        self.storage.session.save(&Session::for_user(user))?;
        self.storage
            .log_auth(Operation::SignIn, user.id, &user.email)
    }

    /// Sign out; returns the email of the user who was signed in, if any
    pub fn sign_out(&self) -> ExpenseResult<Option<String>> {
        let session = self.storage.session.load()?;
        self.storage.session.clear()?;

        if let Some(session) = &session {
            self.storage
                .log_auth(Operation::SignOut, session.user_id, &session.email)?;
        }

        Ok(session.map(|s| s.email))
    }

    /// The signed-in user, if any.
    ///
    /// A session pointing at a user that no longer exists is discarded.
    pub fn current_user(&self) -> ExpenseResult<Option<User>> {
        let session = match self.storage.session.load()? {
            Some(session) => session,
            None => return Ok(None),
        };

        match self.storage.users.get(session.user_id)? {
            Some(user) => Ok(Some(user)),
            None => {
                self.storage.session.clear()?;
                Ok(None)
            }
        }
    }

    /// The signed-in user, or `NotSignedIn`
    pub fn require_user(&self) -> ExpenseResult<User> {
        self.current_user()?.ok_or(ExpenseError::NotSignedIn)
    }

    /// Confirm `password` is the user's current password
    pub fn reauthenticate(&self, user: &User, password: &str) -> ExpenseResult<()> {
        if verify_password(password, &user.password_hash)? {
            Ok(())
        } else {
            Err(ExpenseError::WrongPassword)
        }
    }

    /// Change the user's password.
    ///
    /// Checks run in order: all fields present, new passwords match, new
    /// password long enough, current password correct. The stored hash only
    /// changes when every check passes.
    pub fn update_password(
        &self,
        user: &User,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> ExpenseResult<User> {
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(ExpenseError::Validation("All fields are required.".into()));
        }
        if new != confirm {
            return Err(ExpenseError::Validation(
                "New passwords do not match.".into(),
            ));
        }
        if new.chars().count() < self.settings.min_password_length {
            return Err(ExpenseError::Validation(format!(
                "New password must be at least {} characters.",
                self.settings.min_password_length
            )));
        }

        // Re-read so a stale copy cannot overwrite a newer hash
        let mut stored = self
            .storage
            .users
            .get(user.id)?
            .ok_or_else(|| ExpenseError::user_not_found(user.id.short()))?;

        self.reauthenticate(&stored, current)?;

        stored.set_password_hash(hash_password(new)?);
        self.storage.users.update(stored.clone())?;
        self.storage.users.save()?;

        self.storage
            .log_auth(Operation::PasswordChange, stored.id, &stored.email)?;

        Ok(stored)
    }

    fn check_password_length(&self, password: &str) -> ExpenseResult<()> {
        if password.chars().count() < self.settings.min_password_length {
            return Err(ExpenseError::WeakPassword {
                min_length: self.settings.min_password_length,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_sign_up_signs_in() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);

        let user = auth.sign_up("alice@example.com", "secret1").unwrap();

        let current = auth.current_user().unwrap().unwrap();
        assert_eq!(current.id, user.id);
        assert_ne!(user.password_hash, "secret1");
    }

    #[test]
    fn test_sign_up_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);

        assert!(auth.sign_up("", "secret1").unwrap_err().is_validation());
        assert!(auth.sign_up("not-an-email", "secret1").unwrap_err().is_validation());
        assert!(matches!(
            auth.sign_up("a@b.co", "12345").unwrap_err(),
            ExpenseError::WeakPassword { min_length: 6 }
        ));
        assert_eq!(storage.users.count().unwrap(), 0);
    }

    #[test]
    fn test_sign_up_duplicate_email() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);

        auth.sign_up("a@b.co", "secret1").unwrap();
        let err = auth.sign_up("A@B.co", "secret2").unwrap_err();
        assert_eq!(
            err.user_message(),
            "The email address is already in use by another account."
        );
    }

    #[test]
    fn test_sign_in_and_out() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);
        auth.sign_up("a@b.co", "secret1").unwrap();
        auth.sign_out().unwrap();
        assert!(auth.current_user().unwrap().is_none());

        assert!(matches!(
            auth.sign_in("a@b.co", "wrong!!").unwrap_err(),
            ExpenseError::InvalidCredentials
        ));
        assert!(matches!(
            auth.sign_in("nobody@b.co", "secret1").unwrap_err(),
            ExpenseError::InvalidCredentials
        ));

        auth.sign_in(" A@b.co ", "secret1").unwrap();
        assert!(auth.require_user().is_ok());

        assert_eq!(auth.sign_out().unwrap().as_deref(), Some("a@b.co"));
        assert!(auth.sign_out().unwrap().is_none());
        assert!(matches!(
            auth.require_user().unwrap_err(),
            ExpenseError::NotSignedIn
        ));
    }

    #[test]
    fn test_update_password_checks_in_order() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);
        let user = auth.sign_up("a@b.co", "secret1").unwrap();

        let msg = |r: ExpenseResult<User>| r.unwrap_err().user_message();

        assert_eq!(
            msg(auth.update_password(&user, "", "abcdef", "abcdef")),
            "All fields are required."
        );
        assert_eq!(
            msg(auth.update_password(&user, "wrong", "abcdef", "abcdeg")),
            "New passwords do not match."
        );
        assert_eq!(
            msg(auth.update_password(&user, "wrong", "abc", "abc")),
            "New password must be at least 6 characters."
        );
        assert_eq!(
            msg(auth.update_password(&user, "wrong", "abcdef", "abcdef")),
            "Current password is incorrect."
        );

        // Old password still valid after the failures
        auth.sign_out().unwrap();
        auth.sign_in("a@b.co", "secret1").unwrap();
    }

    #[test]
    fn test_update_password_success() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);
        let user = auth.sign_up("a@b.co", "secret1").unwrap();

        auth.update_password(&user, "secret1", "better1", "better1")
            .unwrap();

        auth.sign_out().unwrap();
        assert!(auth.sign_in("a@b.co", "secret1").is_err());
        auth.sign_in("a@b.co", "better1").unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert!(entries
            .iter()
            .any(|e| e.operation == Operation::PasswordChange));
    }

    #[test]
    fn test_stale_session_is_cleared() {
        let (temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let auth = AuthService::new(&storage, &settings);
        auth.sign_up("a@b.co", "secret1").unwrap();

        // Fresh storage whose user file was wiped
        std::fs::remove_file(temp_dir.path().join("data").join("users.json")).unwrap();
        let storage2 =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let auth2 = AuthService::new(&storage2, &settings);

        assert!(auth2.current_user().unwrap().is_none());
        assert!(!temp_dir.path().join("session.json").exists());
    }
}
