//! Registration, login and account-settings flows.

use chrono::Utc;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::domain::types::{Role, UserId};
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{ChangePasswordPayload, LoginPayload, ProfilePayload, RegisterPayload};
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

fn session_user_id(user: &CurrentUser) -> ServiceResult<UserId> {
    UserId::new(user.id).map_err(|e| {
        log::error!("Invalid user id in session context: {e}");
        ServiceError::Internal
    })
}

/// Create an account. Duplicate emails are rejected with a form-level
/// message; the password is stored only as a hash.
pub fn register<R>(payload: RegisterPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_email(payload.email.as_str()) {
        Ok(Some(_)) => {
            return Err(ServiceError::Form("Email already registered.".to_string()));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check email uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_user = NewUser {
        full_name: payload.full_name,
        email: payload.email,
        password_hash: hash_password(&payload.password),
        role: Role::Customer,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(user) => Ok(user),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Check credentials. The same message covers an unknown email and a wrong
/// password.
pub fn login<R>(payload: &LoginPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let user = match repo.get_user_by_email(payload.email.as_str()) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(ServiceError::Form("Invalid email or password.".to_string()));
        }
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ServiceError::Form("Invalid email or password.".to_string()));
    }

    Ok(user)
}

/// Update name and email from the account-settings page. Taking an email
/// that belongs to another account is rejected.
pub fn update_profile<R>(
    user: &CurrentUser,
    payload: ProfilePayload,
    repo: &R,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    let id = session_user_id(user)?;

    match repo.get_user_by_email(payload.email.as_str()) {
        Ok(Some(existing)) if existing.id != id => {
            return Err(ServiceError::Form("Email already registered.".to_string()));
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to check email uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if let Err(e) = repo.update_user_profile(id, &payload.full_name, &payload.email) {
        log::error!("Failed to update profile: {e}");
        return Err(ServiceError::Internal);
    }

    match repo.get_user_by_id(id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to reload user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Change the password after verifying the current one.
pub fn change_password<R>(
    user: &CurrentUser,
    payload: ChangePasswordPayload,
    repo: &R,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let id = session_user_id(user)?;

    let stored = match repo.get_user_by_id(id) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&payload.current_password, &stored.password_hash) {
        return Err(ServiceError::Form(
            "Current password is incorrect.".to_string(),
        ));
    }

    match repo.update_user_password(id, &hash_password(&payload.new_password)) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update password: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, FullName};
    use crate::repository::test::TestRepository;

    fn register_payload(email: &str) -> RegisterPayload {
        RegisterPayload {
            full_name: FullName::new("Test User").unwrap(),
            email: EmailAddress::new(email).unwrap(),
            password: "secret123".to_string(),
        }
    }

    #[test]
    fn register_then_login_round_trip() {
        let repo = TestRepository::new(vec![], vec![]);
        let user = register(register_payload("a@example.com"), &repo).unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_ne!(user.password_hash, "secret123");

        let login_payload = LoginPayload {
            email: EmailAddress::new("a@example.com").unwrap(),
            password: "secret123".to_string(),
        };
        let logged_in = login(&login_payload, &repo).unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let repo = TestRepository::new(vec![], vec![]);
        register(register_payload("a@example.com"), &repo).unwrap();
        let err = register(register_payload("a@example.com"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn wrong_password_and_unknown_email_share_a_message() {
        let repo = TestRepository::new(vec![], vec![]);
        register(register_payload("a@example.com"), &repo).unwrap();

        let wrong_password = LoginPayload {
            email: EmailAddress::new("a@example.com").unwrap(),
            password: "wrong-pass".to_string(),
        };
        let unknown_email = LoginPayload {
            email: EmailAddress::new("b@example.com").unwrap(),
            password: "secret123".to_string(),
        };
        assert_eq!(
            login(&wrong_password, &repo).unwrap_err(),
            login(&unknown_email, &repo).unwrap_err()
        );
    }

    #[test]
    fn change_password_verifies_current() {
        let repo = TestRepository::new(vec![], vec![]);
        let user = register(register_payload("a@example.com"), &repo).unwrap();
        let current = CurrentUser::from(&user);

        let err = change_password(
            &current,
            ChangePasswordPayload {
                current_password: "nope".to_string(),
                new_password: "fresh-pass".to_string(),
            },
            &repo,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));

        change_password(
            &current,
            ChangePasswordPayload {
                current_password: "secret123".to_string(),
                new_password: "fresh-pass".to_string(),
            },
            &repo,
        )
        .unwrap();

        let relogin = LoginPayload {
            email: EmailAddress::new("a@example.com").unwrap(),
            password: "fresh-pass".to_string(),
        };
        assert!(login(&relogin, &repo).is_ok());
    }

    #[test]
    fn profile_update_rejects_taken_email() {
        let repo = TestRepository::new(vec![], vec![]);
        register(register_payload("a@example.com"), &repo).unwrap();
        let user_b = register(register_payload("b@example.com"), &repo).unwrap();

        let err = update_profile(
            &CurrentUser::from(&user_b),
            ProfilePayload {
                full_name: FullName::new("B").unwrap(),
                email: EmailAddress::new("a@example.com").unwrap(),
            },
            &repo,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }
}
