//! Account form bindings: registration, login, profile and password change.

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, FullName, TypeConstraintError};

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AuthFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AuthFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 50, message = "Full Name cannot exceed 50 characters."))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterPayload {
    pub full_name: FullName,
    pub email: EmailAddress,
    /// Plaintext; hashed by the service before it goes anywhere near storage.
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = AuthFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            full_name: FullName::new(value.full_name)?,
            email: EmailAddress::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub email: EmailAddress,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = AuthFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: EmailAddress::new(value.email)?,
            password: value.password,
        })
    }
}

/// Name/email update from the account-settings page.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 50, message = "Full Name cannot exceed 50 characters."))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePayload {
    pub full_name: FullName,
    pub email: EmailAddress,
}

impl TryFrom<ProfileForm> for ProfilePayload {
    type Error = AuthFormError;

    fn try_from(value: ProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            full_name: FullName::new(value.full_name)?,
            email: EmailAddress::new(value.email)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

impl TryFrom<ChangePasswordForm> for ChangePasswordPayload {
    type Error = AuthFormError;

    fn try_from(value: ChangePasswordForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            current_password: value.current_password,
            new_password: value.new_password,
        })
    }
}
