//! Error conversion glue between the domain, form, repository and service
//! layers. The domain layer itself stays free of service/repository error
//! types.

use crate::domain::types::TypeConstraintError;
use crate::forms::admin::ProductFormError;
use crate::forms::auth::AuthFormError;
use crate::forms::cart::CartFormError;
use crate::forms::checkout::CheckoutFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Validation(val.to_string())
    }
}

impl From<CartFormError> for ServiceError {
    fn from(val: CartFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<CheckoutFormError> for ServiceError {
    fn from(val: CheckoutFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AuthFormError> for ServiceError {
    fn from(val: AuthFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
