use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No identity context is present.
    #[error("unauthorized")]
    Unauthorized,
    /// Identity present but not the owner or an admin.
    #[error("forbidden")]
    Forbidden,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Checkout attempted with zero cart lines.
    #[error("cart is empty")]
    EmptyCart,
    /// A form failed validation; the message is safe to surface.
    #[error("{0}")]
    Form(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
