//! Session-backed authentication: password hashing and the request-scoped
//! identity extractor.

use std::future::{Ready, ready};

use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::types::Role;
use crate::domain::user::User;
use crate::session::AUTH_USER_KEY;

/// Hash a plain password into a lowercase hex SHA-256 digest.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Verify a plain password against a stored hex digest without leaking the
/// mismatch position through timing.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(password);
    let stored = stored_hash.trim().to_ascii_lowercase();
    if candidate.len() != stored.len() {
        return false;
    }
    candidate
        .bytes()
        .zip(stored.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Identity of the signed-in user, stored in the session at login and
/// handed to services as explicit request context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.full_name.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// Extraction failure: the visitor is not signed in. Rendered as a redirect
/// to the login page rather than a bare 401.
#[derive(Debug)]
pub struct AuthRedirect;

impl std::fmt::Display for AuthRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication required")
    }
}

impl ResponseError for AuthRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, "/account/login"))
            .finish()
    }
}

impl FromRequest for CurrentUser {
    type Error = AuthRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .get_session()
            .get::<CurrentUser>(AUTH_USER_KEY)
            .ok()
            .flatten();
        ready(user.ok_or(AuthRedirect))
    }
}
