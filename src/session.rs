//! Session-store access for the cart, wishlist and signed-in identity.
//!
//! Every handler loads the collection it needs, passes it to a service by
//! reference, and saves it back; nothing reads ambient session state below
//! the route layer.

use actix_session::{Session, SessionInsertError};

use crate::auth::CurrentUser;
use crate::domain::cart::Cart;
use crate::domain::wishlist::Wishlist;

pub const CART_KEY: &str = "cart";
pub const WISHLIST_KEY: &str = "wishlist";
pub const AUTH_USER_KEY: &str = "auth_user";
pub const LAST_ORDER_NO_KEY: &str = "last_order_no";

/// Load the cart, treating a missing or undecodable blob as empty.
pub fn get_cart(session: &Session) -> Cart {
    session.get::<Cart>(CART_KEY).ok().flatten().unwrap_or_default()
}

pub fn save_cart(session: &Session, cart: &Cart) -> Result<(), SessionInsertError> {
    session.insert(CART_KEY, cart)
}

/// Load the wishlist, treating a missing or undecodable blob as empty.
pub fn get_wishlist(session: &Session) -> Wishlist {
    session
        .get::<Wishlist>(WISHLIST_KEY)
        .ok()
        .flatten()
        .unwrap_or_default()
}

pub fn save_wishlist(session: &Session, wishlist: &Wishlist) -> Result<(), SessionInsertError> {
    session.insert(WISHLIST_KEY, wishlist)
}

/// Record the identity at login.
pub fn sign_in(session: &Session, user: &CurrentUser) -> Result<(), SessionInsertError> {
    session.insert(AUTH_USER_KEY, user)
}

/// Drop everything: identity, cart, wishlist.
pub fn sign_out(session: &Session) {
    session.clear();
}
