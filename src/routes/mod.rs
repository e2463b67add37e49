use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::CurrentUser;
use crate::session;

pub mod account;
pub mod admin;
pub mod cart;
pub mod main;
pub mod orders;
pub mod products;
pub mod wishlist;

/// Render a template to a 200 response; template failures are logged and
/// produce an empty body rather than a panic.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

/// Post/redirect/get helper.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Debug => "secondary",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "danger",
    }
}

/// Context shared by every page: flash alerts, the signed-in user and the
/// navigation badges for cart/wishlist sizes.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&CurrentUser>,
    session: &Session,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context.insert("cart_count", &session::get_cart(session).total_units());
    context.insert("wishlist_count", &session::get_wishlist(session).len());
    context
}
