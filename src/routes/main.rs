use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::CurrentUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::catalog::show_home as show_home_service;

#[get("/")]
pub async fn index(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.as_ref().is_some_and(|u| u.is_admin()) {
        return redirect("/admin/products");
    }

    match show_home_service(repo.get_ref()) {
        Ok(home) => {
            let mut context = base_context(&flash_messages, user.as_ref(), &session, "home");
            context.insert("flash_sales", &home.flash_sales);
            context.insert("best_sellers", &home.best_sellers);
            context.insert("explore", &home.explore);
            context.insert("new_arrivals", &home.new_arrivals);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render home page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn static_page(
    user: Option<&CurrentUser>,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
    page: &str,
    template: &str,
    title: &str,
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, session, page);
    context.insert("title", title);
    render_template(tera, template, &context)
}

#[get("/about")]
pub async fn about(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page(
        user.as_ref(),
        &session,
        &flash_messages,
        &tera,
        "about",
        "main/about.html",
        "About Us",
    )
}

#[get("/contact")]
pub async fn contact(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page(
        user.as_ref(),
        &session,
        &flash_messages,
        &tera,
        "contact",
        "main/contact.html",
        "Contact",
    )
}

#[get("/faq")]
pub async fn faq(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page(
        user.as_ref(),
        &session,
        &flash_messages,
        &tera,
        "faq",
        "main/faq.html",
        "FAQ",
    )
}

#[get("/privacy")]
pub async fn privacy(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page(
        user.as_ref(),
        &session,
        &flash_messages,
        &tera,
        "privacy",
        "main/privacy.html",
        "Privacy Policy",
    )
}

#[get("/terms")]
pub async fn terms(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page(
        user.as_ref(),
        &session,
        &flash_messages,
        &tera,
        "terms",
        "main/terms.html",
        "Terms of Use",
    )
}

/// Default handler for unmatched routes.
pub async fn not_found(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, user.as_ref(), &session, "404");
    HttpResponse::NotFound().body(
        tera.render("errors/404.html", &context).unwrap_or_else(|e| {
            log::error!("Failed to render template 'errors/404.html': {e}");
            String::new()
        }),
    )
}
