use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::CurrentUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::ServiceError;
use crate::services::catalog::{
    show_product as show_product_service, show_products as show_products_service,
};

#[get("/products")]
pub async fn show_products(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_products_service(repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, user.as_ref(), &session, "products");
            context.insert("products", &products);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render product list: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/{id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(product_id) = crate::domain::types::ProductId::new(product_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match show_product_service(product_id, repo.get_ref()) {
        Ok((product, related)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), &session, "products");
            context.insert("product", &product);
            context.insert("related", &related);
            render_template(&tera, "products/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render product detail: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
