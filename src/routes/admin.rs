use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentUser;
use crate::domain::types::ProductId;
use crate::forms::admin::{ProductForm, ProductFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::admin as admin_service;

#[get("/admin/products")]
pub async fn list_products(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin_service::list_products(&user, repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "admin");
            context.insert("products", &products);
            render_template(&tera, "admin/products.html", &context)
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(err) => {
            log::error!("Failed to render admin product list: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/new")]
pub async fn new_product_page(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if !user.is_admin() {
        return redirect("/account/login");
    }
    let context = base_context(&flash_messages, Some(&user), &session, "admin");
    render_template(&tera, "admin/product_form.html", &context)
}

#[post("/admin/products")]
pub async fn create_product(
    form: web::Form<ProductForm>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: ProductFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/admin/products/new");
        }
    };

    match admin_service::create_product(payload, &user, repo.get_ref()) {
        Ok(product) => {
            FlashMessage::success(format!("{} created.", product.name)).send();
            redirect("/admin/products")
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(err) => {
            log::error!("Failed to create product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{id}/edit")]
pub async fn edit_product_page(
    product_id: web::Path<i32>,
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match admin_service::get_product(product_id, &user, repo.get_ref()) {
        Ok(product) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "admin");
            context.insert("product", &product);
            render_template(&tera, "admin/product_form.html", &context)
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render product edit page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    form: web::Form<ProductForm>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw_id = product_id.into_inner();
    let Ok(product_id) = ProductId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };

    let payload: ProductFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&format!("/admin/products/{raw_id}/edit"));
        }
    };

    match admin_service::update_product(product_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Product updated.").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to update product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{id}/delete")]
pub async fn delete_product_page(
    product_id: web::Path<i32>,
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match admin_service::get_product(product_id, &user, repo.get_ref()) {
        Ok(product) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "admin");
            context.insert("product", &product);
            render_template(&tera, "admin/product_delete.html", &context)
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render delete confirmation: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match admin_service::delete_product(product_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Forbidden) => redirect("/account/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
