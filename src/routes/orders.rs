use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::CurrentUser;
use crate::domain::types::{OrderId, PaymentMethod, ProductId, Quantity};
use crate::forms::checkout::{
    BankDetailsForm, BankDetailsPayload, CheckoutForm, CheckoutPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::orders as orders_service;
use crate::session::LAST_ORDER_NO_KEY;

#[derive(Deserialize)]
struct SingleCheckoutParams {
    qty: Option<i32>,
    payment_id: Option<i32>,
}

#[derive(Deserialize)]
struct SuccessParams {
    id: Option<i32>,
}

/// Single-product "buy now" checkout page.
#[get("/orders/checkout/{id}")]
pub async fn single_checkout_page(
    product_id: web::Path<i32>,
    params: web::Query<SingleCheckoutParams>,
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let qty = Quantity::clamp(params.qty.unwrap_or(1));
    let payment = params
        .payment_id
        .and_then(|id| PaymentMethod::try_from(id).ok())
        .unwrap_or(PaymentMethod::Bank);

    match orders_service::quote_single_checkout(product_id, qty.get(), "Ontario", repo.get_ref())
    {
        Ok(quote) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "checkout");
            context.insert("items", &quote.items);
            context.insert("totals", &quote.totals);
            context.insert("product_id", &product_id.get());
            context.insert("qty", &qty.get());
            context.insert("payment_id", &payment.id());
            render_template(&tera, "orders/checkout.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to quote single-item checkout: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Submit the single-product checkout. The session cart is not involved.
#[post("/orders/checkout/{id}")]
pub async fn single_checkout_submit(
    product_id: web::Path<i32>,
    params: web::Query<SingleCheckoutParams>,
    form: web::Form<CheckoutForm>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw_id = product_id.into_inner();
    let Ok(product_id) = ProductId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let qty = params.qty.unwrap_or(1);
    let back = format!("/orders/checkout/{raw_id}?qty={qty}");

    let payload: CheckoutPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match orders_service::place_order_from_single_item(
        product_id,
        qty,
        &user,
        &payload,
        repo.get_ref(),
    ) {
        Ok(order) => match order.payment {
            PaymentMethod::Bank => redirect(&format!("/orders/{}/bank", order.id)),
            PaymentMethod::CashOnDelivery => {
                redirect(&format!("/orders/success?id={}", order.id))
            }
        },
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to place single-item order: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/orders/{id}/bank")]
pub async fn bank_details_page(
    order_id: web::Path<i32>,
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let raw_id = order_id.into_inner();
    let Ok(order_id) = OrderId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };

    match orders_service::show_bank_details(order_id, &user, repo.get_ref()) {
        Ok(Some(order)) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "checkout");
            context.insert("order", &order);
            render_template(&tera, "orders/bank_details.html", &context)
        }
        Ok(None) => redirect(&format!("/orders/success?id={raw_id}")),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Forbidden) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to render bank details: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Mock confirmation of the bank transfer details; nothing is charged.
#[post("/orders/{id}/bank")]
pub async fn bank_details_submit(
    order_id: web::Path<i32>,
    form: web::Form<BankDetailsForm>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw_id = order_id.into_inner();
    let payload: BankDetailsPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&format!("/orders/{raw_id}/bank"));
        }
    };

    match orders_service::show_bank_details(payload.order_id, &user, repo.get_ref()) {
        Ok(_) => redirect(&format!("/orders/success?id={}", payload.order_id)),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Forbidden) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to confirm bank details: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Order confirmation page with a human-friendly display number, reused for
/// the rest of the session.
#[get("/orders/success")]
pub async fn success(
    params: web::Query<SuccessParams>,
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let display = match session.get::<String>(LAST_ORDER_NO_KEY).ok().flatten() {
        Some(existing) => existing,
        None => match params.id {
            Some(id) => {
                let display = format!("{id:08}");
                if let Err(e) = session.insert(LAST_ORDER_NO_KEY, &display) {
                    log::error!("Failed to store order display number: {e}");
                }
                display
            }
            None => return redirect("/"),
        },
    };

    let mut context = base_context(&flash_messages, Some(&user), &session, "orders");
    context.insert("display_order_no", &display);
    render_template(&tera, "orders/success.html", &context)
}

/// The signed-in customer's order history, newest first.
#[get("/account/orders")]
pub async fn my_orders(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::list_customer_orders(&user, repo.get_ref()) {
        Ok(orders) => {
            let mut context = base_context(&flash_messages, Some(&user), &session, "orders");
            context.insert("orders", &orders);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
