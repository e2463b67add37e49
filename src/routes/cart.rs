use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentUser;
use crate::domain::types::PaymentMethod;
use crate::forms::cart::{
    AddToCartForm, AddToCartPayload, PaymentChoiceForm, PaymentChoicePayload, ProductRefForm,
    ProductRefPayload, UpdateCartForm, UpdateCartPayload,
};
use crate::forms::checkout::{CheckoutForm, CheckoutPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::cart as cart_service;
use crate::services::orders as orders_service;
use crate::session;

#[get("/cart")]
pub async fn show_cart(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let cart = session::get_cart(&session);
    let totals = cart_service::show_cart(&cart);

    let mut context = base_context(&flash_messages, user.as_ref(), &session, "cart");
    context.insert("items", cart.items());
    context.insert("totals", &totals);
    render_template(&tera, "cart/index.html", &context)
}

#[post("/cart/add")]
pub async fn add_to_cart(
    form: web::Form<AddToCartForm>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: AddToCartPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/products");
        }
    };

    let mut cart = session::get_cart(&session);
    match cart_service::add_to_cart(&mut cart, payload.product_id, payload.qty, repo.get_ref()) {
        Ok(product) => {
            if let Err(e) = session::save_cart(&session, &cart) {
                log::error!("Failed to save cart: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success(format!("{} added to cart.", product.name)).send();
            redirect("/cart")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to add to cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/update")]
pub async fn update_cart(form: web::Form<UpdateCartForm>, session: Session) -> impl Responder {
    if let Ok(payload) = UpdateCartPayload::try_from(form.into_inner()) {
        let mut cart = session::get_cart(&session);
        cart_service::update_cart_qty(&mut cart, payload.product_id, payload.qty);
        if let Err(e) = session::save_cart(&session, &cart) {
            log::error!("Failed to save cart: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }
    redirect("/cart")
}

#[post("/cart/remove")]
pub async fn remove_from_cart(
    form: web::Form<ProductRefForm>,
    session: Session,
) -> impl Responder {
    if let Ok(payload) = ProductRefPayload::try_from(form.into_inner()) {
        let mut cart = session::get_cart(&session);
        cart_service::remove_from_cart(&mut cart, payload.product_id);
        if let Err(e) = session::save_cart(&session, &cart) {
            log::error!("Failed to save cart: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }
    redirect("/cart")
}

#[post("/cart/clear")]
pub async fn clear_cart(session: Session) -> impl Responder {
    let mut cart = session::get_cart(&session);
    cart_service::clear_cart(&mut cart);
    if let Err(e) = session::save_cart(&session, &cart) {
        log::error!("Failed to save cart: {e}");
        return HttpResponse::InternalServerError().finish();
    }
    redirect("/cart")
}

/// Payment selection from the cart page; requires a signed-in user before
/// the checkout forms are shown.
#[post("/cart/checkout")]
pub async fn start_checkout(form: web::Form<PaymentChoiceForm>, _user: CurrentUser) -> impl Responder {
    match PaymentChoicePayload::try_from(form.into_inner()) {
        Ok(payload) if payload.payment == PaymentMethod::CashOnDelivery => {
            redirect("/cart/checkout/cod")
        }
        Ok(_) => redirect("/cart/checkout/bank"),
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/cart")
        }
    }
}

fn render_checkout_page(
    payment: PaymentMethod,
    user: &CurrentUser,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let cart = session::get_cart(session);
    let quote = match orders_service::quote_cart_checkout(&cart, "Ontario") {
        Ok(quote) => quote,
        Err(ServiceError::EmptyCart) => return redirect("/cart"),
        Err(err) => {
            log::error!("Failed to quote checkout: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(flash_messages, Some(user), session, "checkout");
    context.insert("items", &quote.items);
    context.insert("totals", &quote.totals);
    context.insert("payment_id", &payment.id());
    context.insert("payment_label", payment.label());
    render_template(tera, "cart/checkout.html", &context)
}

fn place_cart_order(
    payment: PaymentMethod,
    form: CheckoutForm,
    user: &CurrentUser,
    session: &Session,
    repo: &DieselRepository,
) -> Result<i32, HttpResponse> {
    let back = match payment {
        PaymentMethod::Bank => "/cart/checkout/bank",
        PaymentMethod::CashOnDelivery => "/cart/checkout/cod",
    };

    let mut payload: CheckoutPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return Err(redirect(back));
        }
    };
    // The flow chosen from the cart page wins over anything posted.
    payload.payment = payment;

    let cart = session::get_cart(session);
    match orders_service::place_order_from_cart(&cart, user, &payload, repo) {
        Ok(order) => {
            let mut cleared = cart;
            cart_service::clear_cart(&mut cleared);
            if let Err(e) = session::save_cart(session, &cleared) {
                log::error!("Failed to clear cart after checkout: {e}");
            }
            Ok(order.id.get())
        }
        Err(ServiceError::EmptyCart) => Err(redirect("/cart")),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("One of the products is no longer available.").send();
            Err(redirect("/cart"))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            Err(redirect(back))
        }
        Err(err) => {
            log::error!("Failed to place order: {err}");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

#[get("/cart/checkout/cod")]
pub async fn cod_checkout_page(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_checkout_page(
        PaymentMethod::CashOnDelivery,
        &user,
        &session,
        &flash_messages,
        &tera,
    )
}

#[post("/cart/checkout/cod")]
pub async fn cod_checkout_submit(
    form: web::Form<CheckoutForm>,
    user: CurrentUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match place_cart_order(
        PaymentMethod::CashOnDelivery,
        form.into_inner(),
        &user,
        &session,
        repo.get_ref(),
    ) {
        Ok(order_id) => redirect(&format!("/orders/success?id={order_id}")),
        Err(response) => response,
    }
}

#[get("/cart/checkout/bank")]
pub async fn bank_checkout_page(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_checkout_page(PaymentMethod::Bank, &user, &session, &flash_messages, &tera)
}

#[post("/cart/checkout/bank")]
pub async fn bank_checkout_submit(
    form: web::Form<CheckoutForm>,
    user: CurrentUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match place_cart_order(
        PaymentMethod::Bank,
        form.into_inner(),
        &user,
        &session,
        repo.get_ref(),
    ) {
        Ok(order_id) => redirect(&format!("/orders/{order_id}/bank")),
        Err(response) => response,
    }
}
