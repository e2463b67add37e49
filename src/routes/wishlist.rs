use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentUser;
use crate::forms::cart::{
    MoveToCartForm, MoveToCartPayload, ProductRefForm, ProductRefPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::catalog::just_for_you as just_for_you_service;
use crate::services::wishlist as wishlist_service;
use crate::session;

#[get("/wishlist")]
pub async fn show_wishlist(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut wishlist = session::get_wishlist(&session);

    if let Err(err) = wishlist_service::show_wishlist(&mut wishlist, repo.get_ref()) {
        log::error!("Failed to refresh wishlist: {err}");
        return HttpResponse::InternalServerError().finish();
    }
    if let Err(e) = session::save_wishlist(&session, &wishlist) {
        log::error!("Failed to save wishlist: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    let just_for_you = just_for_you_service(repo.get_ref()).unwrap_or_default();

    let mut context = base_context(&flash_messages, user.as_ref(), &session, "wishlist");
    context.insert("items", wishlist.items());
    context.insert("just_for_you", &just_for_you);
    render_template(&tera, "wishlist/index.html", &context)
}

#[post("/wishlist/add")]
pub async fn add_to_wishlist(
    form: web::Form<ProductRefForm>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: ProductRefPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let mut wishlist = session::get_wishlist(&session);
    match wishlist_service::add_to_wishlist(&mut wishlist, payload.product_id, repo.get_ref()) {
        Ok(product) => {
            if let Err(e) = session::save_wishlist(&session, &wishlist) {
                log::error!("Failed to save wishlist: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success(format!("{} added to your wishlist.", product.name)).send();
            redirect("/wishlist")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to add to wishlist: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/wishlist/remove")]
pub async fn remove_from_wishlist(
    form: web::Form<ProductRefForm>,
    session: Session,
) -> impl Responder {
    if let Ok(payload) = ProductRefPayload::try_from(form.into_inner()) {
        let mut wishlist = session::get_wishlist(&session);
        wishlist_service::remove_from_wishlist(&mut wishlist, payload.product_id);
        if let Err(e) = session::save_wishlist(&session, &wishlist) {
            log::error!("Failed to save wishlist: {e}");
            return HttpResponse::InternalServerError().finish();
        }
        FlashMessage::success("Removed from wishlist.").send();
    }
    redirect("/wishlist")
}

#[post("/wishlist/clear")]
pub async fn clear_wishlist(session: Session) -> impl Responder {
    let mut wishlist = session::get_wishlist(&session);
    wishlist_service::clear_wishlist(&mut wishlist);
    if let Err(e) = session::save_wishlist(&session, &wishlist) {
        log::error!("Failed to save wishlist: {e}");
        return HttpResponse::InternalServerError().finish();
    }
    FlashMessage::success("Wishlist cleared.").send();
    redirect("/wishlist")
}

#[post("/wishlist/move")]
pub async fn move_to_cart(
    form: web::Form<MoveToCartForm>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: MoveToCartPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(_) => return redirect("/wishlist"),
    };

    let mut wishlist = session::get_wishlist(&session);
    let mut cart = session::get_cart(&session);
    match wishlist_service::move_wishlist_item_to_cart(
        &mut wishlist,
        &mut cart,
        payload.product_id,
        payload.qty,
        repo.get_ref(),
    ) {
        Ok(moved) => {
            if let Err(e) = session::save_cart(&session, &cart)
                .and_then(|_| session::save_wishlist(&session, &wishlist))
            {
                log::error!("Failed to save session state: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            if let Some(product) = moved {
                FlashMessage::success(format!("{} moved to cart.", product.name)).send();
            }
            redirect("/wishlist")
        }
        Err(err) => {
            log::error!("Failed to move wishlist item: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/wishlist/move-all")]
pub async fn move_all_to_cart(
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let mut wishlist = session::get_wishlist(&session);
    let mut cart = session::get_cart(&session);
    match wishlist_service::move_all_wishlist_to_cart(&mut wishlist, &mut cart, repo.get_ref()) {
        Ok(_) => {
            if let Err(e) = session::save_cart(&session, &cart)
                .and_then(|_| session::save_wishlist(&session, &wishlist))
            {
                log::error!("Failed to save session state: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("All wishlist items moved to cart.").send();
            redirect("/wishlist")
        }
        Err(err) => {
            log::error!("Failed to move wishlist: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
