use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentUser;
use crate::forms::auth::{
    ChangePasswordForm, ChangePasswordPayload, LoginForm, LoginPayload, ProfileForm,
    ProfilePayload, RegisterForm, RegisterPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth as auth_service;
use crate::session;

#[get("/account/login")]
pub async fn login_page(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, &session, "login");
    render_template(&tera, "account/login.html", &context)
}

#[post("/account/login")]
pub async fn login_submit(
    form: web::Form<LoginForm>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: LoginPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/account/login");
        }
    };

    match auth_service::login(&payload, repo.get_ref()) {
        Ok(user) => {
            if let Err(e) = session::sign_in(&session, &CurrentUser::from(&user)) {
                log::error!("Failed to store identity in session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/account/login")
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/account/register")]
pub async fn register_page(
    user: Option<CurrentUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, &session, "register");
    render_template(&tera, "account/register.html", &context)
}

#[post("/account/register")]
pub async fn register_submit(
    form: web::Form<RegisterForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: RegisterPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/account/register");
        }
    };

    match auth_service::register(payload, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Registration successful. Please log in.").send();
            redirect("/account/login")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/account/register")
        }
        Err(err) => {
            log::error!("Failed to register: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/account/logout")]
pub async fn logout(session: Session) -> impl Responder {
    session::sign_out(&session);
    redirect("/")
}

#[get("/account/settings")]
pub async fn settings_page(
    user: CurrentUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, Some(&user), &session, "settings");
    context.insert("full_name", &user.name);
    context.insert("email", &user.email);
    render_template(&tera, "account/settings.html", &context)
}

#[post("/account/settings/profile")]
pub async fn update_profile(
    form: web::Form<ProfileForm>,
    user: CurrentUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: ProfilePayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/account/settings");
        }
    };

    match auth_service::update_profile(&user, payload, repo.get_ref()) {
        Ok(updated) => {
            if let Err(e) = session::sign_in(&session, &CurrentUser::from(&updated)) {
                log::error!("Failed to refresh identity in session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Profile updated.").send();
            redirect("/account/settings")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/account/settings")
        }
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/account/settings/password")]
pub async fn change_password(
    form: web::Form<ChangePasswordForm>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload: ChangePasswordPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/account/settings");
        }
    };

    match auth_service::change_password(&user, payload, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Password changed.").send();
            redirect("/account/settings")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/account/settings")
        }
        Err(err) => {
            log::error!("Failed to change password: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
