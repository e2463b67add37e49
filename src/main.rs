use actix_files::Files;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;
use time::Duration;

use technova::db::establish_connection_pool;
use technova::models::config::ServerConfig;
use technova::repository::DieselRepository;
use technova::routes;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
        .set_default("database_url", "technova.db")?
        .set_default("bind_address", "127.0.0.1")?
        .set_default("port", 8080_i64)?
        .set_default("session_ttl_hours", 4_i64)?
        .add_source(config::File::with_name("technova").required(false))
        .add_source(config::Environment::default().try_parsing(true))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = load_config().map_err(std::io::Error::other)?;

    let pool = establish_connection_pool(&server_config.database_url)
        .map_err(std::io::Error::other)?;
    let repo = DieselRepository::new(pool);

    let tera = Tera::new("templates/**/*.html").map_err(std::io::Error::other)?;

    let secret_key = server_config
        .secret_key
        .as_deref()
        .filter(|s| s.len() >= 64)
        .map(|s| Key::from(s.as_bytes()))
        .unwrap_or_else(|| {
            log::warn!("No secret_key configured; sessions will not survive a restart");
            Key::generate()
        });
    let session_ttl = Duration::hours(server_config.session_ttl_hours);

    let bind = (server_config.bind_address.clone(), server_config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();
        let session_middleware =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_name(".technova.session".to_string())
                .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                .build();

        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .wrap(middleware::Logger::default())
            .wrap(message_framework)
            .wrap(session_middleware)
            .service(Files::new("/static", "./static"))
            .service(routes::main::index)
            .service(routes::main::about)
            .service(routes::main::contact)
            .service(routes::main::faq)
            .service(routes::main::privacy)
            .service(routes::main::terms)
            .service(routes::products::show_products)
            .service(routes::products::show_product)
            .service(routes::cart::show_cart)
            .service(routes::cart::add_to_cart)
            .service(routes::cart::update_cart)
            .service(routes::cart::remove_from_cart)
            .service(routes::cart::clear_cart)
            .service(routes::cart::start_checkout)
            .service(routes::cart::cod_checkout_page)
            .service(routes::cart::cod_checkout_submit)
            .service(routes::cart::bank_checkout_page)
            .service(routes::cart::bank_checkout_submit)
            .service(routes::wishlist::show_wishlist)
            .service(routes::wishlist::add_to_wishlist)
            .service(routes::wishlist::remove_from_wishlist)
            .service(routes::wishlist::clear_wishlist)
            .service(routes::wishlist::move_to_cart)
            .service(routes::wishlist::move_all_to_cart)
            .service(routes::orders::single_checkout_page)
            .service(routes::orders::single_checkout_submit)
            .service(routes::orders::bank_details_page)
            .service(routes::orders::bank_details_submit)
            .service(routes::orders::success)
            .service(routes::orders::my_orders)
            .service(routes::account::login_page)
            .service(routes::account::login_submit)
            .service(routes::account::register_page)
            .service(routes::account::register_submit)
            .service(routes::account::logout)
            .service(routes::account::settings_page)
            .service(routes::account::update_profile)
            .service(routes::account::change_password)
            .service(routes::admin::list_products)
            .service(routes::admin::new_product_page)
            .service(routes::admin::create_product)
            .service(routes::admin::edit_product_page)
            .service(routes::admin::update_product)
            .service(routes::admin::delete_product_page)
            .service(routes::admin::delete_product)
            .default_service(web::route().to(routes::main::not_found))
    })
    .bind(bind)?
    .run()
    .await
}
