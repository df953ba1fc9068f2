use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use arranchamento::config::{AppConfig, MIN_SESSION_KEY_LEN};
use arranchamento::routes;
use arranchamento::store::RecordStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let store = RecordStore::open(&config.storage)
        .await
        .map_err(std::io::Error::other)?;

    // Session signing key, loaded from SESSION_KEY so logins survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let store = web::Data::new(store);
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        // No max-age: the cookie, and the login it carries, end with the browser session
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(config.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
