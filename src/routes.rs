use actix_web::{HttpResponse, web};

use crate::auth;
use crate::handlers::{auth_handlers, live, record_handlers};

/// Register every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Static files
        .service(actix_files::Files::new("/static", "./static"))
        // Public routes
        .route("/", web::get().to(record_handlers::form))
        .route("/", web::post().to(record_handlers::submit))
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/records", web::get().to(record_handlers::list))
                // /records/clear and the export paths BEFORE /records/{id}/...
                .route("/records/clear", web::post().to(record_handlers::clear))
                .route("/records/export/document", web::get().to(record_handlers::export_document))
                .route("/records/export/spreadsheet", web::get().to(record_handlers::export_spreadsheet))
                .route("/records/live", web::get().to(live::ws_connect))
                .route("/records/{id}/delete", web::post().to(record_handlers::delete))
                // Default 404 handler (must be registered last)
                .default_service(web::to(not_found)),
        );
}

async fn not_found() -> HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
