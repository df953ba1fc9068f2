use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::session::{FlashKind, SessionContext};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::store::RecordStore;
use crate::templates_structs::{LoginTemplate, PageContext};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    // Already logged in: straight to the table
    if ctx.is_authenticated() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/records"))
            .finish());
    }

    let count = store.list().await.len();
    let page = PageContext::build(&ctx, &config, "/login", count);
    render(LoginTemplate { ctx: page, error: None, username: String::new() })
}

pub async fn login_submit(
    mut ctx: SessionContext,
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    ctx.verify_csrf(&form.csrf_token)?;

    if ctx.login(&form.username, &form.password) {
        log::info!("Table access granted");
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/records"))
            .finish());
    }

    log::warn!("Rejected login attempt for {:?}", form.username);
    let count = store.list().await.len();
    let page = PageContext::build(&ctx, &config, "/login", count);
    render(LoginTemplate {
        ctx: page,
        error: Some("Usuário ou senha inválidos".to_string()),
        username: form.username.clone(),
    })
}

pub async fn logout(
    mut ctx: SessionContext,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    ctx.verify_csrf(&form.csrf_token)?;
    ctx.logout();
    ctx.flash(FlashKind::Success, "Sessão encerrada");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .finish())
}
