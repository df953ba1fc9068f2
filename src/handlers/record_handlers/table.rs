use actix_web::{web, HttpResponse};

use crate::auth::session::{FlashKind, SessionContext};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::store::RecordStore;
use crate::templates_structs::{PageContext, RecordTableTemplate};
use super::helpers::redirect;

/// GET /records: every record in the weekday grid
pub async fn list(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let records = store.list().await;
    let page = PageContext::build(&ctx, &config, "/records", records.len());
    render(RecordTableTemplate::new(page, &records, store.is_live()))
}

/// POST /records/{id}/delete
pub async fn delete(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    ctx.verify_csrf(&form.csrf_token)?;

    let id = path.into_inner();
    if store.delete(&id).await {
        ctx.flash(FlashKind::Success, "Registro excluído");
    } else {
        ctx.flash(FlashKind::Error, "Erro ao excluir o registro");
    }
    Ok(redirect("/records"))
}

/// POST /records/clear: remove everything
pub async fn clear(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    ctx.verify_csrf(&form.csrf_token)?;

    if store.clear_all().await {
        ctx.flash(FlashKind::Success, "Todos os registros foram excluídos");
    } else {
        ctx.flash(FlashKind::Error, "Erro ao excluir os registros");
    }
    Ok(redirect("/records"))
}
