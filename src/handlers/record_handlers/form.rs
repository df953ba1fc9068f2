use actix_web::{web, HttpResponse};

use crate::auth::session::{FlashKind, SessionContext};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::record::RecordForm;
use crate::store::RecordStore;
use crate::templates_structs::{PageContext, RecordFormTemplate};
use super::helpers;

/// GET /: empty registration form
pub async fn form(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let count = store.list().await.len();
    let page = PageContext::build(&ctx, &config, "/", count);
    render(RecordFormTemplate::blank(page))
}

/// POST /: validate and store a submission
pub async fn submit(
    ctx: SessionContext,
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
    form: web::Form<RecordForm>,
) -> Result<HttpResponse, AppError> {
    ctx.verify_csrf(&form.csrf_token)?;

    let errors = helpers::validate_record_form(&form);
    if !errors.is_empty() {
        let count = store.list().await.len();
        let page = PageContext::build(&ctx, &config, "/", count);
        return render(RecordFormTemplate::refill(page, &form, errors));
    }

    if store.add(form.to_new_record()).await {
        ctx.flash(FlashKind::Success, "Registro salvo! Arranchamento registrado com sucesso.");
        return Ok(helpers::redirect("/"));
    }

    let count = store.list().await.len();
    let page = PageContext::build(&ctx, &config, "/", count);
    let errors = vec!["Não foi possível salvar o registro. Tente novamente.".to_string()];
    render(RecordFormTemplate::refill(page, &form, errors))
}
