use actix_web::HttpResponse;

use crate::auth::validate::{MAX_TEXT_LEN, validate_optional, validate_required};
use crate::models::record::RecordForm;

/// Validate the registration form. P/G and Nome de Guerra are required.
pub fn validate_record_form(form: &RecordForm) -> Vec<String> {
    let mut errors = vec![];
    errors.extend(validate_required(&form.graduacao, "P/G", MAX_TEXT_LEN));
    errors.extend(validate_required(&form.nome_guerra, "Nome de Guerra", MAX_TEXT_LEN));
    errors.extend(validate_optional(&form.nome, "Nome", MAX_TEXT_LEN));
    errors.extend(validate_optional(&form.om, "OM", MAX_TEXT_LEN));
    errors
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}
