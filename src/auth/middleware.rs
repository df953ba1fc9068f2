use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
};

use super::session::SessionContext;

const LOGIN_PATH: &str = "/login";

/// Guard for the records table and everything under it. Anonymous visitors
/// are sent to the login page; the registration form stays outside this guard.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if SessionContext::load(req.get_session()).is_authenticated() {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    log::debug!("Anonymous request for {} sent to login", req.path());
    let to_login = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish();
    Ok(req.into_response(to_login).map_into_right_body())
}
