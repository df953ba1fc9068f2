use std::future::{Ready, ready};

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use serde::{Deserialize, Serialize};

use super::csrf;
use super::gate::AuthGate;
use crate::errors::AppError;

const AUTH_KEY: &str = "auth";
const FLASH_KEY: &str = "flash";

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl Flash {
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash-success",
            FlashKind::Error => "flash-error",
        }
    }
}

/// Per-request view of the browser session: the auth gate plus flash notices.
///
/// The session cookie carries no max-age, so the authenticated flag lasts
/// until the browser session ends and survives page reloads in between.
pub struct SessionContext {
    session: Session,
    gate: AuthGate,
}

impl SessionContext {
    pub fn load(session: Session) -> Self {
        let authenticated = session.get::<bool>(AUTH_KEY).unwrap_or(None).unwrap_or(false);
        Self { session, gate: AuthGate::restore(authenticated) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Check the credentials; on success persist the flag and rotate the session id.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if !self.gate.login(username, password) {
            return false;
        }
        if let Err(e) = self.session.insert(AUTH_KEY, true) {
            log::error!("Failed to persist login: {e}");
            self.gate.logout();
            return false;
        }
        self.session.renew();
        true
    }

    pub fn logout(&mut self) {
        self.gate.logout();
        self.session.remove(AUTH_KEY);
        self.session.renew();
    }

    /// Token to embed in this page's forms.
    pub fn csrf_token(&self) -> String {
        csrf::issue(&self.session)
    }

    pub fn verify_csrf(&self, submitted: &str) -> Result<(), AppError> {
        csrf::verify(&self.session, submitted)
    }

    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) {
        let flash = Flash { kind, message: message.into() };
        if let Err(e) = self.session.insert(FLASH_KEY, &flash) {
            log::warn!("Failed to store flash notice: {e}");
        }
    }

    pub fn take_flash(&self) -> Option<Flash> {
        let flash = self.session.get::<Flash>(FLASH_KEY).unwrap_or(None);
        if flash.is_some() {
            self.session.remove(FLASH_KEY);
        }
        flash
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(SessionContext::load(req.get_session())))
    }
}
