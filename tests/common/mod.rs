//! Shared test infrastructure.
//!
//! - `local_store()` / `live_store()` - record stores over in-memory ports
//! - `test_app!` - the full route table behind a cookie session
//! - `send!` - issue a request, carrying the session cookie along
//! - `login!` - authenticate a cookie jar against the app
#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use regex::Regex;

use arranchamento::models::record::{DayMap, NewRecord};
use arranchamento::store::{MemoryKeyValue, MemoryTable, RecordStore};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "sgte";
pub const ADMIN_PASS: &str = "selva";

/// Cookie name used by actix-session.
pub const SESSION_COOKIE: &str = "id";

// ============================================================================
// STORES
// ============================================================================

/// Local-variant store over a volatile key-value port.
pub fn local_store() -> RecordStore {
    RecordStore::local(MemoryKeyValue::new())
}

/// Remote-variant store over an in-memory table. The table handle lets tests
/// inspect subscriptions.
pub fn live_store() -> (Arc<MemoryTable>, RecordStore) {
    let table = Arc::new(MemoryTable::new());
    let store = RecordStore::remote(table.clone());
    (table, store)
}

/// Candidate with the given rank and war-name, nothing else filled in.
pub fn candidate(graduacao: &str, nome_guerra: &str) -> NewRecord {
    NewRecord {
        graduacao: graduacao.to_string(),
        nome_guerra: nome_guerra.to_string(),
        ..NewRecord::default()
    }
}

/// Fully populated candidate.
pub fn full_candidate() -> NewRecord {
    NewRecord {
        nome: "João Carlos da Silva".to_string(),
        nome_guerra: "Silva".to_string(),
        graduacao: "Cb".to_string(),
        om: "B Adm".to_string(),
        breakfast: DayMap { monday: true, wednesday: true, ..DayMap::default() },
        lunch: DayMap { tuesday: true, friday: true, ..DayMap::default() },
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

/// Build the application service around a shared store.
macro_rules! test_app {
    ($store:expr) => {{
        let session_mw = actix_session::SessionMiddleware::builder(
            actix_session::storage::CookieSessionStore::default(),
            actix_web::cookie::Key::generate(),
        )
        .cookie_secure(false)
        .build();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(session_mw)
                .app_data($store.clone())
                .app_data(actix_web::web::Data::new(arranchamento::config::AppConfig::default()))
                .configure(arranchamento::routes::configure),
        )
        .await
    }};
}

/// Send a `TestRequest`, attaching and then refreshing the session cookie in `$jar`.
macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let mut req: actix_web::test::TestRequest = $req;
        let jar_ref: &Option<actix_web::cookie::Cookie<'static>> = &$jar;
        if let Some(cookie) = jar_ref.as_ref() {
            req = req.cookie(cookie.clone());
        }
        let resp = actix_web::test::call_service(&$app, req.to_request()).await;
        if let Some(cookie) = common::session_cookie(&resp) {
            $jar = Some(cookie);
        }
        resp
    }};
}

/// Log in with the admin pair. Evaluates to the POST /login response.
macro_rules! login {
    ($app:expr, $jar:expr) => {
        login!($app, $jar, common::ADMIN_USER, common::ADMIN_PASS)
    };
    ($app:expr, $jar:expr, $user:expr, $pass:expr) => {{
        let page = send!($app, $jar, actix_web::test::TestRequest::get().uri("/login"));
        let token = common::csrf_token(&common::body_text(page).await);
        send!(
            $app,
            $jar,
            common::form_post("/login", &[("csrf_token", token.as_str()), ("username", $user), ("password", $pass)])
        )
    }};
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8")
}

/// Pull the CSRF token out of a rendered page.
pub fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page has no CSRF token")
}

/// URL-encoded POST.
pub fn form_post(uri: &str, fields: &[(&str, &str)]) -> TestRequest {
    let body = serde_urlencoded::to_string(fields).expect("encode form");
    TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
