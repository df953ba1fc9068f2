//! Per-session form tokens. Every POST form embeds the session's token and
//! handlers refuse submissions carrying any other value.

use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const TOKEN_KEY: &str = "form_token";
const TOKEN_BYTES: usize = 32;

/// The session's form token, minted on first use.
pub fn issue(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(TOKEN_KEY) {
        return token;
    }
    let token = hex::encode(rand::rng().random::<[u8; TOKEN_BYTES]>());
    if let Err(e) = session.insert(TOKEN_KEY, &token) {
        log::warn!("Failed to store form token: {e}");
    }
    token
}

/// Accept a submission only when it carries the session's token.
pub fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    match session.get::<String>(TOKEN_KEY) {
        Ok(Some(expected)) if secrets_match(&expected, submitted) => Ok(()),
        _ => {
            log::warn!("Rejected form submission with a missing or stale token");
            Err(AppError::Csrf)
        }
    }
}

/// Equality whose running time depends only on the input lengths.
pub(crate) fn secrets_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_match_is_plain_equality() {
        assert!(secrets_match("abc", "abc"));
        assert!(!secrets_match("abc", "abd"));
        assert!(!secrets_match("abc", "ab"));
        assert!(!secrets_match("", "a"));
        assert!(secrets_match("", ""));
    }
}
