/// The single account allowed to view the records table. Fixed at build
/// time; there is no user model behind it.
const ADMIN_USERNAME: &str = "sgte";
const ADMIN_PASSWORD: &str = "selva";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

/// Two-state login gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate {
    state: AuthState,
}

impl AuthGate {
    pub const fn new() -> Self {
        Self { state: AuthState::Anonymous }
    }

    /// Gate restored from a persisted flag.
    pub const fn restore(authenticated: bool) -> Self {
        let state = if authenticated { AuthState::Authenticated } else { AuthState::Anonymous };
        Self { state }
    }

    pub const fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Authenticate on an exact match of the fixed pair. Any other input
    /// leaves the state untouched.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let user_ok = super::csrf::secrets_match(username, ADMIN_USERNAME);
        let pass_ok = super::csrf::secrets_match(password, ADMIN_PASSWORD);
        if user_ok && pass_ok {
            self.state = AuthState::Authenticated;
            true
        } else {
            false
        }
    }

    pub fn logout(&mut self) {
        self.state = AuthState::Anonymous;
    }
}
