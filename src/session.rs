//! Session
//!
//! At most one authenticated identity per session. Authentication is a demo
//! mock: registration and login always succeed and no credential store
//! exists. The session is an owned value, not ambient global state, so tests
//! can run independent sessions side by side.

use tracing::debug;
use uuid::Uuid;

/// Fixed id of the profile synthesized by [`Session::login`].
const DEMO_USER_ID: &str = "u-123";
const DEMO_USER_NAME: &str = "Usuário ITZ";
const DEMO_USER_ADDRESS: &str = "Centro, Imperatriz - MA";
const DEMO_USER_PHONE: &str = "(99) 99123-4567";

/// An authenticated marketplace user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Free-text address, also used as the shipping destination at checkout.
    pub address: String,

    /// Contact phone number.
    pub phone: String,
}

/// Fields submitted by the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Free-text address.
    pub address: String,

    /// Contact phone number.
    pub phone: String,

    /// Accepted and discarded; no credential store exists.
    pub password: String,
}

/// Fields submitted by the login form.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Contact email, carried into the synthesized profile.
    pub email: String,

    /// Accepted and discarded; no credential store exists.
    pub password: String,
}

/// Session
#[derive(Debug, Default)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    /// Create a new unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Session { current: None }
    }

    /// The active user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Whether a user is active.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Register a new user and make it the active session.
    ///
    /// Always succeeds: a fresh id is generated and the submitted fields are
    /// copied verbatim. Any previously active user is replaced.
    pub fn register(&mut self, form: RegistrationForm) -> &User {
        let user = User {
            id: format!("u-{}", Uuid::new_v4()),
            name: form.name,
            email: form.email,
            address: form.address,
            phone: form.phone,
        };

        debug!(user_id = %user.id, "registered user");

        self.current.insert(user)
    }

    /// Log in and make the resulting user the active session.
    ///
    /// Always succeeds regardless of credential correctness: there is no
    /// backing credential store, so a fixed demo profile is synthesized,
    /// reusing only the submitted email. This mock is intentional for the
    /// demo and preserved by design.
    pub fn login(&mut self, credentials: Credentials) -> &User {
        let user = User {
            id: DEMO_USER_ID.to_string(),
            name: DEMO_USER_NAME.to_string(),
            email: credentials.email,
            address: DEMO_USER_ADDRESS.to_string(),
            phone: DEMO_USER_PHONE.to_string(),
        };

        debug!(user_id = %user.id, "logged in");

        self.current.insert(user)
    }

    /// Clear the active user.
    pub fn logout(&mut self) {
        if self.current.take().is_some() {
            debug!("logged out");
        }
    }
}
