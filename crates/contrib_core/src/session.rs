//! Logout handling for signed-in users.
//!
//! # Responsibility
//! - Decide how a user is signed out based on their identity kind.
//! - Hand the decision to the web layer as data (`LogoutPlan`).
//!
//! # Invariants
//! - Google users are sent through the provider's logout endpoint and their
//!   session cookie is left to the provider.
//! - OpenID users get the local session cookie cleared, then go straight to
//!   the requested page.

use crate::model::user::{Identity, User, UserValidationError};
use log::info;

/// Header value that expires the local session cookie.
pub const SESSION_CLEAR_COOKIE: &str = "session=; path=/";
pub const SET_COOKIE_HEADER: &str = "Set-Cookie";

/// External identity provider that can build logout URLs.
pub trait IdentityProvider {
    /// URL that signs the user out and then continues to `next_url`.
    fn logout_url(&self, next_url: &str) -> String;
}

/// Response side of a web handler.
pub trait ResponseSink {
    fn add_header(&mut self, name: &str, value: &str);
    fn redirect(&mut self, url: &str);
}

/// What the web layer must do to complete a logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutPlan {
    pub redirect_to: String,
    /// `Set-Cookie` value to emit before redirecting.
    pub set_cookie: Option<String>,
}

impl LogoutPlan {
    /// Writes the plan to a response: cookie header first, then redirect.
    pub fn apply(&self, response: &mut impl ResponseSink) {
        if let Some(cookie) = self.set_cookie.as_deref() {
            response.add_header(SET_COOKIE_HEADER, cookie);
        }
        response.redirect(&self.redirect_to);
    }
}

pub struct SessionService<P: IdentityProvider> {
    provider: P,
}

impl<P: IdentityProvider> SessionService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Builds the logout plan for `user`.
    ///
    /// # Errors
    /// Returns the identity validation error when `user` has no single
    /// identity.
    pub fn logout(&self, user: &User, next_url: &str) -> Result<LogoutPlan, UserValidationError> {
        let identity = user.identity()?;
        info!(
            "event=logout module=session status=ok kind={:?}",
            identity.kind()
        );
        let plan = match identity {
            Identity::Google(_) => LogoutPlan {
                redirect_to: self.provider.logout_url(next_url),
                set_cookie: None,
            },
            Identity::OpenId(_) => LogoutPlan {
                redirect_to: next_url.to_string(),
                set_cookie: Some(SESSION_CLEAR_COOKIE.to_string()),
            },
        };
        Ok(plan)
    }
}
