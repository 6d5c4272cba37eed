use contrib_core::session::SESSION_CLEAR_COOKIE;
use contrib_core::{IdentityProvider, SessionService, User, UserValidationError};

struct FakeProvider;

impl IdentityProvider for FakeProvider {
    fn logout_url(&self, next_url: &str) -> String {
        format!("https://accounts.example/logout?continue={next_url}")
    }
}

#[test]
fn google_user_is_sent_through_provider_logout() {
    let service = SessionService::new(FakeProvider);
    let plan = service
        .logout(&User::from_google("alice@example.com"), "/projects")
        .unwrap();

    assert_eq!(
        plan.redirect_to,
        "https://accounts.example/logout?continue=/projects"
    );
    assert_eq!(plan.set_cookie, None);
}

#[test]
fn openid_user_gets_session_cookie_cleared() {
    let service = SessionService::new(FakeProvider);
    let plan = service
        .logout(&User::from_openid("http://x.com/bob"), "/")
        .unwrap();

    assert_eq!(plan.redirect_to, "/");
    assert_eq!(plan.set_cookie.as_deref(), Some(SESSION_CLEAR_COOKIE));
    assert_eq!(SESSION_CLEAR_COOKIE, "session=; path=/");
}

#[test]
fn user_without_identity_cannot_log_out() {
    let service = SessionService::new(FakeProvider);
    let user = User {
        google_user: None,
        openid_user: None,
        url: None,
        last_login: None,
    };

    assert_eq!(
        service.logout(&user, "/"),
        Err(UserValidationError::MissingIdentity)
    );
}
