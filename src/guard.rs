//! Page access rules.

use std::fmt;

use crate::session::SessionState;

/// Every page of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    Signup,
    Verify,
    Onboarding,
    CareerPath,
}

impl Page {
    /// Pages that require a signed-in session.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Onboarding | Self::CareerPath)
    }

    /// Pages a signed-in user is sent away from.
    pub fn is_entry(self) -> bool {
        matches!(self, Self::Home | Self::Login | Self::Signup)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Verify => "/verify",
            Self::Onboarding => "/onboarding",
            Self::CareerPath => "/career-path",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The session is still loading; show a spinner.
    Wait,
    Show,
    Redirect(Page),
}

/// Decide whether `page` may be shown in `state`.
pub fn guard(page: Page, state: &SessionState) -> Decision {
    match state {
        SessionState::Loading => Decision::Wait,
        SessionState::SignedOut if page.is_protected() => Decision::Redirect(Page::Login),
        SessionState::SignedIn(_) if page.is_entry() => Decision::Redirect(Page::Onboarding),
        _ => Decision::Show,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    const ALL: [Page; 6] = [
        Page::Home,
        Page::Login,
        Page::Signup,
        Page::Verify,
        Page::Onboarding,
        Page::CareerPath,
    ];

    #[test]
    fn loading_waits_everywhere() {
        for page in ALL {
            assert_eq!(guard(page, &SessionState::Loading), Decision::Wait);
        }
    }

    #[test]
    fn signed_out_only_blocked_from_protected() {
        let state = SessionState::SignedOut;
        assert_eq!(
            guard(Page::Onboarding, &state),
            Decision::Redirect(Page::Login)
        );
        assert_eq!(
            guard(Page::CareerPath, &state),
            Decision::Redirect(Page::Login)
        );
        for page in [Page::Home, Page::Login, Page::Signup, Page::Verify] {
            assert_eq!(guard(page, &state), Decision::Show);
        }
    }

    #[test]
    fn signed_in_skips_entry_pages() {
        let state = SessionState::SignedIn(Session::new("tok", "Bearer"));
        for page in [Page::Home, Page::Login, Page::Signup] {
            assert_eq!(guard(page, &state), Decision::Redirect(Page::Onboarding));
        }
        for page in [Page::Verify, Page::Onboarding, Page::CareerPath] {
            assert_eq!(guard(page, &state), Decision::Show);
        }
    }

    #[test]
    fn paths() {
        assert_eq!(Page::CareerPath.to_string(), "/career-path");
        assert_eq!(Page::Home.path(), "/");
    }
}
