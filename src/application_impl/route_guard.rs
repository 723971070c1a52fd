use crate::domain_model::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GuardOutcome {
    /// Bootstrap has not settled yet; show a neutral placeholder.
    Loading,
    Redirect(Route),
    Render,
}

/// Render-time gate in front of a protected view.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    allowed_roles: Option<Vec<Role>>,
}

impl RouteGuard {
    /// Any signed-in user may pass.
    pub fn signed_in() -> Self {
        Self {
            allowed_roles: None,
        }
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: Some(roles.into_iter().collect()),
        }
    }

    /// `None` for routes that need no guard at all.
    pub fn for_route(route: Route) -> Option<Self> {
        match route.access() {
            Access::Public => None,
            Access::SignedIn => Some(Self::signed_in()),
            Access::Roles(roles) => Some(Self::with_roles(roles.iter().copied())),
        }
    }

    pub fn check(&self, state: &SessionState) -> GuardOutcome {
        match state {
            SessionState::Unknown => GuardOutcome::Loading,
            SessionState::Unauthorized => GuardOutcome::Redirect(Route::SIGN_IN),
            SessionState::Authorized(claims) => match &self.allowed_roles {
                // Signed in but not allowed: never bounce to sign-in.
                Some(roles) if !roles.contains(&claims.role) => {
                    GuardOutcome::Redirect(Route::DEFAULT_AUTHENTICATED)
                }
                _ => GuardOutcome::Render,
            },
        }
    }
}

/// Decides what to show for a path given the current session.
pub fn resolve_route(path: &str, state: &SessionState) -> (Route, GuardOutcome) {
    let route = Route::from_path(path);
    if route == Route::Logout {
        // Nothing to show there; the session is gone, go sign in.
        return (route, GuardOutcome::Redirect(Route::SIGN_IN));
    }
    let outcome = match RouteGuard::for_route(route) {
        Some(guard) => guard.check(state),
        None => GuardOutcome::Render,
    };
    (route, outcome)
}
