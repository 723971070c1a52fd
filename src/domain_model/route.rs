use super::Role;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Login,
    Register,
    Logout,
    Dashboard,
    Profile,
    ResumeGenerate,
    PredictionHistory,
    Admin,
    NotFound,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Access {
    Public,
    SignedIn,
    Roles(&'static [Role]),
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Route {
    pub const SIGN_IN: Route = Route::Login;
    pub const DEFAULT_AUTHENTICATED: Route = Route::Dashboard;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::ResumeGenerate => "/resume-generate",
            Route::PredictionHistory => "/prediction-history",
            Route::Admin => "/admin",
            Route::NotFound => "/404",
        }
    }

    /// Unknown paths resolve to `NotFound`. A single trailing slash is ignored.
    pub fn from_path(path: &str) -> Route {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        match trimmed {
            "/" | "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/logout" => Route::Logout,
            "/dashboard" => Route::Dashboard,
            "/profile" => Route::Profile,
            "/resume-generate" => Route::ResumeGenerate,
            "/prediction-history" => Route::PredictionHistory,
            "/admin" => Route::Admin,
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing | Route::Login | Route::Register | Route::Logout | Route::NotFound => {
                Access::Public
            }
            Route::Dashboard | Route::Profile | Route::ResumeGenerate | Route::PredictionHistory => {
                Access::SignedIn
            }
            Route::Admin => Access::Roles(ADMIN_ONLY),
        }
    }

    /// Entering these routes drops whatever session is active.
    pub fn ends_session(&self) -> bool {
        matches!(self, Route::Logout | Route::Register)
    }

    /// Where a freshly signed-in user is sent.
    pub fn landing_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::Admin,
            Role::User => Route::DEFAULT_AUTHENTICATED,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
