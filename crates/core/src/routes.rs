//! Pages and the guard in front of the protected ones
//!
//! The guard decides; it never navigates. Callers receive an [`Access`] and
//! perform the redirect themselves.

use crate::error::{CoreError, CoreResult};
use crate::session::SessionCheck;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Groups,
}

impl Route {
    /// Every page, in navigation order
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::Groups,
    ];

    /// Canonical path of the page
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Groups => "/groups",
        }
    }

    /// Resolve a path; `/home` is an alias of `/`
    ///
    /// A leading slash and one trailing slash are optional.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        match trimmed {
            "" | "home" => Some(Self::Home),
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "dashboard" => Some(Self::Dashboard),
            "groups" => Some(Self::Groups),
            _ => None,
        }
    }

    /// Whether the page needs a signed-in session
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Groups)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_path(s).ok_or_else(|| CoreError::unknown_route(s))
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the requested page
    Render,
    /// Render nothing and navigate to `to`, remembering `from`
    Redirect(Redirect),
}

/// A pending redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// The page originally requested, for the post-login return
    pub from: Route,
}

/// Decide whether `route` may render for the given session state
///
/// Token presence is the only check; validity is left to the backend.
pub fn check_access(route: Route, session: &SessionCheck) -> Access {
    if route.requires_auth() && !session.is_authorized() {
        debug!(%route, "Protected page requested without a session");
        return Access::Redirect(Redirect {
            to: Route::Login,
            from: route,
        });
    }
    Access::Render
}

/// Where to land after a successful login
pub fn post_login_destination(from: Option<Route>) -> Route {
    match from {
        Some(route) if route != Route::Login && route != Route::Register => route,
        _ => Route::Dashboard,
    }
}

/// Guard state for one mounted page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Allowed,
    Redirecting(Redirect),
}

/// Two-state guard: `Checking` moves to `Allowed` or `Redirecting`
///
/// Re-evaluated on every navigation, so clearing the token turns a page that
/// was allowed into a redirect on the next evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    route: Route,
    state: GuardState,
}

impl RouteGuard {
    pub const fn new(route: Route) -> Self {
        Self {
            route,
            state: GuardState::Checking,
        }
    }

    pub const fn route(&self) -> Route {
        self.route
    }

    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Navigate to a new route; the guard goes back to `Checking`
    pub fn navigate(&mut self, route: Route) {
        self.route = route;
        self.state = GuardState::Checking;
    }

    /// Run the check and record the resulting state
    pub fn evaluate(&mut self, session: &SessionCheck) -> GuardState {
        self.state = match check_access(self.route, session) {
            Access::Render => GuardState::Allowed,
            Access::Redirect(redirect) => GuardState::Redirecting(redirect),
        };
        self.state
    }

    /// Whether the wrapped page should render
    pub const fn renders(&self) -> bool {
        matches!(self.state, GuardState::Allowed)
    }
}
