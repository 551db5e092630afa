use std::fmt;

use crate::{models::Id, session::SessionState};

/// Outcome of running a guard against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Bootstrap has not finished; show a neutral loading indicator
    Loading,
    Admit,
    Redirect(Route),
}

/// Admits only a signed-in user
pub fn authenticated_only(state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Authenticated(_) => GuardDecision::Admit,
        SessionState::Anonymous => GuardDecision::Redirect(Route::Login),
    }
}

/// Admits only when nobody is signed in
pub fn anonymous_only(state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::Admit,
        SessionState::Authenticated(_) => GuardDecision::Redirect(Route::Feed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    /// `/`, which only forwards to the feed
    Home,
    Feed,
    Connections,
    Profile(Id),
    EditProfile,
    Watchlist,
    Post(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Authenticated,
    Anonymous,
}

impl Guard {
    pub fn check(self, state: &SessionState) -> GuardDecision {
        match self {
            Self::Authenticated => authenticated_only(state),
            Self::Anonymous => anonymous_only(state),
        }
    }
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["feed"] => Self::Feed,
            ["connections"] => Self::Connections,
            ["watchlist"] => Self::Watchlist,
            ["profile", "edit"] => Self::EditProfile,
            ["profile", id] => Self::Profile(id.parse().ok()?),
            ["post", id] => Self::Post(id.parse().ok()?),
            _ => return None,
        };
        Some(route)
    }

    pub fn guard(self) -> Guard {
        match self {
            Self::Login | Self::Register => Guard::Anonymous,
            _ => Guard::Authenticated,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Login => write!(f, "/login"),
            Self::Register => write!(f, "/register"),
            Self::Home => write!(f, "/"),
            Self::Feed => write!(f, "/feed"),
            Self::Connections => write!(f, "/connections"),
            Self::Profile(id) => write!(f, "/profile/{}", id),
            Self::EditProfile => write!(f, "/profile/edit"),
            Self::Watchlist => write!(f, "/watchlist"),
            Self::Post(id) => write!(f, "/post/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Loading,
    Show(Route),
    Redirect(Route),
    NotFound,
}

/// Resolves a path against the route table, following redirects
pub fn navigate(path: &str, state: &SessionState) -> Navigation {
    let Some(mut route) = Route::parse(path) else {
        return Navigation::NotFound;
    };

    let mut redirected = false;
    // each hop moves towards a route the guard admits, so this settles quickly
    for _ in 0..4 {
        match route.guard().check(state) {
            GuardDecision::Loading => return Navigation::Loading,
            GuardDecision::Redirect(to) => {
                route = to;
                redirected = true;
            }
            GuardDecision::Admit if route == Route::Home => {
                route = Route::Feed;
                redirected = true;
            }
            GuardDecision::Admit if redirected => return Navigation::Redirect(route),
            GuardDecision::Admit => return Navigation::Show(route),
        }
    }
    Navigation::Redirect(route)
}
