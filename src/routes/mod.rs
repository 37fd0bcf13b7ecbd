//! Screen table of the application and the role checks guarding it.

use std::fmt::{Display, Formatter};

use crate::domain::user::User;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Landing page, shows the login form.
    Root,
    Login,
    Register,
    AdminDashboard,
    AdminUsers,
    /// Storefront catalog of a signed-in user.
    Home,
    Products,
    ProductDetail(String),
    NotFound,
}

/// Who may open a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Anonymous only; signed-in users are sent to their start page.
    Public,
    /// Any signed-in user.
    Protected,
    /// Signed-in users with the `admin` role.
    Admin,
    /// Everyone.
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    Render,
    Redirect(Route),
}

impl Route {
    /// Resolves a location, ignoring its query string and trailing slash.
    pub fn parse(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "users"] => Route::AdminUsers,
            ["home"] => Route::Home,
            ["products"] => Route::Products,
            ["products", id] => Route::ProductDetail((*id).to_string()),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::Home => "/home".to_string(),
            Route::Products => "/products".to_string(),
            Route::ProductDetail(id) => format!("/products/{id}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Root | Route::Login | Route::Register => Access::Public,
            Route::AdminDashboard | Route::AdminUsers => Access::Admin,
            Route::Home | Route::Products | Route::ProductDetail(_) => Access::Protected,
            Route::NotFound => Access::Open,
        }
    }

    /// Start page of a signed-in user.
    pub fn start_page(user: &User) -> Self {
        if user.is_admin() {
            Route::AdminDashboard
        } else {
            Route::Home
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Decides whether `route` renders for the signed-in `user`, if any.
pub fn guard(route: &Route, user: Option<&User>) -> Guard {
    match (route.access(), user) {
        (Access::Open, _) => Guard::Render,
        (Access::Public, None) => Guard::Render,
        (Access::Public, Some(user)) => Guard::Redirect(Route::start_page(user)),
        (Access::Protected | Access::Admin, None) => Guard::Redirect(Route::Login),
        (Access::Admin, Some(user)) if !user.is_admin() => Guard::Redirect(Route::Home),
        (Access::Protected | Access::Admin, Some(_)) => Guard::Render,
    }
}

/// Follows redirects until a route renders.
pub fn resolve(location: &str, user: Option<&User>) -> Route {
    let mut route = Route::parse(location);
    // Redirect targets render for the same user.
    for _ in 0..3 {
        match guard(&route, user) {
            Guard::Render => return route,
            Guard::Redirect(target) => {
                log::debug!("Redirecting {route} to {target}");
                route = target;
            }
        }
    }
    route
}
