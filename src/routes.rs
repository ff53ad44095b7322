//! Client-side routes and backend endpoints.

/// Client-side route paths.
pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const ACCESSIBILITY_STATEMENT: &str = "/accessibility-statement";
    pub const APPLICATION_FORM: &str = "/new-application";
    pub const APPLICATION: &str = "/application";
    pub const BATCHES: &str = "/batches";
    pub const ARCHIVE: &str = "/archive";
}

/// Routes reachable without an authenticated session.
pub const UNAUTHENTICATED_ROUTES: [&str; 2] = [paths::LOGIN, paths::ACCESSIBILITY_STATEMENT];

/// Backend REST endpoints, relative to the API base URL.
pub mod endpoints {
    pub const APPLICATIONS: &str = "/v1/applications/";
    pub const APPLICATIONS_SIMPLIFIED: &str = "/v1/applications/simplified/";
    pub const USER_ME: &str = "/v1/users/me/";

    pub fn application(id: &str) -> String {
        format!("/v1/applications/{}/", urlencoding::encode(id))
    }

    pub fn batch_status_change(id: &str) -> String {
        format!(
            "/v1/handlerapplicationbatches/{}/status/",
            urlencoding::encode(id)
        )
    }
}

/// Whether a route can be shown without signing in.
pub fn is_unauthenticated_route(route: &str) -> bool {
    UNAUTHENTICATED_ROUTES.contains(&route)
}

/// Path of the application form for an application, optionally with the
/// message drawer open.
pub fn application_form_path(id: &str, open_drawer: bool) -> String {
    let mut path = format!("{}?id={}", paths::APPLICATION_FORM, urlencoding::encode(id));
    if open_drawer {
        path.push_str("&openDrawer=1");
    }
    path
}

/// Login path for a locale, optionally continuing a logout.
pub fn login_path(locale: &str, logout: bool) -> String {
    let mut path = format!("/{}{}", locale.trim_matches('/'), paths::LOGIN);
    if logout {
        path.push_str("?logout=true");
    }
    path
}
