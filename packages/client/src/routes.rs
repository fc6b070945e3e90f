//! Front-end routes the client redirects to or builds links for

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Me,
    MyPlants,
    AddPlant,
    Plant(u64),
    GuestAccess(String),
    Share(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Me => "/me".to_string(),
            Route::MyPlants => "/my-plants".to_string(),
            Route::AddPlant => "/add-plant".to_string(),
            Route::Plant(id) => format!("/my-plants/{}", id),
            Route::GuestAccess(code) => format!("/guest-access/{}", urlencoding::encode(code)),
            Route::Share(code) => format!("/guest-access/{}/share", urlencoding::encode(code)),
        }
    }

    /// Parse a path (query and fragment ignored). Unknown paths give `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["me"] => Some(Route::Me),
            ["my-plants"] => Some(Route::MyPlants),
            ["add-plant"] => Some(Route::AddPlant),
            ["my-plants", id] => id.parse().ok().map(Route::Plant),
            ["guest-access", code] => decode(code).map(Route::GuestAccess),
            ["guest-access", code, "share"] => decode(code).map(Route::Share),
            _ => None,
        }
    }

    /// Routes that require a resolved identity
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Me | Route::MyPlants | Route::AddPlant | Route::Plant(_)
        )
    }
}

fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment)
        .ok()
        .map(|s| s.into_owned())
        .filter(|s| !s.is_empty())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
