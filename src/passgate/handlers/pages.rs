//! Redirects from friendly paths to the static pages.

use axum::response::Redirect;

pub const LOGIN_PAGE: &str = "/login.html";
pub const REGISTER_PAGE: &str = "/register.html";

pub async fn root() -> Redirect {
    Redirect::to(LOGIN_PAGE)
}

pub async fn login_page() -> Redirect {
    Redirect::to(LOGIN_PAGE)
}

pub async fn register_page() -> Redirect {
    Redirect::to(REGISTER_PAGE)
}
