//! Static landing page

use axum::{Router, response::Html, routing::get};

const HOME_PAGE: &str = include_str!("../../static/home.html");

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
