use askama::Template;
use axum::response::{Html, IntoResponse};

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {}

pub async fn login_page() -> impl IntoResponse {
    let template = LoginTemplate {};
    Html(template.render().unwrap_or_default())
}
