pub mod admin;
pub mod auth;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/", get(auth::login_page))
        .route("/auth/login", get(auth::login_page))
        // Admin
        .route("/admin", get(admin::index))
        .route("/admin/leads", get(admin::leads_page))
        .route("/admin/clients", get(admin::clients_page))
        .route("/admin/projects", get(admin::projects_page))
}
