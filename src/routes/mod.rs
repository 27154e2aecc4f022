pub mod auth;
pub mod clients;
pub mod leads;
pub mod projects;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        // Leads
        .route("/api/leads", get(leads::list).post(leads::create))
        .route(
            "/api/leads/{id}",
            get(leads::get)
                .put(leads::update)
                .patch(leads::partial_update)
                .delete(leads::delete),
        )
        // Clients
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/{id}",
            get(clients::get)
                .put(clients::update)
                .patch(clients::partial_update)
                .delete(clients::delete),
        )
        // Projects
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .patch(projects::partial_update)
                .delete(projects::delete),
        )
        // Users (admin only)
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/{id}", get(users::get).delete(users::delete))
}
