pub mod db;
pub mod domain;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;

use axum::Router;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::quiz::routes())
        .merge(handlers::question::routes())
        .with_state(state)
}
