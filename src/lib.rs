//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod storage;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Margine per boundary e header del body multipart oltre alla dimensione del file
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::authentication_middleware;

    // Tutte le rotte /api tranne il login richiedono il token
    let protected = Router::new()
        .nest("/auth", configure_session_routes())
        .nest("/families", configure_family_routes())
        .nest("/members", configure_member_routes(&state))
        .nest("/staff", configure_staff_routes(&state))
        .nest("/donations", configure_donation_routes())
        .nest("/departments", configure_department_routes())
        .nest("/teams", configure_team_routes())
        .nest("/events", configure_event_routes())
        .nest("/announcements", configure_announcement_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    let api = Router::new()
        .route("/auth/login", post(services::login))
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .nest_service(storage::PUBLIC_PREFIX, ServeDir::new(state.uploads.dir()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Limite del body per le rotte di upload
fn upload_limit(state: &AppState) -> DefaultBodyLimit {
    DefaultBodyLimit::max(state.uploads.max_bytes() + MULTIPART_OVERHEAD_BYTES)
}

/// Configura le routes della sessione (me, logout)
fn configure_session_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
}

/// Configura le routes per la gestione delle famiglie
fn configure_family_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_families).post(create_family))
        .route(
            "/{family_id}",
            get(get_family).put(update_family).delete(delete_family),
        )
}

/// Configura le routes per la gestione dei membri
fn configure_member_routes(state: &AppState) -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/{member_id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/{member_id}/family", patch(assign_family))
        .route("/{member_id}/teams", get(list_member_teams))
        .route(
            "/{member_id}/picture",
            post(upload_member_picture)
                .delete(delete_member_picture)
                .layer(upload_limit(state)),
        )
}

/// Configura le routes per la gestione dello staff
fn configure_staff_routes(state: &AppState) -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route(
            "/{staff_id}",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route(
            "/{staff_id}/picture",
            post(upload_staff_picture).layer(upload_limit(state)),
        )
}

/// Configura le routes per le offerte
fn configure_donation_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_donations).post(create_donation))
        .route("/summary", get(donation_summary))
        .route(
            "/{donation_id}",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
}

/// Configura le routes per i reparti
fn configure_department_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{department_id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

/// Configura le routes per i team e i loro membri
fn configure_team_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route(
            "/{team_id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route(
            "/{team_id}/members",
            get(list_team_members).post(add_team_member),
        )
        .route(
            "/{team_id}/members/{member_id}",
            patch(update_team_member).delete(remove_team_member),
        )
        .route("/{team_id}/members/{member_id}/move", post(move_team_member))
}

/// Configura le routes per gli eventi
fn configure_event_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// Configura le routes per gli avvisi
fn configure_announcement_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route(
            "/{announcement_id}",
            get(get_announcement)
                .put(update_announcement)
                .delete(delete_announcement),
        )
}
