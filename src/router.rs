use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get_service,
};
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{
        Expiry, SessionManagerLayer,
        cookie::{SameSite, time},
    },
};
use sea_orm::DatabaseConnection;
use tokio::{signal, task::AbortHandle};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::auth::{self, user::Backend};
use crate::routes;
use crate::sms::SmsSender;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sms: Arc<dyn SmsSender>,
}

pub async fn create_router(
    db: DatabaseConnection,
    sms: Arc<dyn SmsSender>,
    session_store: PostgresStore,
    frontend_origin: Option<String>,
) -> anyhow::Result<Router> {
    let state = AppState {
        db: db.clone(),
        sms,
    };

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax) // Ensure we send the cookie on the frontend's fetches.
        .with_expiry(Expiry::OnInactivity(time::Duration::days(1)));

    // Auth service.
    //
    // This combines the session layer with our backend to establish the auth
    // service which will provide the auth session as a request extension.
    let backend = Backend::new(db);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let mut app = Router::new()
        .merge(auth::router::router())
        .merge(routes::event::router())
        .merge(routes::event_segment::router())
        .merge(routes::event_attendee::router())
        .merge(routes::event_attendee_contribution::router())
        .merge(routes::event_invitation::router())
        .merge(routes::event_chat_message::router())
        .merge(routes::event_chat_message_reaction::router())
        .merge(routes::user::router())
        .merge(routes::user_allergy::router())
        .with_state(state)
        .nest_service("/static", get_service(ServeDir::new("static")))
        .layer(TraceLayer::new_for_http())
        .layer(auth_layer);

    if let Some(origin) = frontend_origin {
        let cors = CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);
        app = app.layer(cors);
    }

    Ok(app)
}

pub async fn shutdown_signal(deletion_task_abort_handle: AbortHandle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { deletion_task_abort_handle.abort() },
        _ = terminate => { deletion_task_abort_handle.abort() },
    }
}
