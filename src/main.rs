use std::sync::Arc;

use axum_login::tower_sessions::ExpiredDeletion;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upsign::config::Config;
use upsign::database::setup_database;
use upsign::router::{create_router, shutdown_signal};
use upsign::sms::{SmsSender, TwilioSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (db, pool) = setup_database(&config.database_url).await?;

    let session_store = tower_sessions_sqlx_store::PostgresStore::new(pool);
    session_store.migrate().await?;

    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let sms: Arc<dyn SmsSender> = Arc::new(TwilioSender::new(&config.twilio)?);

    let app = create_router(db, sms, session_store, config.frontend_origin.clone()).await?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(deletion_task.abort_handle()))
        .await?;

    deletion_task.await??;

    Ok(())
}
