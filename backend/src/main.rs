//! Backend entry-point: loads settings, prepares persistence and serves the
//! objective API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context as _, eyre};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use okr_backend::inbound::http::health::{HealthState, StorageBackend};
use okr_backend::inbound::http::login_config::check_shared_password_login;
use okr_backend::inbound::http::session_config::{BuildMode, session_settings};
use okr_backend::outbound::persistence::{DbPool, run_migrations, seed_demo_organisation};
use server::{AppSettings, ServerConfig, create_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(error) = fmt().with_env_filter(filter).json().try_init() {
        warn!(%error, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load().map_err(|error| eyre!("failed to load settings: {error}"))?;
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings(&settings.session_toggles(), mode)
        .wrap_err("invalid session configuration")?;
    check_shared_password_login(mode, settings.allow_shared_password_login)
        .wrap_err("invalid login configuration")?;
    let bind_addr = settings.socket_addr()?;

    let mut config = ServerConfig::new(session, bind_addr);
    let mut storage = StorageBackend::Memory;
    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations {
            run_migrations(pool_config.database_url())
                .await
                .wrap_err("database migrations failed")?;
        }
        if settings.seed_demo_organisation {
            seed_demo_organisation(pool_config.database_url())
                .await
                .wrap_err("demo seed failed")?;
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("database pool setup failed")?;
        config = config.with_db_pool(pool);
        storage = StorageBackend::Postgres;
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(server::prometheus());
    }

    let health_state = web::Data::new(HealthState::new(storage));
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "okr backend listening");
    server.await?;
    Ok(())
}
