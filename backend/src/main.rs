//! Social backend entry point: loads settings, prepares storage, and serves
//! the REST API.

mod server;

use std::sync::Arc;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use social_backend::inbound::http::health::HealthState;
use social_backend::outbound::memory::InMemoryStore;
use social_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, ServerSettings, Storage, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let key = settings.session_key()?;
    let bind_addr = settings.bind_addr()?;
    let storage = prepare_storage(&settings).await?;

    #[cfg(feature = "example-data")]
    seed_example_data(&storage).await?;

    let health_state = web::Data::new(HealthState::new(storage.kind()));
    let config = ServerConfig::new(
        key,
        settings.cookie_secure,
        SameSite::Lax,
        bind_addr,
        storage,
    );
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "social backend listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}

async fn prepare_storage(settings: &ServerSettings) -> Result<Storage> {
    let Some(url) = settings.database_url() else {
        warn!("no database configured; serving from the in-memory store");
        return Ok(Storage::Memory(Arc::new(InMemoryStore::new())));
    };

    run_pending_migrations(&url)
        .await
        .wrap_err("database migrations failed")?;

    let mut pool_config = PoolConfig::new(url);
    if let Some(max_size) = settings.pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    info!(database = %pool_config.redacted_url(), "connecting to PostgreSQL");
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build the connection pool")?;
    Ok(Storage::Postgres(pool))
}

#[cfg(feature = "example-data")]
async fn seed_example_data(storage: &Storage) -> Result<()> {
    use std::ffi::OsString;

    use social_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
    use social_backend::outbound::persistence::DieselExampleDataSeedRepository;

    // Command-line flags belong to ServerSettings.
    let settings = ExampleDataSettings::load_from_iter([OsString::from("social-backend")])
        .map_err(|err| eyre!("failed to load example data settings: {err}"))?;
    match storage {
        Storage::Postgres(pool) => {
            let repository = Arc::new(DieselExampleDataSeedRepository::new(pool.clone()));
            seed_example_data_on_startup(&settings, repository).await?
        }
        Storage::Memory(store) => seed_example_data_on_startup(&settings, store.clone()).await?,
    };
    Ok(())
}
