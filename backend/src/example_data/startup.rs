//! Startup seeding orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use example_data::{RegistryError, SeedRegistry};
use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{ExampleDataSeedRepository, SeedingResult};
use crate::domain::{ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError};
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("registry parse error: {0}")]
    Registry(#[from] RegistryError),
    #[error("example data seeding error: {0}")]
    Seeding(#[from] ExampleDataSeedingError),
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Seed `repository` with the configured demo community when enabled.
///
/// Returns `Ok(None)` when seeding is disabled. Re-running with a seed that
/// was already applied is reported as [`SeedingResult::AlreadySeeded`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// use social_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
/// use social_backend::outbound::memory::InMemoryStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings {
///     enabled: true,
///     seed_name: Some("quiet-heron".to_owned()),
///     count: None,
///     registry_path: Some(PathBuf::from("fixtures/example-data/seeds.json")),
/// };
/// let store = Arc::new(InMemoryStore::new());
/// let outcome = seed_example_data_on_startup(&settings, store).await?;
/// assert!(outcome.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup<R>(
    settings: &ExampleDataSettings,
    repository: Arc<R>,
) -> Result<Option<ExampleDataSeedOutcome>, StartupSeedingError>
where
    R: ExampleDataSeedRepository,
{
    if !settings.is_enabled() {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }

    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupSeedingError::EmptySeedName);
    }

    let registry = load_registry(&settings.registry_path())?;
    let seeder = ExampleDataSeeder::new(repository, Arc::new(DefaultClock));
    let outcome = seeder
        .seed_from_registry(&registry, seed_name, settings.count)
        .await?;

    let status = match outcome.result {
        SeedingResult::Applied => "applied",
        SeedingResult::AlreadySeeded => "already applied",
    };
    info!(
        seed_key = %outcome.seed_key,
        user_count = outcome.user_count,
        status,
        "example data seeding finished"
    );

    Ok(Some(outcome))
}

fn load_registry(path: &Path) -> Result<SeedRegistry, StartupSeedingError> {
    let read_error = |source| StartupSeedingError::RegistryRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "registry path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    Ok(SeedRegistry::from_json(&contents)?)
}
