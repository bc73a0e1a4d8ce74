//! Example data configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED_NAME: &str = "quiet-heron";

fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("example-data")
        .join("seeds.json")
}

/// Settings for seeding a demo community at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Seed on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Registry entry to apply.
    pub seed_name: Option<String>,
    /// Override the registry's member count.
    #[ortho_config(file_key = "user_count")]
    pub count: Option<usize>,
    /// Registry file location.
    pub registry_path: Option<PathBuf>,
}

impl ExampleDataSettings {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured seed name, or `quiet-heron`.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Configured registry path, or the bundled fixture.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }
}
