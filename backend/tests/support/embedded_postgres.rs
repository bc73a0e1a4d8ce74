//! Embedded PostgreSQL for the Diesel adapter suite.
//!
//! One cluster is shared by every test in the binary. A template database is
//! migrated once per migration-directory hash and each test clones its own
//! database from it, so tests never see each other's rows.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; setup failures
//! then skip instead of failing.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use social_backend::outbound::persistence::run_pending_migrations;
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "social_template";
const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// True when `SKIP_TEST_CLUSTER` is `1`, `true`, or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed; otherwise fail loudly so CI notices.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// The process-wide cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    // A reused data directory keeps the password it was initialised with.
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns threads; the shared
        // handle is initialised at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "social_embedded_test");
        }
    }
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(template)
}

/// A fresh, migrated database cloned from the template.
pub fn provision_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let template = ensure_template_database(cluster, runtime)?;
    let name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(name.as_str(), template.as_str())
        .map_err(|err| format!("clone template: {err:?}"))
}

/// Row count of `table`, read over a plain client outside the pool.
pub fn count_rows(url: &str, table: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let escaped = table.replace('"', "\"\"");
    let row = client
        .query_one(format!(r#"SELECT COUNT(*) FROM "{escaped}""#).as_str(), &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get::<_, i64>(0))
}

/// `postgres::Error` with SQLSTATE and detail, which `Display` drops.
fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
