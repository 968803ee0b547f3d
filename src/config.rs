use std::env;
use std::path::PathBuf;

use crate::error::{MdqpError, Result};

/// Environment variable naming the working directory for the sync pipeline.
pub const ENV_BASEDIR: &str = "BASEDIR";
/// Environment variable naming the MDQ service base URL.
pub const ENV_MDQ_SERVICE: &str = "MDQ_SERVICE";
/// Environment variable with the number of scheduled runs per hour.
pub const ENV_RUNS_PER_HOUR: &str = "RPH";
/// Environment variable with the per-run fetch floor. Optional, defaults to 0.
pub const ENV_MIN_ENTITIES: &str = "MIN_ENTITIES_PER_RUN";
/// Environment variable with the commit to release, injected by CI.
pub const ENV_GIT_COMMIT: &str = "GIT_COMMIT";

/// Settings for the metadata sync pipeline.
///
/// All values come from the environment; the pipeline is driven by a
/// scheduler that provides no command line arguments.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Root of the working directory tree (incoming, seen, signed, queues).
    pub base_dir: PathBuf,
    /// Base URL of the MDQ service to fetch signed metadata from.
    pub mdq_service: String,
    /// How many times per hour the scheduler starts a run.
    pub runs_per_hour: u32,
    /// Minimum number of queued entities to process per run.
    pub min_entities_per_run: usize,
}

impl SyncSettings {
    /// Reads sync settings from the environment.
    ///
    /// # Returns
    /// * `Ok(SyncSettings)` - All required variables present and valid
    /// * `Err` - A variable is missing, empty or fails to parse
    pub fn from_env() -> Result<Self> {
        let base_dir = PathBuf::from(require(ENV_BASEDIR)?);
        let mdq_service = require(ENV_MDQ_SERVICE)?;
        let runs_per_hour = parse_positive(ENV_RUNS_PER_HOUR, &require(ENV_RUNS_PER_HOUR)?)?;
        let min_entities_per_run = match env::var(ENV_MIN_ENTITIES) {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                MdqpError::config(format!(
                    "{ENV_MIN_ENTITIES} must be a non-negative integer, got '{raw}'"
                ))
            })?,
            Err(_) => 0,
        };

        Ok(SyncSettings {
            base_dir,
            mdq_service,
            runs_per_hour,
            min_entities_per_run,
        })
    }
}

/// Settings for the release flow.
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// The commit being released, as provided by the CI job.
    pub commit: String,
}

impl ReleaseSettings {
    /// Reads release settings from the environment.
    ///
    /// `GIT_COMMIT` must be present and non-empty; everything downstream
    /// (version resolution, image tags) is derived from it, so the flow
    /// fails here before any git or docker invocation.
    pub fn from_env() -> Result<Self> {
        let commit = require(ENV_GIT_COMMIT)?;
        Ok(ReleaseSettings { commit })
    }
}

/// Fetches a required environment variable, rejecting unset and blank values.
fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MdqpError::config(format!(
            "required environment variable {name} is not set"
        ))),
    }
}

/// Parses a strictly positive integer setting.
fn parse_positive(name: &str, raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MdqpError::config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
