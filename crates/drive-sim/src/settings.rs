//! Scoring configuration loading

use drive_score::ScoringConfig;
use std::path::Path;
use tracing::info;

/// Environment variable prefix, e.g. `DRIVESCORE_SAFETY_WINDOW_SEC=5`
pub const ENV_PREFIX: &str = "DRIVESCORE";

/// Layer an optional config file and `DRIVESCORE_*` variables over `base`,
/// then validate the result
pub fn load_scoring_config(
    path: Option<&Path>,
    base: &ScoringConfig,
) -> anyhow::Result<ScoringConfig> {
    let mut builder = config::Config::builder().add_source(config::Config::try_from(base)?);
    if let Some(path) = path {
        info!(path = %path.display(), "loading scoring configuration");
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let settings: ScoringConfig = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
