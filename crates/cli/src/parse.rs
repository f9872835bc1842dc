//! ArgMatches → BenchConfig.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ArgMatches;
use tpcb_core::{BenchConfig, Durability, Result};

use crate::format::OutputMode;

/// Build the run configuration: config file (if any), then flag overrides.
pub fn config_from_matches(matches: &ArgMatches) -> Result<BenchConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => BenchConfig::from_file(Path::new(path))?,
        None => BenchConfig::default(),
    };

    if let Some(v) = matches.get_one::<usize>("concurrency") {
        config.concurrency = *v;
    }
    if let Some(v) = matches.get_one::<Duration>("benchtime") {
        config.benchtime = *v;
    }
    if let Some(v) = matches.get_one::<u64>("scale") {
        config.scale = *v;
    }
    if let Some(v) = matches.get_one::<bool>("rwmode") {
        config.rw_mode = *v;
    }
    if let Some(v) = matches.get_one::<bool>("init") {
        config.init = *v;
    }
    if let Some(v) = matches.get_one::<String>("db") {
        config.db_path = PathBuf::from(v);
    }
    if let Some(v) = matches.get_one::<u64>("batch-size") {
        config.batch_size = *v;
    }
    if let Some(v) = matches.get_one::<Durability>("durability") {
        config.durability = *v;
    }
    if let Some(v) = matches.get_one::<usize>("cache-size-mb") {
        config.cache_size_mb = Some(*v);
    }
    if let Some(v) = matches.get_one::<u64>("seed") {
        config.seed = Some(*v);
    }
    if let Some(v) = matches.get_one::<Duration>("progress") {
        config.progress_interval = Some(*v);
    }

    config.validate()?;
    Ok(config)
}

/// Output mode selected by `--json`.
pub fn output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}
