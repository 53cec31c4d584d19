//! Simulation configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Settings for one simulation run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `config.toml` and `items.ron`.
    pub data_dir: PathBuf,
    /// Overrides `data_dir/config.toml`.
    pub config_file: Option<PathBuf>,
    /// Overrides `data_dir/items.ron`.
    pub items_file: Option<PathBuf>,
    /// Ticks to simulate before shutting down.
    pub ticks: u64,
    /// Host tick rate. 0 runs as fast as possible.
    pub ticks_per_second: u64,
    /// Persist profiles as JSON here instead of in memory.
    pub profile_dir: Option<PathBuf>,
    /// Also write logs to `host-sim.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            config_file: None,
            items_file: None,
            ticks: 200,
            ticks_per_second: 20,
            profile_dir: None,
            log_dir: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HOST_SIM_DATA_DIR` - Content directory (default: the crate's `data/`)
    /// - `HOST_SIM_CONFIG` - Config file, overrides the data directory's
    /// - `HOST_SIM_ITEMS` - Item catalog, overrides the data directory's
    /// - `HOST_SIM_TICKS` - Ticks to run (default: 200)
    /// - `HOST_SIM_TPS` - Ticks per second, 0 = unthrottled (default: 20)
    /// - `HOST_SIM_PROFILE_DIR` - Profile directory (default: in-memory)
    /// - `HOST_SIM_LOG_DIR` - Log file directory (default: stderr only)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("HOST_SIM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.config_file = env::var("HOST_SIM_CONFIG").ok().map(PathBuf::from);
        config.items_file = env::var("HOST_SIM_ITEMS").ok().map(PathBuf::from);
        if let Some(ticks) = read_env::<u64>("HOST_SIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(tps) = read_env::<u64>("HOST_SIM_TPS") {
            config.ticks_per_second = tps;
        }
        config.profile_dir = env::var("HOST_SIM_PROFILE_DIR").ok().map(PathBuf::from);
        config.log_dir = env::var("HOST_SIM_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_data() {
        let config = SimConfig::default();
        assert!(config.data_dir.join("items.ron").exists());
        assert!(config.data_dir.join("config.toml").exists());
        assert_eq!(config.ticks, 200);
    }
}
