//! Directory resolution: command line, then environment (`.env` included),
//! then defaults.

use std::env;
use std::path::PathBuf;

use clap::ArgMatches;
use log::debug;

const SOUNDS_DIR_ENV: &str = "AMBIMIX_SOUNDS_DIR";
const STATE_DIR_ENV: &str = "AMBIMIX_STATE_DIR";
const DEFAULT_SOUNDS_DIR: &str = "sounds";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sounds_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Config {
    pub fn from_args(args: &ArgMatches) -> Self {
        let sounds_dir = global_value(args, "sounds-dir")
            .or_else(|| env_value(SOUNDS_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUNDS_DIR));
        let state_dir = global_value(args, "state-dir")
            .or_else(|| env_value(STATE_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);
        let config = Self {
            sounds_dir,
            state_dir,
        };
        debug!("{:?}", config);
        config
    }
}

/// Value of a global argument, preferring the innermost subcommand.
fn global_value(args: &ArgMatches, id: &str) -> Option<String> {
    if let Some((_, sub)) = args.subcommand() {
        if let Some(value) = global_value(sub, id) {
            return Some(value);
        }
    }
    args.try_get_one::<String>(id).ok().flatten().cloned()
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_state_dir() -> PathBuf {
    if let Some(config) = env_value("XDG_CONFIG_HOME") {
        return PathBuf::from(config).join("ambimix");
    }
    if let Some(home) = env_value("HOME") {
        return PathBuf::from(home).join(".config").join("ambimix");
    }
    PathBuf::from(".ambimix")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::build_cli;

    #[test]
    fn arguments_win() {
        let args = build_cli()
            .try_get_matches_from([
                "amx",
                "--sounds-dir",
                "/data/sounds",
                "state",
                "path",
                "--state-dir",
                "/data/state",
            ])
            .unwrap();
        let config = Config::from_args(&args);
        assert_eq!(config.sounds_dir, PathBuf::from("/data/sounds"));
        assert_eq!(config.state_dir, PathBuf::from("/data/state"));
    }
}
