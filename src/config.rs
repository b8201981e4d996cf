//! Configuration from a file, the environment and the command line.
//!
//! Command line arguments win over environment variables, which win over the
//! config file, which wins over the built-in defaults.

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use crate::args::Args;

const DEFAULT_CONFIG_SPACE: &str = "/var/lib/fai/config";
const DEFAULT_LOG_DIR: &str = "/tmp/fai";

const ENV_CONFIG_SPACE: &str = "FAI";
const ENV_LOG_DIR: &str = "LOGDIR";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawPaths {
    config_space: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    class_subdir: PathBuf,
    classes_file: PathBuf,
}

impl Default for RawPaths {
    fn default() -> Self {
        Self {
            config_space: None,
            log_dir: None,
            class_subdir: PathBuf::from("class"),
            classes_file: PathBuf::from("FAI_CLASSES"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDeps {
    extension: String,
}

impl Default for RawDeps {
    fn default() -> Self {
        Self {
            extension: classorder::ClassDir::DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    paths: RawPaths,
    deps: RawDeps,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

#[derive(Debug)]
pub struct Config {
    pub class_dir: PathBuf,
    pub deps_extension: String,
    pub classes_file: PathBuf,
    pub output: Output,
}

impl Config {
    fn from_raw_config<E>(raw: RawConfig, args: &Args, env: E) -> Self
    where
        E: Fn(&str) -> Option<OsString>,
    {
        let class_dir = match &args.class_dir {
            Some(dir) => dir.clone(),
            None => env(ENV_CONFIG_SPACE)
                .map(PathBuf::from)
                .or(raw.paths.config_space)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_SPACE))
                .join(&raw.paths.class_subdir),
        };

        let classes_file = match &args.classes_file {
            Some(file) => file.clone(),
            None => env(ENV_LOG_DIR)
                .map(PathBuf::from)
                .or(raw.paths.log_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
                .join(&raw.paths.classes_file),
        };

        let output = if args.print {
            Output::Stdout
        } else {
            Output::File(args.output.clone().unwrap_or_else(|| classes_file.clone()))
        };

        Self {
            class_dir,
            deps_extension: raw.deps.extension,
            classes_file,
            output,
        }
    }

    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "classorder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn load_raw(path: &Path) -> anyhow::Result<RawConfig> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let raw = toml::from_str::<RawConfig>(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(raw)
    }

    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let raw = match &args.config {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::load_raw(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    info!("Loading config from {}", path.display());
                    Self::load_raw(&path)?
                }
                _ => {
                    debug!("No config file found, using defaults");
                    RawConfig::default()
                }
            },
        };
        debug!("Loaded raw config: {raw:#?}");

        let config = Self::from_raw_config(raw, args, |key| env::var_os(key));
        debug!("Loaded config: {config:#?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from([crate::args::NAME].iter().chain(argv))
    }

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    fn fai_env(key: &str) -> Option<OsString> {
        match key {
            ENV_CONFIG_SPACE => Some("/srv/fai/config".into()),
            ENV_LOG_DIR => Some("/var/log/fai/current".into()),
            _ => None,
        }
    }

    #[test]
    fn defaults() {
        let config = Config::from_raw_config(RawConfig::default(), &args(&[]), no_env);
        assert_eq!(config.class_dir, PathBuf::from("/var/lib/fai/config/class"));
        assert_eq!(config.classes_file, PathBuf::from("/tmp/fai/FAI_CLASSES"));
        assert_eq!(config.deps_extension, "deps");
        assert_eq!(config.output, Output::File(config.classes_file.clone()));
    }

    #[test]
    fn environment_beats_file() {
        let raw = toml::from_str::<RawConfig>(
            r#"
            [paths]
            config_space = "/etc/fai"
            log_dir = "/var/tmp"
            "#,
        )
        .unwrap();
        let config = Config::from_raw_config(raw, &args(&[]), fai_env);
        assert_eq!(config.class_dir, PathBuf::from("/srv/fai/config/class"));
        assert_eq!(
            config.classes_file,
            PathBuf::from("/var/log/fai/current/FAI_CLASSES")
        );
    }

    #[test]
    fn file_beats_defaults() {
        let raw = toml::from_str::<RawConfig>(
            r#"
            [paths]
            config_space = "/etc/fai"
            class_subdir = "classes"
            classes_file = "CLASSES"

            [deps]
            extension = "requires"
            "#,
        )
        .unwrap();
        let config = Config::from_raw_config(raw, &args(&[]), no_env);
        assert_eq!(config.class_dir, PathBuf::from("/etc/fai/classes"));
        assert_eq!(config.classes_file, PathBuf::from("/tmp/fai/CLASSES"));
        assert_eq!(config.deps_extension, "requires");
    }

    #[test]
    fn arguments_beat_everything() {
        let argv = [
            "--class-dir",
            "here/class",
            "--classes-file",
            "here/CLASSES",
            "-o",
            "sorted",
        ];
        let config = Config::from_raw_config(RawConfig::default(), &args(&argv), fai_env);
        assert_eq!(config.class_dir, PathBuf::from("here/class"));
        assert_eq!(config.classes_file, PathBuf::from("here/CLASSES"));
        assert_eq!(config.output, Output::File(PathBuf::from("sorted")));
    }

    #[test]
    fn print_to_stdout() {
        let config = Config::from_raw_config(RawConfig::default(), &args(&["--print"]), no_env);
        assert_eq!(config.output, Output::Stdout);
    }

    #[test]
    fn print_conflicts_with_output() {
        let argv = [crate::args::NAME, "--print", "-o", "sorted"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
