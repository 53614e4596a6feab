//! GE-003: Environment-driven configuration.
//!
//! There is no config file. Each knob reads one environment variable and
//! falls back to the fixed behaviour of the evaluation script.

use super::error::{EvalError, EvalResult};
use std::path::{Path, PathBuf};

pub const ENV_ARTIFACT: &str = "GOOSE_SIF";
pub const ENV_IMAGE: &str = "GOOSE_IMAGE";
pub const ENV_CONTAINER_TOOL: &str = "GOOSE_CONTAINER_TOOL";
pub const ENV_DOMAIN_TAG: &str = "GOOSE_DOMAIN_TAG";
pub const ENV_LOG_JSON: &str = "GOOSE_LOG_JSON";

/// File name of the cached planner image, next to the executable.
pub const DEFAULT_ARTIFACT_NAME: &str = "goose.sif";
pub const DEFAULT_IMAGE: &str = "oras://ghcr.io/dillonzchen/goose:latest";
pub const DEFAULT_CONTAINER_TOOL: &str = "apptainer";
/// The planner ignores the real domain name; every bundle is tagged this way.
pub const DEFAULT_DOMAIN_TAG: &str = "blocksworld";

/// Resolved settings for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Cached planner image (pulled on first use)
    pub artifact_path: PathBuf,

    /// Remote reference handed to `<tool> pull`
    pub image_reference: String,

    /// Container tool used to pull the image
    pub container_tool: String,

    /// Prefix of the generated bundle file names
    pub domain_tag: String,

    /// Emit JSON log lines instead of text
    pub log_json: bool,

    /// Parent of the scoped scratch directory (system temp dir when `None`)
    pub scratch_root: Option<PathBuf>,
}

impl EvalConfig {
    /// Defaults with the cached image stored under `base_dir`.
    pub fn with_artifact_dir(base_dir: &Path) -> Self {
        Self {
            artifact_path: base_dir.join(DEFAULT_ARTIFACT_NAME),
            image_reference: DEFAULT_IMAGE.to_string(),
            container_tool: DEFAULT_CONTAINER_TOOL.to_string(),
            domain_tag: DEFAULT_DOMAIN_TAG.to_string(),
            log_json: false,
            scratch_root: None,
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> EvalResult<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| EvalError::io("cannot locate the running executable", e))?;
        let base_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_lookup(&base_dir, |key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> EvalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::with_artifact_dir(base_dir);

        if let Some(path) = get(ENV_ARTIFACT) {
            cfg.artifact_path = PathBuf::from(path);
        }
        if let Some(image) = get(ENV_IMAGE) {
            cfg.image_reference = image;
        }
        if let Some(tool) = get(ENV_CONTAINER_TOOL) {
            cfg.container_tool = tool;
        }
        if let Some(tag) = get(ENV_DOMAIN_TAG) {
            cfg.domain_tag = tag.trim().to_string();
        }
        if let Some(flag) = get(ENV_LOG_JSON) {
            cfg.log_json = parse_bool(ENV_LOG_JSON, &flag)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would produce unusable paths.
    pub fn validate(&self) -> EvalResult<()> {
        if self.domain_tag.is_empty() {
            return Err(EvalError::Config("domain tag must not be empty".to_string()));
        }
        if self.domain_tag.contains(['/', '\\']) || self.domain_tag == ".." {
            return Err(EvalError::Config(format!(
                "domain tag {:?} must be a plain file name",
                self.domain_tag
            )));
        }
        if self.container_tool.contains(char::is_whitespace) {
            return Err(EvalError::Config(format!(
                "container tool {:?} must be a single command name",
                self.container_tool
            )));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> EvalResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(EvalError::Config(format!(
            "{key}={other} is not a boolean"
        ))),
    }
}
