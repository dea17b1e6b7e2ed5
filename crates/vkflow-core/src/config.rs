use crate::error::{Result, VkflowError};
use crate::paths;
use crate::reconcile::DEFAULT_APPENDIX;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const VIBE_BACKEND_URL: &str = "VIBE_BACKEND_URL";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_OPENSPEC_TOOLS: &str = "codex,claude";

// ---------------------------------------------------------------------------
// Config (.vkflow/config.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vk_url: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub openspec: OpenSpecConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenSpecConfig {
    #[serde(default = "default_tools")]
    pub tools: String,
}

fn default_tools() -> String {
    DEFAULT_OPENSPEC_TOOLS.to_string()
}

impl Default for OpenSpecConfig {
    fn default() -> Self {
        Self {
            tools: default_tools(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportConfig {
    /// Text appended to every imported task; empty disables it.
    #[serde(default = "default_appendix")]
    pub appendix: String,
}

fn default_appendix() -> String {
    DEFAULT_APPENDIX.to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            appendix: default_appendix(),
        }
    }
}

impl Config {
    /// Load `.vkflow/config.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn appendix(&self) -> Option<String> {
        let text = self.import.appendix.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Environment access
// ---------------------------------------------------------------------------

/// Process environment, abstracted so URL resolution can be tested.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
    fn temp_dir(&self) -> PathBuf;
}

pub struct SystemEnv;

impl Env for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

// ---------------------------------------------------------------------------
// Backend URL resolution
// ---------------------------------------------------------------------------

/// Resolve the Vibe Kanban base URL.
///
/// Priority:
/// 1. `--vk-url` flag (passed in as `explicit`)
/// 2. `vk_url` in `.vkflow/config.yaml`
/// 3. `VIBE_BACKEND_URL`
/// 4. `http://$HOST:$BACKEND_PORT` (or `$PORT`), host defaulting to 127.0.0.1
/// 5. the port file Vibe Kanban writes to `<tmp>/vibe-kanban/vibe-kanban.port`
pub fn resolve_base_url(explicit: Option<&str>, config: &Config, env: &dyn Env) -> Result<String> {
    let direct = explicit
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| config.vk_url.clone().filter(|s| !s.is_empty()))
        .or_else(|| env.var(VIBE_BACKEND_URL));
    if let Some(url) = direct {
        return Ok(trim_trailing_slash(&url));
    }

    let host = env.var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match env.var("BACKEND_PORT").or_else(|| env.var("PORT")) {
        Some(raw) => parse_port(&raw),
        None => read_port_file(&env.temp_dir()),
    };

    match port {
        Some(port) => Ok(trim_trailing_slash(&format!("http://{host}:{port}"))),
        None => Err(VkflowError::BackendUnresolved),
    }
}

pub fn port_file(temp_dir: &Path) -> PathBuf {
    temp_dir.join("vibe-kanban").join("vibe-kanban.port")
}

fn read_port_file(temp_dir: &Path) -> Option<u16> {
    let raw = std::fs::read_to_string(port_file(temp_dir)).ok()?;
    parse_port(&raw)
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p > 0)
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
