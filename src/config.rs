use anyhow::{Context, Result, anyhow, bail};
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/videovault-env";
pub const DEFAULT_VIDEOVAULT_PORT: u16 = 8080;
pub const DEFAULT_VIDEOVAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Raw values as they appear in the env file or the process environment.
/// Every field is optional so layers can be merged before defaults apply.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub youtube_api_key: Option<String>,
    pub youtube_api_enabled: Option<bool>,
    pub youtube_api_base_url: Option<String>,
    pub upstream_timeout_secs: Option<u64>,
    pub videovault_host: Option<String>,
    pub videovault_port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

impl EnvConfig {
    /// Records one `KEY=VALUE` pair. Unknown keys are ignored so the same
    /// file can be shared with other services.
    fn apply(&mut self, key: &str, value: &str, origin: &str) -> Result<()> {
        match key {
            "YOUTUBE_API_KEY" => self.youtube_api_key = Some(value.to_string()),
            "YOUTUBE_API_ENABLED" => {
                let enabled = parse_bool(value)
                    .ok_or_else(|| anyhow!("Parsing YOUTUBE_API_ENABLED from {origin}"))?;
                self.youtube_api_enabled = Some(enabled);
            }
            "YOUTUBE_API_BASE_URL" => {
                if !value.is_empty() {
                    self.youtube_api_base_url = Some(value.trim_end_matches('/').to_string());
                }
            }
            "YOUTUBE_API_TIMEOUT_SECS" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Parsing YOUTUBE_API_TIMEOUT_SECS from {origin}"))?;
                if secs == 0 {
                    bail!("YOUTUBE_API_TIMEOUT_SECS must be greater than zero in {origin}");
                }
                self.upstream_timeout_secs = Some(secs);
            }
            "VIDEOVAULT_HOST" => {
                if !value.is_empty() {
                    self.videovault_host = Some(value.to_string());
                }
            }
            "VIDEOVAULT_PORT" => {
                let port: u16 = value
                    .parse()
                    .with_context(|| format!("Parsing VIDEOVAULT_PORT from {origin}"))?;
                self.videovault_port = Some(port);
            }
            "VIDEOVAULT_CORS_ORIGINS" => {
                let origins: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect();
                self.cors_origins = Some(origins);
            }
            _ => {}
        }
        Ok(())
    }

    /// Layers `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: EnvConfig) -> EnvConfig {
        EnvConfig {
            youtube_api_key: other.youtube_api_key.or(self.youtube_api_key),
            youtube_api_enabled: other.youtube_api_enabled.or(self.youtube_api_enabled),
            youtube_api_base_url: other.youtube_api_base_url.or(self.youtube_api_base_url),
            upstream_timeout_secs: other.upstream_timeout_secs.or(self.upstream_timeout_secs),
            videovault_host: other.videovault_host.or(self.videovault_host),
            videovault_port: other.videovault_port.or(self.videovault_port),
            cors_origins: other.cors_origins.or(self.cors_origins),
        }
    }
}

/// Fully resolved settings shared read-only by every request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_enabled: bool,
    pub api_base_url: String,
    pub upstream_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from(EnvConfig::default())
    }
}

impl From<EnvConfig> for AppConfig {
    fn from(cfg: EnvConfig) -> Self {
        AppConfig {
            api_key: cfg.youtube_api_key.unwrap_or_default(),
            api_enabled: cfg.youtube_api_enabled.unwrap_or(false),
            api_base_url: cfg
                .youtube_api_base_url
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(
                cfg.upstream_timeout_secs
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            host: cfg
                .videovault_host
                .unwrap_or_else(|| DEFAULT_VIDEOVAULT_HOST.to_string()),
            port: cfg.videovault_port.unwrap_or(DEFAULT_VIDEOVAULT_PORT),
            cors_origins: cfg.cors_origins.unwrap_or_else(|| {
                DEFAULT_CORS_ORIGINS
                    .iter()
                    .map(|origin| origin.to_string())
                    .collect()
            }),
        }
    }
}

impl AppConfig {
    /// True when searches should hit the real upstream: the feature flag is
    /// on and a non-blank key is configured.
    pub fn upstream_ready(&self) -> bool {
        self.api_enabled && !self.api_key.trim().is_empty()
    }
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let origin = path.display().to_string();
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            cfg.apply(key.trim(), value, &origin)?;
        }
    }
    Ok(Some(cfg))
}

pub fn env_overrides<I>(vars: I) -> Result<EnvConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut cfg = EnvConfig::default();
    for (key, value) in vars {
        cfg.apply(&key, value.trim(), "the environment")?;
    }
    Ok(cfg)
}

pub fn load_app_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    load_app_config_from(path, std::env::vars())
}

pub fn load_app_config_from<I>(path: impl AsRef<Path>, vars: I) -> Result<AppConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let file = read_env_config(path.as_ref())?.unwrap_or_default();
    let env = env_overrides(vars)?;
    Ok(AppConfig::from(file.merge(env)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
