use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

mod env;

pub const ENV_BASE_URL: &str = "GRUA_BASE_URL";
pub const ENV_CSRF_TOKEN: &str = "GRUA_CSRF_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "GRUA_TIMEOUT_MS";
pub const ENV_PATTERN_MODE: &str = "GRUA_PATTERN_MODE";
pub const ENV_LIST_WIDTH_PAD: &str = "GRUA_LIST_WIDTH_PAD";
pub const ENV_REQUEST_LOG: &str = "GRUA_REQUEST_LOG";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_LIST_WIDTH_PAD: f32 = 100.0;

/// How a typed query is turned into a search pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// The query is compiled as a regular expression as typed.
    Raw,
    /// Pattern metacharacters in the query are escaped first.
    #[default]
    Literal,
}

impl PatternMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Literal => "literal",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raw" | "regex" => Ok(Self::Raw),
            "literal" | "escaped" => Ok(Self::Literal),
            other => Err(ConsoleError::Config(format!(
                "invalid {ENV_PATTERN_MODE}: {other} (expected raw|literal)"
            ))),
        }
    }
}

/// Backend paths, relative to [`ConsoleConfig::base_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub classes: String,
    pub parameters: String,
    pub nodes: String,
    pub facts: String,
    pub configuration: String,
    pub rules: String,
    pub variables: String,
    pub environments: String,
    pub master_zone_refresh: String,
    pub node_classifier: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            classes: "api/classes/".to_string(),
            parameters: "api/parameters/".to_string(),
            nodes: "api/nodes/".to_string(),
            facts: "api/facts/".to_string(),
            configuration: "api/configuration/".to_string(),
            rules: "api/rules/".to_string(),
            variables: "api/variables/".to_string(),
            environments: "api/environments/".to_string(),
            master_zone_refresh: "api/master_zones/refresh_info/".to_string(),
            node_classifier: "api/nodes/node_classifier/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub timeout_ms: u64,
    pub pattern_mode: PatternMode,
    /// Extra width given to a suggestion list beyond its input's width.
    pub list_width_pad: f32,
    pub request_log_path: Option<PathBuf>,
    pub endpoints: Endpoints,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pattern_mode: PatternMode::default(),
            list_width_pad: DEFAULT_LIST_WIDTH_PAD,
            request_log_path: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl ConsoleConfig {
    /// Defaults, then the optional TOML file, then `GRUA_*` environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        base.apply_env_with(|name| std::env::var(name).ok())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| env::non_empty(lookup(name));

        if let Some(base_url) = read(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(token) = read(ENV_CSRF_TOKEN) {
            self.csrf_token = Some(token);
        }
        if let Some(raw) = read(ENV_TIMEOUT_MS) {
            self.timeout_ms = env::parse_u64(Some(&raw)).ok_or_else(|| {
                ConsoleError::Config(format!("invalid {ENV_TIMEOUT_MS}: {raw}"))
            })?;
        }
        if let Some(raw) = read(ENV_PATTERN_MODE) {
            self.pattern_mode = PatternMode::parse(&raw)?;
        }
        if let Some(raw) = read(ENV_LIST_WIDTH_PAD) {
            self.list_width_pad = env::parse_f32(Some(&raw)).ok_or_else(|| {
                ConsoleError::Config(format!("invalid {ENV_LIST_WIDTH_PAD}: {raw}"))
            })?;
        }
        if let Some(path) = read(ENV_REQUEST_LOG) {
            self.request_log_path = Some(PathBuf::from(path));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "base_url must be an http(s) URL: {base}"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConsoleError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Joins an endpoint path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            normalize_base_url(&self.base_url),
            path.trim_start_matches('/')
        )
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid_and_literal() {
        let config = ConsoleConfig::default();
        config.validate().expect("valid");
        assert_eq!(config.pattern_mode, PatternMode::Literal);
        assert_eq!(config.endpoints.rules, "api/rules/");
    }

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let config = ConsoleConfig {
            base_url: "https://grua.example/ ".to_string(),
            ..ConsoleConfig::default()
        };
        assert_eq!(
            config.url("/api/classes/"),
            "https://grua.example/api/classes/"
        );
    }

    #[test]
    fn toml_file_overrides_defaults_and_env_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grua.toml");
        fs::write(
            &path,
            "base_url = \"https://file.example\"\npattern_mode = \"raw\"\n\n[endpoints]\nrules = \"v2/rules/\"\n",
        )
        .expect("write config");

        let from_file =
            ConsoleConfig::from_toml_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(from_file.base_url, "https://file.example");
        assert_eq!(from_file.pattern_mode, PatternMode::Raw);
        assert_eq!(from_file.endpoints.rules, "v2/rules/");
        assert_eq!(from_file.endpoints.nodes, "api/nodes/");

        let merged = from_file
            .apply_env_with(lookup(&[
                (ENV_BASE_URL, "https://env.example"),
                (ENV_CSRF_TOKEN, "tok"),
                (ENV_PATTERN_MODE, "literal"),
            ]))
            .expect("env");
        assert_eq!(merged.base_url, "https://env.example");
        assert_eq!(merged.csrf_token.as_deref(), Some("tok"));
        assert_eq!(merged.pattern_mode, PatternMode::Literal);
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let err = ConsoleConfig::default()
            .apply_env_with(lookup(&[(ENV_TIMEOUT_MS, "soon")]))
            .expect_err("timeout");
        assert_eq!(err.code(), "CONFIG_ERROR");

        let err = ConsoleConfig::default()
            .apply_env_with(lookup(&[(ENV_PATTERN_MODE, "fuzzy")]))
            .expect_err("mode");
        assert!(err.to_string().contains("expected raw|literal"));

        let err = ConsoleConfig::from_toml_str("base_url = \"ftp://nope\"").expect_err("scheme");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = ConsoleConfig::default()
            .apply_env_with(lookup(&[(ENV_BASE_URL, "   "), (ENV_REQUEST_LOG, "")]))
            .expect("env");
        assert_eq!(config, ConsoleConfig::default());
    }
}
