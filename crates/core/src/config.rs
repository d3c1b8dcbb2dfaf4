use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AwsSettings,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Region and profile hints handed to the AWS SDK loader. Both fall back to
/// the standard AWS environment/profile chain when unset.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AgentsConfig {
    #[serde(default)]
    pub default: AgentDefaultConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentDefaultConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_tokens() -> usize {
    1024
}

fn default_temperature() -> f64 {
    0.0
}

impl Default for AgentDefaultConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub groq: Option<GroqConfig>,
    pub openai: Option<ProviderConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GroqConfig {
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_base: Option<String>,
}

impl AppConfig {
    /// Loads `~/.cloudclaw/config.json` (or `custom_path`), then layers
    /// environment variables (CLOUDCLAW__AWS__REGION, ...) on top. A missing
    /// file is fine; every field has a usable default.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = if let Some(path) = custom_path {
            path
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".cloudclaw/config.json")
        };

        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("CLOUDCLAW").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn default_config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cloudclaw/config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(json: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse("{}");
        assert_eq!(cfg.agents.default.model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.agents.default.max_tokens, 1024);
        assert_eq!(cfg.agents.default.temperature, 0.0);
        assert!(cfg.aws.region.is_none());
        assert!(cfg.providers.groq.is_none());
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let cfg = parse(
            r#"{
                "aws": {"region": "eu-west-1"},
                "providers": {"groq": {"api_key": "gsk-test"}}
            }"#,
        );
        assert_eq!(cfg.aws.region.as_deref(), Some("eu-west-1"));
        assert!(cfg.aws.profile.is_none());
        assert_eq!(cfg.providers.groq.unwrap().api_key, "gsk-test");
        assert_eq!(cfg.agents.default.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn load_reads_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "aws": {"region": "ap-southeast-1", "profile": "staging"},
                "agents": {"default": {"model": "llama-3.1-8b-instant", "max_tokens": 512, "temperature": 0.0}}
            }"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(path)).unwrap();
        assert_eq!(cfg.aws.region.as_deref(), Some("ap-southeast-1"));
        assert_eq!(cfg.aws.profile.as_deref(), Some("staging"));
        assert_eq!(cfg.agents.default.model, "llama-3.1-8b-instant");
        assert_eq!(cfg.agents.default.max_tokens, 512);
    }

    #[test]
    fn load_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(Some(dir.path().join("nope.json"))).unwrap();
        assert_eq!(cfg.agents.default.model, "llama-3.3-70b-versatile");
    }
}
