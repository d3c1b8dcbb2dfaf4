use crate::openai::OpenAIProvider;
use crate::LLMProvider;
use cloudclaw_core::config::AppConfig;
use std::sync::Arc;
use tracing::info;

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Create the LLM provider from the application config.
/// Checks in order: Groq → generic OpenAI-compatible → GROQ_API_KEY env var.
pub fn create_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LLMProvider>> {
    if let Some(groq_cfg) = &config.providers.groq {
        info!("Using Groq provider");
        return Ok(Arc::new(OpenAIProvider::new(
            groq_cfg.api_key.clone(),
            Some(GROQ_API_BASE.to_string()),
        )));
    }

    if let Some(openai_cfg) = &config.providers.openai {
        info!("Using OpenAI-compatible provider");
        return Ok(Arc::new(OpenAIProvider::new(
            openai_cfg.api_key.clone(),
            openai_cfg.api_base.clone(),
        )));
    }

    // The original deployment reads its key straight from the environment.
    if let Ok(api_key) = std::env::var("GROQ_API_KEY") {
        if !api_key.is_empty() {
            info!("Using Groq provider (GROQ_API_KEY)");
            return Ok(Arc::new(OpenAIProvider::new(
                api_key,
                Some(GROQ_API_BASE.to_string()),
            )));
        }
    }

    anyhow::bail!(
        "No LLM provider configured. Set providers.groq.api_key in {} or export GROQ_API_KEY.",
        AppConfig::default_config_path().display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudclaw_core::config::{GroqConfig, ProviderConfig};

    #[test]
    fn groq_config_builds_a_provider() {
        let mut config = AppConfig::default();
        config.providers.groq = Some(GroqConfig {
            api_key: "gsk-test".to_string(),
        });
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn openai_config_builds_a_provider() {
        let mut config = AppConfig::default();
        config.providers.openai = Some(ProviderConfig {
            api_key: "sk-test".to_string(),
            api_base: Some("http://localhost:8000/v1".to_string()),
        });
        assert!(create_provider(&config).is_ok());
    }
}
