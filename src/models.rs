//! Data models and structures
//!
//! Defines the conversion lifecycle state and the process-wide configuration
//! for talking to the completion service.

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TEXT_TEMPERATURE: f32 = 0.2;

/// Lifecycle of a single conversion run.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConversionState {
    #[default]
    Idle,
    InProgress,
    Completed(String),
    Failed(String),
}

impl ConversionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

/// Model choice and generation parameters for both input modalities.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub vision_model: String,
    pub text_model: String,
    pub max_tokens: u32,
    pub text_temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            text_temperature: DEFAULT_TEXT_TEMPERATURE,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: ModelSettings,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; `from_env` uses the process env.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ModelSettings::default();

        let max_tokens = match lookup("MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    crate::Error::Config(format!(
                        "MAX_TOKENS must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.max_tokens,
        };

        let text_temperature = match lookup("TEXT_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or_else(|| {
                    crate::Error::Config(format!(
                        "TEXT_TEMPERATURE must be a number between 0 and 2, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.text_temperature,
        };

        Ok(Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            models: ModelSettings {
                vision_model: lookup("VISION_MODEL").unwrap_or(defaults.vision_model),
                text_model: lookup("TEXT_MODEL").unwrap_or(defaults.text_model),
                max_tokens,
                text_temperature,
            },
        })
    }
}
