//! Runtime configuration for chatbridge

use std::str::FromStr;

/// What to do when a secondary opened file cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFilePolicy {
    /// Emit a `log` event and leave the file out of the context.
    #[default]
    Skip,
    /// Abort the invocation with `FileUnavailable`.
    Fail,
}

impl FromStr for MissingFilePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "0" | "false" => Ok(MissingFilePolicy::Skip),
            "fail" | "strict" | "1" | "true" => Ok(MissingFilePolicy::Fail),
            _ => Err(()),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Model identifier sent upstream (OpenRouter-style `vendor/model`)
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Reasoning token budget requested from the model
    pub reasoning_max_tokens: u32,
    pub missing_file_policy: MissingFilePolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: "anthropic/claude-sonnet-4".to_string(),
            temperature: 1.0,
            top_p: 1.0,
            reasoning_max_tokens: 1500,
            missing_file_policy: MissingFilePolicy::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_reasoning_max_tokens(mut self, max_tokens: u32) -> Self {
        self.reasoning_max_tokens = max_tokens;
        self
    }

    pub fn with_missing_file_policy(mut self, policy: MissingFilePolicy) -> Self {
        self.missing_file_policy = policy;
        self
    }

    /// Load configuration from environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(model) = std::env::var("CHATBRIDGE_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        if let Ok(temperature) = std::env::var("CHATBRIDGE_TEMPERATURE") {
            if let Ok(val) = temperature.parse::<f32>() {
                config.temperature = val;
            }
        }

        if let Ok(top_p) = std::env::var("CHATBRIDGE_TOP_P") {
            if let Ok(val) = top_p.parse::<f32>() {
                config.top_p = val;
            }
        }

        if let Ok(budget) = std::env::var("CHATBRIDGE_REASONING_TOKENS") {
            if let Ok(val) = budget.parse::<u32>() {
                config.reasoning_max_tokens = val;
            }
        }

        if let Ok(strict) = std::env::var("CHATBRIDGE_STRICT_FILES") {
            if let Ok(policy) = strict.parse::<MissingFilePolicy>() {
                config.missing_file_policy = policy;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_new() {
        let config = RuntimeConfig::new();
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.top_p, 1.0);
        assert_eq!(config.reasoning_max_tokens, 1500);
        assert_eq!(config.missing_file_policy, MissingFilePolicy::Skip);
    }

    #[test]
    fn test_runtime_config_builder() {
        let config = RuntimeConfig::new()
            .with_model("openai/o3")
            .with_temperature(0.2)
            .with_top_p(0.9)
            .with_reasoning_max_tokens(4000)
            .with_missing_file_policy(MissingFilePolicy::Fail);

        assert_eq!(config.model, "openai/o3");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.reasoning_max_tokens, 4000);
        assert_eq!(config.missing_file_policy, MissingFilePolicy::Fail);
    }

    #[test]
    fn test_missing_file_policy_from_str() {
        assert_eq!("skip".parse(), Ok(MissingFilePolicy::Skip));
        assert_eq!("STRICT".parse(), Ok(MissingFilePolicy::Fail));
        assert_eq!("1".parse(), Ok(MissingFilePolicy::Fail));
        assert!("sometimes".parse::<MissingFilePolicy>().is_err());
    }
}
