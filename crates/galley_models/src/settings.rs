//! Provider settings read from the environment.

use derive_getters::Getters;

/// Default OpenAI chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Groq model used for chat and raw text generation.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
/// Default HuggingFace text-generation model.
pub const DEFAULT_HUGGINGFACE_TEXT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
/// Default HuggingFace text-to-image model.
pub const DEFAULT_HUGGINGFACE_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
/// Default vision model served through the HuggingFace router.
pub const DEFAULT_HUGGINGFACE_VISION_MODEL: &str = "meta-llama/Llama-3.2-11B-Vision-Instruct";

/// Credentials, model choices and switches for the AI providers.
///
/// Empty variables count as unset.
///
/// | Variable | Default |
/// |---|---|
/// | `AI_ENABLED` | on (`false`, `0`, `no`, `off` disable) |
/// | `OPENAI_API_KEY` | unset |
/// | `GROQ_API_KEY` | unset |
/// | `HUGGINGFACE_API_KEY` | unset |
/// | `OPENAI_MODEL` | `gpt-4o-mini` |
/// | `HUGGINGFACE_TEXT_MODEL` | `mistralai/Mistral-7B-Instruct-v0.3` |
/// | `HUGGINGFACE_IMAGE_MODEL` | `stabilityai/stable-diffusion-xl-base-1.0` |
/// | `HUGGINGFACE_VISION_MODEL` | `meta-llama/Llama-3.2-11B-Vision-Instruct` |
/// | `USE_GROQ` | off (`true`, `1`, `yes`, `on` enable) |
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct AiSettings {
    enabled: bool,
    openai_api_key: Option<String>,
    groq_api_key: Option<String>,
    huggingface_api_key: Option<String>,
    openai_model: String,
    huggingface_text_model: String,
    huggingface_image_model: String,
    huggingface_vision_model: String,
    use_groq: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl std::fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("AiSettings")
            .field("enabled", &self.enabled)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("huggingface_api_key", &redact(&self.huggingface_api_key))
            .field("openai_model", &self.openai_model)
            .field("huggingface_text_model", &self.huggingface_text_model)
            .field("huggingface_image_model", &self.huggingface_image_model)
            .field("huggingface_vision_model", &self.huggingface_vision_model)
            .field("use_groq", &self.use_groq)
            .finish()
    }
}

impl AiSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Example
    ///
    /// ```
    /// use galley_models::AiSettings;
    ///
    /// let settings = AiSettings::from_lookup(|name| match name {
    ///     "AI_ENABLED" => Some("off".to_string()),
    ///     "OPENAI_MODEL" => Some("gpt-4o".to_string()),
    ///     _ => None,
    /// });
    /// assert!(!settings.enabled());
    /// assert_eq!(settings.openai_model(), "gpt-4o");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let model = |name: &str, default: &str| value(name).unwrap_or_else(|| default.to_string());

        Self {
            enabled: value("AI_ENABLED").is_none_or(|v| !is_falsy(&v)),
            openai_api_key: value("OPENAI_API_KEY"),
            groq_api_key: value("GROQ_API_KEY"),
            huggingface_api_key: value("HUGGINGFACE_API_KEY"),
            openai_model: model("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            huggingface_text_model: model("HUGGINGFACE_TEXT_MODEL", DEFAULT_HUGGINGFACE_TEXT_MODEL),
            huggingface_image_model: model(
                "HUGGINGFACE_IMAGE_MODEL",
                DEFAULT_HUGGINGFACE_IMAGE_MODEL,
            ),
            huggingface_vision_model: model(
                "HUGGINGFACE_VISION_MODEL",
                DEFAULT_HUGGINGFACE_VISION_MODEL,
            ),
            use_groq: value("USE_GROQ").is_some_and(|v| is_truthy(&v)),
        }
    }

    /// Turn every capability off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

fn is_falsy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AiSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AiSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = settings(&[]);
        assert!(s.enabled());
        assert!(!s.use_groq());
        assert_eq!(s.openai_model(), DEFAULT_OPENAI_MODEL);
        assert_eq!(s.huggingface_text_model(), DEFAULT_HUGGINGFACE_TEXT_MODEL);
        assert_eq!(s.huggingface_image_model(), DEFAULT_HUGGINGFACE_IMAGE_MODEL);
        assert_eq!(s.huggingface_vision_model(), DEFAULT_HUGGINGFACE_VISION_MODEL);
        assert!(s.openai_api_key().is_none());
    }

    #[test]
    fn ai_enabled_switch() {
        for off in ["false", "0", "No", "OFF"] {
            assert!(!settings(&[("AI_ENABLED", off)]).enabled(), "{off}");
        }
        for on in ["true", "1", "yes", "anything"] {
            assert!(settings(&[("AI_ENABLED", on)]).enabled(), "{on}");
        }
    }

    #[test]
    fn empty_keys_are_unset() {
        let s = settings(&[("OPENAI_API_KEY", "  "), ("GROQ_API_KEY", "gsk-1"), ("USE_GROQ", "true")]);
        assert!(s.openai_api_key().is_none());
        assert_eq!(s.groq_api_key().as_deref(), Some("gsk-1"));
        assert!(s.use_groq());
    }

    #[test]
    fn debug_redacts_keys() {
        let s = settings(&[("OPENAI_API_KEY", "sk-secret")]);
        let debug = format!("{s:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
