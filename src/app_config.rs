use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Conversion configuration module
/// This module holds the settings readers need to turn incomplete input into
/// a complete document: which language to assume when a paragraph declares
/// none, and when the final caption of a track ends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language tag assigned to captions without a language (BCP 47 style)
    #[serde(default = "default_language")]
    pub default_language: String,

    /// How the end of the last caption in a track is computed
    #[serde(default)]
    pub end_of_media: EndOfMedia,
}

/// End time policy for the last caption of a track
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum EndOfMedia {
    // @policy: last caption stays up for a fixed duration after its start
    Duration {
        #[serde(default = "default_last_caption_ms")]
        ms: u64,
    },
    // @policy: media ends at a fixed timestamp
    Absolute { ms: u64 },
}

impl Default for EndOfMedia {
    fn default() -> Self {
        Self::Duration {
            ms: default_last_caption_ms(),
        }
    }
}

impl EndOfMedia {
    // @param start_us: start of the last caption in microseconds
    // @returns: end of that caption in microseconds, never before the start
    pub fn resolve(&self, start_us: u64) -> u64 {
        match *self {
            Self::Duration { ms } => start_us.saturating_add(ms.saturating_mul(1_000)),
            Self::Absolute { ms } => ms.saturating_mul(1_000).max(start_us),
        }
    }
}

const DEFAULT_LANGUAGE: &str = "en-US";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_last_caption_ms() -> u64 {
    4_000
}

impl Config {
    /// Build a configuration with a specific default language
    pub fn with_default_language(language: &str) -> Self {
        Self {
            default_language: language.to_string(),
            ..Self::default()
        }
    }

    /// Set the end-of-media policy
    pub fn with_end_of_media(mut self, end_of_media: EndOfMedia) -> Self {
        self.end_of_media = end_of_media;
        self
    }

    /// Default language to assign, falling back to `en-US` when the
    /// configured tag is blank
    pub fn resolved_default_language(&self) -> &str {
        let language = self.default_language.trim();
        if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        }
    }

    /// Parse configuration from JSON text and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| anyhow!("Failed to parse configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_language.trim().is_empty() {
            return Err(anyhow!("Default language must not be empty"));
        }
        crate::language_utils::validate_language_tag(&self.default_language)?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_language: default_language(),
            end_of_media: EndOfMedia::default(),
        }
    }
}
