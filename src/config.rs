use std::env;
use std::str::FromStr;

use anyhow::Result;

use crate::models::lda::LdaParams;
use crate::text::language::Language;
use crate::text::DEFAULT_MIN_LENGTH;

/// Default settings loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override
/// anything set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Stopword list and stemmer language (TOPICPREP_LANGUAGE)
    pub language: Language,
    /// Shortest token kept by cleaning (TOPICPREP_MIN_LENGTH)
    pub min_length: usize,
    /// Minimum document frequency for dictionary terms (TOPICPREP_MIN_COUNT)
    pub min_count: u32,
    pub num_topics: usize,
    pub passes: usize,
    pub random_state: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            min_length: DEFAULT_MIN_LENGTH,
            min_count: 0,
            num_topics: 10,
            passes: 10,
            random_state: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unset variables keep
    /// their defaults.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            language: parse_var(&lookup, "TOPICPREP_LANGUAGE", defaults.language)?,
            min_length: parse_var(&lookup, "TOPICPREP_MIN_LENGTH", defaults.min_length)?,
            min_count: parse_var(&lookup, "TOPICPREP_MIN_COUNT", defaults.min_count)?,
            num_topics: parse_var(&lookup, "TOPICPREP_NUM_TOPICS", defaults.num_topics)?,
            passes: parse_var(&lookup, "TOPICPREP_PASSES", defaults.passes)?,
            random_state: parse_var(&lookup, "TOPICPREP_RANDOM_STATE", defaults.random_state)?,
        })
    }

    /// LDA parameters for these settings.
    pub fn lda_params(&self) -> LdaParams {
        LdaParams::new(self.num_topics)
            .passes(self.passes)
            .random_state(self.random_state)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key}={raw:?}: {e}")),
        _ => Ok(default),
    }
}
