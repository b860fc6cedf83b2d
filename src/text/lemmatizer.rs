// Lemmatizer implementations.

use rust_stemmers::{Algorithm, Stemmer};

use super::traits::Lemmatizer;

/// Leaves every token untouched. Useful when the downstream model should
/// see surface forms, and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Snowball stemmer standing in for a dictionary lemmatizer.
///
/// Stems are not always dictionary words ("studies" becomes "studi"), but
/// inflected forms still collapse onto one vocabulary entry.
pub struct SnowballLemmatizer {
    stemmer: Stemmer,
}

impl SnowballLemmatizer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            stemmer: Stemmer::create(algorithm),
        }
    }
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}
