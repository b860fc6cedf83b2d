// Supported cleaning languages.
//
// A language picks two things: the NLTK stopword list (stop-words crate) and
// the Snowball algorithm used as the lemmatizer (rust-stemmers). Only
// languages that both crates cover are listed.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_stemmers::Algorithm;
use stop_words::{get, LANGUAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Dutch,
    #[default]
    English,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

impl Language {
    /// The language's stopword list, lowercased.
    pub fn stopwords(self) -> HashSet<String> {
        let list: Vec<String> = match self {
            Language::Dutch => get(LANGUAGE::Dutch),
            Language::English => get(LANGUAGE::English),
            Language::French => get(LANGUAGE::French),
            Language::German => get(LANGUAGE::German),
            Language::Italian => get(LANGUAGE::Italian),
            Language::Portuguese => get(LANGUAGE::Portuguese),
            Language::Russian => get(LANGUAGE::Russian),
            Language::Spanish => get(LANGUAGE::Spanish),
            Language::Swedish => get(LANGUAGE::Swedish),
        };
        list.into_iter().map(|w| w.to_lowercase()).collect()
    }

    pub fn stemmer_algorithm(self) -> Algorithm {
        match self {
            Language::Dutch => Algorithm::Dutch,
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Russian => Algorithm::Russian,
            Language::Spanish => Algorithm::Spanish,
            Language::Swedish => Algorithm::Swedish,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Italian => "italian",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Swedish => "swedish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dutch" | "nl" => Ok(Language::Dutch),
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "italian" | "it" => Ok(Language::Italian),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "russian" | "ru" => Ok(Language::Russian),
            "spanish" | "es" => Ok(Language::Spanish),
            "swedish" | "sv" => Ok(Language::Swedish),
            other => anyhow::bail!("Unsupported language: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!(" de ".parse::<Language>().unwrap(), Language::German);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_english_stopwords_contain_articles() {
        let stop = Language::English.stopwords();
        assert!(stop.contains("the"));
        assert!(stop.contains("and"));
    }

    #[test]
    fn test_display_round_trips() {
        let lang = Language::Spanish;
        assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
    }
}
