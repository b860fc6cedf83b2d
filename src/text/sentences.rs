// Sentence splitting on Unicode sentence boundaries (UAX #29).

use unicode_segmentation::UnicodeSegmentation;

use super::traits::SentenceSplitter;

/// Rule-based sentence splitter. No model files, no allocation beyond the
/// returned slice list.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences().collect()
    }
}
