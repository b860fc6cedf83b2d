// Text collaborator traits: swap-ready abstractions.
//
// The cleaner never knows which lemmatizer or sentence model it talks to.
// The defaults are a Snowball stemmer and UAX #29 sentence boundaries, but
// a dictionary lemmatizer or a trained sentence model can be dropped in
// without touching the rest of the pipeline.

/// Reduces an inflected token to its base form.
pub trait Lemmatizer: Send + Sync {
    /// Return the base form of a single lowercase token.
    fn lemmatize(&self, token: &str) -> String;
}

/// Splits running text into sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Return each sentence's surface text. Implementations may leave
    /// surrounding whitespace in place; the caller trims.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}
