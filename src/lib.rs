// topicprep: text preprocessing and topic modeling utilities.
//
// This is the library root. Each module is one stage of the pipeline:
// clean raw text, build a bag-of-words corpus, train a model, then
// summarize and evaluate what the model learned.

pub mod config;
pub mod corpus;
pub mod evaluation;
pub mod models;
pub mod output;
pub mod summary;
pub mod text;
