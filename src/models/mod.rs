// Model adapters: parameterized training calls that return trained models.

pub mod traits;
pub mod lda;
pub mod embedding;
pub mod word2vec;
pub mod doc2vec;

pub use doc2vec::{build_doc2vec, Doc2VecModel, Doc2VecParams};
pub use lda::{build_lda, build_lda_with_corpus, GibbsTrainer, LdaModel, LdaParams, Prior};
pub use traits::{TopicModel, TopicTrainer};
pub use word2vec::{build_word2vec, Word2VecModel, Word2VecParams};
