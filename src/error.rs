// Configuration errors: raised at construction time, never recovered.
//
// Everything else (model loading, tokenization, inference) flows through
// anyhow with stage context attached. Configuration errors get a concrete
// type so callers and tests can tell "you set this up wrong" apart from
// "the model failed" via `err.downcast_ref::<ConfigError>()`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("topic vocabulary is empty")]
    EmptyVocabulary,

    #[error("topic \"{topic}\" appears more than once in the vocabulary")]
    DuplicateTopic { topic: String },

    #[error("fine topic \"{topic}\" is mapped more than once")]
    DuplicateFineTopic { topic: String },

    #[error("coarse topic \"{topic}\" has no fine topics mapped to it")]
    UnmappedCoarseTopic { topic: String },

    #[error("fine topic \"{fine}\" maps to \"{coarse}\", which is not in the coarse vocabulary")]
    UnknownCoarseTopic { fine: String, coarse: String },

    #[error("entailment position {position} is outside the {classes}-way NLI output")]
    EntailmentPosition { position: usize, classes: usize },

    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("top_k must be between 1 and {topics}, got {top_k}")]
    TopK { top_k: usize, topics: usize },
}
