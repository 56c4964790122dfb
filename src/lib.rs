// nlitopic: zero-shot topic classification through natural language inference
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: NLI model access, scoring and aggregation, and output.

pub mod classify;
pub mod config;
pub mod domains;
pub mod error;
pub mod nli;
pub mod output;
pub mod quiet;
pub mod vocab;
