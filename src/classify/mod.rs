// Zero-shot topic classification: NLI scoring, batching, mapping, ranking.
//
// Data flows one way: batcher -> scorer -> aggregator -> report.

pub mod aggregator;
pub mod batcher;
pub mod mapping;
pub mod matrix;
pub mod report;
pub mod scorer;
pub mod traits;
