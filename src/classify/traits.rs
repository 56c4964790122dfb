// Topic classifier trait: what callers hold on to.
//
// Both the flat NLI scorer and the mapping aggregator implement it. The
// aggregator owns a scorer over a different (fine) vocabulary rather than
// extending it, so each reports its own topic list here.

use anyhow::Result;

use super::matrix::ScoreMatrix;
use super::report::{self, Ranking, ReportOptions};

pub trait TopicClassifier: Send + Sync {
    /// Topic names, in column order of the matrices `score` returns.
    fn topics(&self) -> &[String];

    /// Score every text against every topic. Row `i` belongs to `texts[i]`
    /// whatever `batch_size` is; empty input gives a zero-row matrix.
    fn score(&self, texts: &[String], batch_size: usize) -> Result<ScoreMatrix>;

    /// Score, then keep the top-ranked topics for each text.
    ///
    /// `options.top_k` is checked before any inference runs.
    fn predict_topics(
        &self,
        texts: &[String],
        batch_size: usize,
        options: &ReportOptions,
    ) -> Result<Vec<Ranking>> {
        options.validate(self.topics().len())?;
        let scores = self.score(texts, batch_size)?;
        report::top_k(&scores, self.topics(), options)
    }
}
