// Output formatting: terminal display and JSON lines.

pub mod terminal;

use anyhow::Result;
use serde::Serialize;

use crate::classify::report::Ranking;

/// One input text with its ranked topics, as emitted by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedText {
    pub text: String,
    pub topics: Ranking,
}

/// Print one JSON object per line.
pub fn print_json_lines(results: &[ClassifiedText]) -> Result<()> {
    for result in results {
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::report::{RankedTopic, TopicId};

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_classified_text_json_shape() {
        let result = ClassifiedText {
            text: "The match ended 2-1.".to_string(),
            topics: Ranking::Many(vec![
                RankedTopic {
                    topic: TopicId::Label("sport".to_string()),
                    confidence: Some(0.75),
                },
                RankedTopic {
                    topic: TopicId::Label("law".to_string()),
                    confidence: Some(0.25),
                },
            ]),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"text":"The match ended 2-1.","topics":[{"topic":"sport","confidence":0.75},{"topic":"law","confidence":0.25}]}"#
        );
    }
}
