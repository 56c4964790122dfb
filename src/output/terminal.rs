// Colored terminal output for ranked topics.
//
// Each input line is echoed, followed by its (score, topic) pairs in
// descending order, one per line.

use colored::Colorize;

use super::{truncate_chars, ClassifiedText};
use crate::classify::report::{RankedTopic, TopicId};

/// Input lines longer than this are cut short when echoed.
const MAX_TEXT_CHARS: usize = 120;

/// Display classified texts with their ranked topics.
pub fn display_results(results: &[ClassifiedText]) {
    for result in results {
        println!("{}", format_text(&result.text).bold());
        for (i, ranked) in result.topics.as_slice().iter().enumerate() {
            println!("  {}", format_entry(ranked, i == 0));
        }
        println!();
    }
}

pub fn display_no_input() {
    println!("{}", "No input lines to classify.".dimmed());
}

fn format_text(text: &str) -> String {
    truncate_chars(text, MAX_TEXT_CHARS)
}

fn format_entry(ranked: &RankedTopic, best: bool) -> String {
    let topic = match &ranked.topic {
        TopicId::Label(label) => label.clone(),
        TopicId::Index(i) => format!("#{i}"),
    };
    let topic = if best {
        topic.green().bold().to_string()
    } else {
        topic
    };

    match ranked.confidence {
        Some(score) => format!("{} {}", colorize_score(score), topic),
        None => topic,
    }
}

/// Color a probability by strength.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.4}");
    if score >= 0.5 {
        text.green()
    } else if score >= 0.1 {
        text.yellow()
    } else {
        text.dimmed()
    }
}
