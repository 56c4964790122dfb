// Line-oriented input for the CLI: topic files, mapping files, input texts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::classify::mapping::TopicMapping;

/// Parse a topic list: one topic per line, `_` read as a space,
/// trailing whitespace and blank lines dropped.
pub fn parse_topics(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim_end().replace('_', " "))
        .filter(|topic| !topic.is_empty())
        .collect()
}

pub fn read_topics(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read topic file {}", path.display()))?;
    Ok(parse_topics(&contents))
}

/// Read a JSON fine -> coarse mapping file.
pub fn read_mapping(path: &Path) -> Result<TopicMapping> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
    TopicMapping::from_json(&contents)
        .with_context(|| format!("Invalid mapping file {}", path.display()))
}

/// Open the input source: a file, or stdin when `path` is None.
pub fn open_inputs(path: Option<&Path>) -> Result<Box<dyn BufRead + Send>> {
    Ok(match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to read input file {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    })
}

/// Non-blank lines with trailing whitespace trimmed, yielded as they are read.
pub fn input_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<String>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) => {
            let text = line.trim_end();
            (!text.is_empty()).then(|| Ok(text.to_string()))
        }
        Err(e) => Some(Err(e)),
    })
}

/// Input texts, one per line, from a file or stdin when `path` is None.
pub fn read_inputs(path: Option<&Path>) -> Result<Vec<String>> {
    input_lines(open_inputs(path)?)
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to read input lines")
}
