// Fine -> coarse topic mapping.
//
// Every fine topic (a hypothesis phrase the model is actually asked about)
// maps to exactly one coarse topic (what callers see). Entry order is the
// fine vocabulary's column order, so it has to be deterministic: it comes
// from the order the pairs were given in, or the key order of a JSON file.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct TopicMapping {
    entries: Vec<(String, String)>,
}

impl TopicMapping {
    /// Build from `(fine, coarse)` pairs. A fine topic may appear only once.
    pub fn new<I, F, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(f, c)| (f.into(), c.into()))
            .collect();

        if entries.is_empty() {
            return Err(ConfigError::EmptyVocabulary.into());
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for (fine, _) in &entries {
            if !seen.insert(fine.as_str()) {
                return Err(ConfigError::DuplicateFineTopic {
                    topic: fine.clone(),
                }
                .into());
            }
        }

        Ok(Self { entries })
    }

    /// Parse a JSON object of `"fine": "coarse"` pairs, keeping key order.
    ///
    /// Every key is kept as written, so a fine topic listed twice is a
    /// `DuplicateFineTopic` error instead of the last value winning.
    pub fn from_json(json: &str) -> Result<Self> {
        let MappingPairs(pairs) =
            serde_json::from_str(json).context("Topic mapping must be a JSON object of strings")?;
        Self::new(pairs)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }

    /// Fine vocabulary, in column order.
    pub fn fine_topics(&self) -> Vec<String> {
        self.entries.iter().map(|(f, _)| f.clone()).collect()
    }

    pub fn coarse_of(&self, fine: &str) -> Option<&str> {
        self.iter().find(|(f, _)| *f == fine).map(|(_, c)| c)
    }

    /// Distinct coarse topics in order of first appearance.
    pub fn coarse_topics(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|(_, c)| seen.insert(c.as_str()))
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// For each coarse topic in `coarse`, the fine columns that map to it.
    ///
    /// Fails when a coarse topic has no fine topics (its max would be
    /// undefined) or a fine topic maps somewhere outside `coarse`.
    pub fn inverse_index(&self, coarse: &[String]) -> Result<Vec<Vec<usize>>, ConfigError> {
        let mut position: HashMap<&str, usize> = HashMap::with_capacity(coarse.len());
        for (k, topic) in coarse.iter().enumerate() {
            if position.insert(topic.as_str(), k).is_some() {
                return Err(ConfigError::DuplicateTopic {
                    topic: topic.clone(),
                });
            }
        }

        let mut columns = vec![Vec::new(); coarse.len()];
        for (j, (fine, target)) in self.entries.iter().enumerate() {
            let k = position
                .get(target.as_str())
                .ok_or_else(|| ConfigError::UnknownCoarseTopic {
                    fine: fine.clone(),
                    coarse: target.clone(),
                })?;
            columns[*k].push(j);
        }

        if let Some(k) = columns.iter().position(Vec::is_empty) {
            return Err(ConfigError::UnmappedCoarseTopic {
                topic: coarse[k].clone(),
            });
        }

        Ok(columns)
    }
}

/// A JSON object read entry by entry, repeated keys included.
struct MappingPairs(Vec<(String, String)>);

impl<'de> Deserialize<'de> for MappingPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = MappingPairs;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an object mapping fine topics to coarse topics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((fine, coarse)) = map.next_entry::<String, String>()? {
                    pairs.push((fine, coarse));
                }
                Ok(MappingPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
