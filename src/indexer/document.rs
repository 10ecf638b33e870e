use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::text::PhraseNormalizer;
use crate::vocab::Vocabulary;

/// Input document. Manual topics, when present, are `(topic, count)`
/// pairs in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub manual_topics: Option<Vec<(String, u32)>>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            manual_topics: None,
        }
    }

    pub fn with_topics(id: impl Into<String>, text: impl Into<String>, topics: Vec<(String, u32)>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            manual_topics: Some(topics),
        }
    }

    /// Document whose manual topics come from a `.key` style listing:
    /// one topic per line with an optional tab separated count.
    pub fn with_topic_listing(id: impl Into<String>, text: impl Into<String>, listing: &str) -> Self {
        let id = id.into();
        let topics = parse_topic_listing(&id, listing);
        Self::with_topics(id, text, topics)
    }
}

fn parse_topic_listing(id: &str, listing: &str) -> Vec<(String, u32)> {
    let mut topics = Vec::new();
    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (topic, count) = match line.split_once('\t') {
            Some((topic, count)) => {
                let count = count.trim().parse::<u32>().unwrap_or_else(|_| {
                    warn!(document = id, line, "unreadable topic count, using 1");
                    1
                });
                (topic.trim(), count)
            }
            None => (line, 1),
        };
        topics.push((topic.to_string(), count));
    }
    topics
}

/// Manual topics resolved to the labels candidates are matched with:
/// normalized keys without a vocabulary, preferred labels with one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualKeyphrases {
    counts: IndexMap<String, u32>,
}

impl ManualKeyphrases {
    pub fn from_counts<I: IntoIterator<Item = (String, u32)>>(counts: I) -> Self {
        let mut out = Self::default();
        for (label, count) in counts {
            out.add(label, count);
        }
        out
    }

    fn add(&mut self, label: String, count: u32) {
        let total = self.counts.entry(label).or_insert(0);
        *total = total.saturating_add(count);
    }

    /// `None` when no topic resolves, the document then counts as having
    /// no manual topics.
    pub fn resolve(
        document: &Document,
        normalizer: &PhraseNormalizer,
        vocabulary: Option<&Vocabulary>,
    ) -> Option<Self> {
        let topics = document.manual_topics.as_ref()?;
        let mut out = Self::default();
        for (topic, count) in topics {
            match vocabulary {
                None => {
                    if let Some(key) = normalizer.normalize(topic) {
                        out.add(key, *count);
                    }
                }
                Some(vocabulary) => {
                    // listings may carry an "<id>: " prefix
                    let phrase = topic.split_once(':').map_or(topic.as_str(), |(_, rest)| rest.trim_start());
                    let Some(key) = normalizer.normalize(phrase) else {
                        continue;
                    };
                    for sense in vocabulary.senses_for(&key) {
                        if let Some(label) = vocabulary.label(&sense) {
                            out.add(label.to_string(), *count);
                        }
                    }
                }
            }
        }
        if out.counts.is_empty() {
            warn!(document = %document.id, "document has no usable manual topics");
            return None;
        }
        Some(out)
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.counts.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(label, &count)| (label.as_str(), count))
    }
}
