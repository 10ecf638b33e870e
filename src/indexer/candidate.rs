use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Occurrence record of one resolved phrase identity within a document.
///
/// Positions are word offsets while the document is scanned and become
/// fractions of the document length after [`normalize_positions`].
///
/// [`normalize_positions`]: Candidate::normalize_positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    name: String,
    title: Option<String>,
    frequency: u32,
    term_frequency: f64,
    first_occurrence: f64,
    last_occurrence: f64,
    /// surface form -> count, in order of first appearance
    full_forms: IndexMap<String, u32>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, form: impl Into<String>, position: usize) -> Self {
        let mut full_forms = IndexMap::new();
        full_forms.insert(form.into(), 1);
        Self {
            name: name.into(),
            title: None,
            frequency: 1,
            term_frequency: 0.0,
            first_occurrence: position as f64,
            last_occurrence: position as f64,
            full_forms,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn record_occurrence(&mut self, form: &str, position: usize) {
        self.frequency += 1;
        self.last_occurrence = position as f64;
        *self.full_forms.entry(form.to_string()).or_insert(0) += 1;
    }

    /// Turns counts into document relative values. Called once, after the
    /// whole document was scanned.
    pub fn normalize_positions(&mut self, total_occurrences: usize, document_length: usize) {
        self.term_frequency = if total_occurrences == 0 {
            0.0
        } else {
            self.frequency as f64 / total_occurrences as f64
        };
        if document_length > 0 {
            self.first_occurrence /= document_length as f64;
            self.last_occurrence /= document_length as f64;
        }
    }

    /// Folds another candidate for the same concept into this one
    pub fn merge_with(&mut self, other: &Candidate) {
        self.frequency += other.frequency;
        self.term_frequency += other.term_frequency;
        self.first_occurrence = self.first_occurrence.min(other.first_occurrence);
        self.last_occurrence = self.last_occurrence.max(other.last_occurrence);
        for (form, count) in &other.full_forms {
            *self.full_forms.entry(form.clone()).or_insert(0) += count;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Preferred label, set in vocabulary mode
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Key used against manual topics and the keyphrase dictionary
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn term_frequency(&self) -> f64 {
        self.term_frequency
    }

    pub fn first_occurrence(&self) -> f64 {
        self.first_occurrence
    }

    pub fn last_occurrence(&self) -> f64 {
        self.last_occurrence
    }

    pub fn spread(&self) -> f64 {
        self.last_occurrence - self.first_occurrence
    }

    pub fn full_forms(&self) -> &IndexMap<String, u32> {
        &self.full_forms
    }

    /// Most frequent surface form, the earliest one on ties
    pub fn best_full_form(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for (form, &count) in &self.full_forms {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((form.as_str(), count));
            }
        }
        best.map(|(form, _)| form)
    }

    /// Multi-line dump for debugging
    pub fn info(&self) -> String {
        let mut out = String::new();
        let forms: Vec<String> = self
            .full_forms
            .iter()
            .map(|(form, count)| format!("{form} ({count})"))
            .collect();
        let _ = writeln!(out, "\tName: {}", self.name);
        let _ = writeln!(out, "\tFullForm: {}", self.best_full_form().unwrap_or(""));
        let _ = writeln!(out, "\tAllFullForms: {}", forms.join(", "));
        let _ = writeln!(out, "\tTitle: {}", self.title.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "\tFreq: {}", self.frequency);
        let _ = writeln!(out, "\tTermFreq: {}", self.term_frequency);
        let _ = writeln!(out, "\tFirstOcc: {}", self.first_occurrence);
        let _ = writeln!(out, "\tLastOcc: {}", self.last_occurrence);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrences_and_normalization() {
        let mut c = Candidate::new("fox quick", "quick fox", 1);
        c.record_occurrence("quick foxes", 4);
        c.record_occurrence("quick fox", 6);
        assert_eq!(c.frequency(), 3);
        assert_eq!(c.full_forms().values().sum::<u32>(), 3);
        assert_eq!(c.best_full_form(), Some("quick fox"));

        c.normalize_positions(6, 8);
        assert_eq!(c.term_frequency(), 0.5);
        assert_eq!(c.first_occurrence(), 0.125);
        assert_eq!(c.last_occurrence(), 0.75);
        assert_eq!(c.spread(), 0.625);
    }

    #[test]
    fn best_form_tie_keeps_first_seen() {
        let mut c = Candidate::new("x", "b form", 0);
        c.record_occurrence("a form", 1);
        assert_eq!(c.best_full_form(), Some("b form"));
    }

    #[test]
    fn merge_sums_counts_and_widens_span() {
        let mut a = Candidate::new("c1", "maize", 3).with_title("Maize");
        let mut b = Candidate::new("c1", "corn", 1);
        b.record_occurrence("maize", 7);
        a.merge_with(&b);
        assert_eq!(a.frequency(), 3);
        assert_eq!(a.first_occurrence(), 1.0);
        assert_eq!(a.last_occurrence(), 7.0);
        assert_eq!(a.full_forms()["maize"], 2);
        assert_eq!(a.full_forms()["corn"], 1);
        assert_eq!(a.label(), "Maize");
        assert!(a.info().contains("Title: Maize"));
    }
}
