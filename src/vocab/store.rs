/// Storage behind a [`Vocabulary`](crate::vocab::Vocabulary).
///
/// Concept ids are plain strings at this interface, backends are free to
/// keep them in any form. Writes only happen while a vocabulary is being
/// built, the finished store is read-only.
pub trait VocabularyStore {
    /// `key` is a normalized phrase, `id` a concept or non-descriptor id
    fn add_sense(&mut self, key: &str, id: &str);
    fn add_descriptor(&mut self, id: &str, label: &str);
    fn add_non_descriptor(&mut self, id: &str, descriptor: &str);
    /// Adds `related` to the neighbors of `id` unless already there
    fn add_related(&mut self, id: &str, related: &str);

    /// Ids registered for `key`, in discovery order, unresolved
    fn raw_senses(&self, key: &str) -> Vec<String>;
    fn num_senses(&self, key: &str) -> usize;
    fn descriptor_of(&self, id: &str) -> Option<String>;
    fn label(&self, id: &str) -> Option<&str>;
    fn related(&self, id: &str) -> Option<Vec<String>>;

    fn num_terms(&self) -> usize;
    fn num_non_descriptors(&self) -> usize;
    fn num_related(&self) -> usize;

    /// Descriptor ids for a normalized phrase.
    ///
    /// Non-descriptors resolve to their descriptor, ids without a label are
    /// dropped and duplicates removed. Senses labelled with a parenthetical
    /// qualifier, like "Bank (finance)", are only kept when no plain sense
    /// exists.
    fn senses_for(&self, key: &str) -> Vec<String> {
        let mut resolved: Vec<(String, bool)> = Vec::new();
        for raw in self.raw_senses(key) {
            let id = self.descriptor_of(&raw).unwrap_or(raw);
            let Some(label) = self.label(&id) else {
                continue;
            };
            if resolved.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            let qualified = label.contains('(');
            resolved.push((id, qualified));
        }
        prefer_unqualified(resolved)
    }
}

/// Keeps the entries flagged `false` when there is at least one,
/// everything otherwise. Order is preserved.
pub(crate) fn prefer_unqualified<T>(senses: Vec<(T, bool)>) -> Vec<T> {
    let any_plain = senses.iter().any(|(_, qualified)| !qualified);
    senses
        .into_iter()
        .filter(|(_, qualified)| !any_plain || !qualified)
        .map(|(sense, _)| sense)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_senses_are_a_fallback() {
        assert_eq!(prefer_unqualified(vec![(1, false), (2, true), (3, false)]), vec![1, 3]);
        assert_eq!(prefer_unqualified(vec![(1, true), (2, true)]), vec![1, 2]);
        assert!(prefer_unqualified::<u32>(vec![]).is_empty());
    }
}
