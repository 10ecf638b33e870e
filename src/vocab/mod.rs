pub mod builder;
pub mod interned_store;
pub mod source;
pub mod store;
pub mod string_store;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use builder::VocabularyBuilder;
pub use interned_store::InternedStore;
pub use source::{Object, Statement};
pub use store::VocabularyStore;
pub use string_store::StringStore;

use crate::error::Result;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Strings,
    Interned,
}

/// One of the two store backends. Serializable as is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Store {
    Strings(StringStore),
    Interned(InternedStore),
}

impl Store {
    pub fn new(kind: StoreKind) -> Self {
        match kind {
            StoreKind::Strings => Store::Strings(StringStore::new()),
            StoreKind::Interned => Store::Interned(InternedStore::new()),
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Store::Strings(_) => StoreKind::Strings,
            Store::Interned(_) => StoreKind::Interned,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $body:expr) => {
        match $self {
            Store::Strings($s) => $body,
            Store::Interned($s) => $body,
        }
    };
}

impl VocabularyStore for Store {
    fn add_sense(&mut self, key: &str, id: &str) {
        dispatch!(self, s => s.add_sense(key, id))
    }
    fn add_descriptor(&mut self, id: &str, label: &str) {
        dispatch!(self, s => s.add_descriptor(id, label))
    }
    fn add_non_descriptor(&mut self, id: &str, descriptor: &str) {
        dispatch!(self, s => s.add_non_descriptor(id, descriptor))
    }
    fn add_related(&mut self, id: &str, related: &str) {
        dispatch!(self, s => s.add_related(id, related))
    }
    fn raw_senses(&self, key: &str) -> Vec<String> {
        dispatch!(self, s => s.raw_senses(key))
    }
    fn num_senses(&self, key: &str) -> usize {
        dispatch!(self, s => s.num_senses(key))
    }
    fn descriptor_of(&self, id: &str) -> Option<String> {
        dispatch!(self, s => s.descriptor_of(id))
    }
    fn label(&self, id: &str) -> Option<&str> {
        dispatch!(self, s => s.label(id))
    }
    fn related(&self, id: &str) -> Option<Vec<String>> {
        dispatch!(self, s => s.related(id))
    }
    fn num_terms(&self) -> usize {
        dispatch!(self, s => s.num_terms())
    }
    fn num_non_descriptors(&self) -> usize {
        dispatch!(self, s => s.num_non_descriptors())
    }
    fn num_related(&self) -> usize {
        dispatch!(self, s => s.num_related())
    }
    fn senses_for(&self, key: &str) -> Vec<String> {
        dispatch!(self, s => s.senses_for(key))
    }
}

/// A built thesaurus: normalized phrase keys to concept ids, concept
/// labels, synonyms and related concepts.
///
/// Read-only once built. Lookups take keys already produced by the
/// [`PhraseNormalizer`](crate::text::PhraseNormalizer) the vocabulary was
/// built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    name: String,
    language: String,
    store: Store,
}

impl Vocabulary {
    pub fn from_store(name: impl Into<String>, language: impl Into<String>, store: Store) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Descriptor ids for a normalized key, plain labels first
    pub fn senses_for(&self, key: &str) -> Vec<String> {
        self.store.senses_for(key)
    }

    pub fn related_concepts(&self, id: &str) -> Option<Vec<String>> {
        self.store.related(id)
    }

    /// Preferred label of a concept
    pub fn label(&self, id: &str) -> Option<&str> {
        self.store.label(id)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.num_senses(key) > 0
    }

    pub fn is_ambiguous(&self, key: &str) -> bool {
        self.store.num_senses(key) > 1
    }

    pub fn num_terms(&self) -> usize {
        self.store.num_terms()
    }

    pub fn num_non_descriptors(&self) -> usize {
        self.store.num_non_descriptors()
    }

    pub fn num_related(&self) -> usize {
        self.store.num_related()
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_cbor::from_reader(reader)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(BufReader::new(File::open(path)?))
    }
}
