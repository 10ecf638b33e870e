use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::config::VocabularyFormat;
use crate::error::Result;
use crate::text::PhraseNormalizer;
use crate::vocab::source::{self, Object, Statement};
use crate::vocab::{Store, StoreKind, Vocabulary, VocabularyStore};

/// Thesaurus predicates the builder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    PrefLabel,
    AltLabel,
    HiddenLabel,
    Broader,
    Narrower,
    Composite,
    CompositeOf,
    HasTopConcept,
    Related,
}

impl Relation {
    fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "prefLabel" => Relation::PrefLabel,
            "altLabel" => Relation::AltLabel,
            "hiddenLabel" => Relation::HiddenLabel,
            "broader" => Relation::Broader,
            "narrower" => Relation::Narrower,
            "composite" => Relation::Composite,
            "compositeOf" => Relation::CompositeOf,
            "hasTopConcept" => Relation::HasTopConcept,
            "related" => Relation::Related,
            _ => return None,
        })
    }
}

/// Single pass builder for a [`Vocabulary`].
///
/// Labels are indexed under their normalized key, so the normalizer given
/// here has to match the one used for extraction.
pub struct VocabularyBuilder<'a> {
    name: String,
    language: String,
    normalizer: &'a PhraseNormalizer,
    store: Store,
    non_descriptors: usize,
}

impl<'a> VocabularyBuilder<'a> {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        kind: StoreKind,
        normalizer: &'a PhraseNormalizer,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            normalizer,
            store: Store::new(kind),
            non_descriptors: 0,
        }
    }

    /// Literal value in the configured language, untagged literals pass
    fn label_in_language<'s>(&self, object: &'s Object) -> Option<&'s str> {
        match object {
            Object::Literal { value, lang: None } => Some(value),
            Object::Literal { value, lang: Some(lang) } if *lang == self.language => Some(value),
            _ => None,
        }
    }

    pub fn add_statement(&mut self, statement: &Statement) {
        let Some(relation) = Relation::from_local_name(statement.local_name()) else {
            return;
        };
        let concept = statement.subject.as_str();
        match relation {
            Relation::PrefLabel => {
                let Some(label) = self.label_in_language(&statement.object) else {
                    return;
                };
                if let Some(key) = self.normalizer.normalize(label) {
                    self.store.add_sense(&key, concept);
                    self.store.add_descriptor(concept, label);
                }
            }
            Relation::AltLabel | Relation::HiddenLabel => {
                let Some(label) = self.label_in_language(&statement.object) else {
                    return;
                };
                let synthetic = format!("d_{}", self.non_descriptors);
                self.non_descriptors += 1;
                if let Some(key) = self.normalizer.normalize(label) {
                    self.store.add_sense(&key, concept);
                    self.store.add_sense(&key, &synthetic);
                }
                self.store.add_descriptor(&synthetic, label);
                self.store.add_non_descriptor(&synthetic, concept);
            }
            Relation::Broader
            | Relation::Narrower
            | Relation::Composite
            | Relation::CompositeOf
            | Relation::HasTopConcept
            | Relation::Related => {
                let Object::Resource(other) = &statement.object else {
                    debug!(concept, "relation with a literal object ignored");
                    return;
                };
                self.store.add_related(concept, other);
                if relation == Relation::Related {
                    self.store.add_related(other, concept);
                }
            }
        }
    }

    /// Id / label pairs, each label becomes a sense of its id
    pub fn add_label_rows(&mut self, rows: &[(String, String)]) {
        for (id, label) in rows {
            if let Some(key) = self.normalizer.normalize(label) {
                self.store.add_sense(&key, id);
                self.store.add_descriptor(id, label);
            }
        }
    }

    pub fn add_use_rows(&mut self, rows: &[(String, String)]) {
        for (non_descriptor, descriptor) in rows {
            self.store.add_non_descriptor(non_descriptor, descriptor);
        }
    }

    pub fn add_related_rows(&mut self, rows: &[(String, Vec<String>)]) {
        for (id, related) in rows {
            for other in related {
                self.store.add_related(id, other);
            }
        }
    }

    pub fn build(self) -> Vocabulary {
        let vocabulary = Vocabulary::from_store(self.name, self.language, self.store);
        info!(
            vocabulary = vocabulary.name(),
            terms = vocabulary.num_terms(),
            non_descriptors = vocabulary.num_non_descriptors(),
            with_related = vocabulary.num_related(),
            "vocabulary built"
        );
        vocabulary
    }

    pub fn from_statements<'s, I>(mut self, statements: I) -> Vocabulary
    where
        I: IntoIterator<Item = &'s Statement>,
    {
        for statement in statements {
            self.add_statement(statement);
        }
        self.build()
    }

    /// Builds from an N-Triples statement graph
    pub fn from_ntriples<R: BufRead>(self, reader: R) -> Result<Vocabulary> {
        let statements = source::parse_ntriples(reader)?;
        debug!(statements = statements.len(), "statement graph read");
        Ok(self.from_statements(&statements))
    }

    /// Builds from the label, non-descriptor and related tables
    pub fn from_text_tables<L, U, R>(mut self, labels: L, uses: U, related: R) -> Result<Vocabulary>
    where
        L: BufRead,
        U: BufRead,
        R: BufRead,
    {
        self.add_label_rows(&source::parse_label_table(labels)?);
        self.add_use_rows(&source::parse_use_table(uses)?);
        self.add_related_rows(&source::parse_related_table(related)?);
        Ok(self.build())
    }

    /// Builds from the source files of this vocabulary in `dir`:
    /// `<name>.nt` for a statement graph, `<name>.<language>`, `<name>.use`
    /// and `<name>.rel` for text tables. A missing file is an i/o error.
    pub fn from_directory(self, dir: impl AsRef<Path>, format: VocabularyFormat) -> Result<Vocabulary> {
        let dir = dir.as_ref();
        let open = |extension: &str| -> Result<BufReader<File>> {
            let path = dir.join(format!("{}.{extension}", self.name));
            debug!(path = %path.display(), "opening vocabulary source");
            Ok(BufReader::new(File::open(path)?))
        };
        match format {
            VocabularyFormat::Skos => {
                let graph = open("nt")?;
                self.from_ntriples(graph)
            }
            VocabularyFormat::Text => {
                let labels = open(&self.language)?;
                let uses = open("use")?;
                let related = open("rel")?;
                self.from_text_tables(labels, uses, related)
            }
        }
    }
}
