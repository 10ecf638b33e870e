//! Text handling: phrase tokenizing, stemming, stopwords and the
//! pseudo-phrase normalizer built on top of them.

pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::{NormalizerProfile, PhraseNormalizer};
pub use stemmer::{NoStemmer, SRemovalStemmer, SnowballLanguage, SnowballStemmer, Stemmer, StemmerKind};
pub use stopwords::{StopwordSet, Stopwords, StopwordsKind};
pub use tokenizer::{PhraseTokenizer, PHRASE_BOUNDARY};
