/// Phrase boundary marker in tokenizer output
pub const PHRASE_BOUNDARY: char = '\n';

/// Splits raw text into phrases.
///
/// Output holds the words of the input in their original order, separated
/// by single spaces inside a phrase and by [`PHRASE_BOUNDARY`] between
/// phrases. Punctuation, blank lines and bare numbers end a phrase. A hyphen
/// or slash followed by a line break joins the words on either side.
#[derive(Debug, Clone, Copy)]
pub struct PhraseTokenizer {
    allow_internal_periods: bool,
}

impl Default for PhraseTokenizer {
    fn default() -> Self {
        Self { allow_internal_periods: true }
    }
}

/// scanner state between words
struct ScanState {
    phrase_start: bool,
    seen_newline: bool,
    seen_hyphen: bool,
    seen_slash: bool,
}

impl ScanState {
    fn break_phrase(&mut self, out: &mut String) {
        if !self.phrase_start {
            out.push(PHRASE_BOUNDARY);
            self.phrase_start = true;
        }
    }
}

impl PhraseTokenizer {
    pub fn new(allow_internal_periods: bool) -> Self {
        Self { allow_internal_periods }
    }

    #[inline]
    fn is_joiner(&self, ch: char) -> bool {
        matches!(ch, '@' | '_' | '&' | '/' | '\'') || (ch == '.' && self.allow_internal_periods)
    }

    pub fn tokenize(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let mut out = String::with_capacity(text.len());
        let mut state = ScanState {
            phrase_start: true,
            seen_newline: false,
            seen_hyphen: false,
            seen_slash: false,
        };

        let mut j = 0;
        while j < n {
            let start = j;
            let mut is_word = false;
            let mut pot_number = false;
            while j < n {
                let ch = chars[j];
                if ch.is_alphanumeric() {
                    pot_number = true;
                    is_word |= ch.is_alphabetic();
                    j += 1;
                } else if self.is_joiner(ch)
                    && j > 0
                    && j + 1 < n
                    && chars[j - 1].is_alphanumeric()
                    && chars[j + 1].is_alphanumeric()
                {
                    j += 1;
                } else {
                    break;
                }
            }

            if is_word {
                if !state.phrase_start {
                    out.push(if state.seen_slash && !state.seen_hyphen { '/' } else { ' ' });
                }
                out.extend(&chars[start..j]);
                if j == n {
                    break;
                }
                state.phrase_start = false;
                state.seen_newline = false;
                state.seen_hyphen = false;
                state.seen_slash = false;
                match chars[j] {
                    '\n' => state.seen_newline = true,
                    c if c.is_whitespace() => {}
                    '-' => state.seen_hyphen = true,
                    '/' => state.seen_slash = true,
                    _ => {
                        state.phrase_start = true;
                        out.push(PHRASE_BOUNDARY);
                    }
                }
                j += 1;
            } else if j == n {
                break;
            } else {
                match chars[j] {
                    '\n' => {
                        if state.seen_newline || pot_number {
                            state.break_phrase(&mut out);
                        }
                        state.seen_newline = true;
                    }
                    c if c.is_whitespace() => {
                        if pot_number {
                            state.break_phrase(&mut out);
                        }
                    }
                    _ => state.break_phrase(&mut out),
                }
                j += 1;
            }
        }
        out
    }

    /// Phrases of the tokenized `text`, each as its list of words
    pub fn phrases<'a>(&self, tokenized: &'a str) -> impl Iterator<Item = Vec<&'a str>> + 'a {
        tokenized
            .split(PHRASE_BOUNDARY)
            .map(|p| p.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>())
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str) -> String {
        PhraseTokenizer::default().tokenize(text)
    }

    #[test]
    fn punctuation_breaks_phrases() {
        assert_eq!(tok("soil erosion, water quality"), "soil erosion\nwater quality");
        assert_eq!(tok("rice; maize"), "rice\nmaize");
    }

    #[test]
    fn interior_joiners_stay_in_word() {
        assert_eq!(tok("e.g. o'brien at fao.org"), "e.g\no'brien at fao.org");
        assert_eq!(tok("r&d and/or"), "r&d and/or");
    }

    #[test]
    fn internal_periods_can_be_disallowed() {
        let t = PhraseTokenizer::new(false);
        assert_eq!(t.tokenize("fao.org site"), "fao\norg site");
    }

    #[test]
    fn hyphen_across_line_break_joins() {
        assert_eq!(tok("land-\nuse planning"), "land use planning");
    }

    #[test]
    fn blank_line_breaks_phrase() {
        assert_eq!(tok("forest\n\nfire"), "forest\nfire");
        assert_eq!(tok("forest\nfire"), "forest fire");
    }

    #[test]
    fn numbers_break_phrases() {
        assert_eq!(tok("in 2004 rice yields"), "in\nrice yields");
        assert_eq!(tok("covid19 cases"), "covid19 cases");
    }

    #[test]
    fn trailing_word_is_flushed() {
        assert_eq!(tok("the end"), "the end");
        assert_eq!(tok("end."), "end\n");
    }

    #[test]
    fn phrases_splits_words() {
        let t = PhraseTokenizer::default();
        let text = t.tokenize("green rice, brown rice");
        let phrases: Vec<Vec<&str>> = t.phrases(&text).collect();
        assert_eq!(phrases, vec![vec!["green", "rice"], vec!["brown", "rice"]]);
    }
}
