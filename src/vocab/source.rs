//! Thesaurus sources: a statement graph in N-Triples form, or three flat
//! text tables.

use std::io::BufRead;

use crate::error::{Result, VocabularyError};

/// Object of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Resource(String),
    Literal { value: String, lang: Option<String> },
}

/// One subject / predicate / object triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Statement {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Predicate name without its namespace, e.g. `prefLabel`
    pub fn local_name(&self) -> &str {
        local_name(&self.predicate)
    }
}

pub fn local_name(uri: &str) -> &str {
    match uri.rfind(['#', '/']) {
        Some(pos) => &uri[pos + 1..],
        None => uri,
    }
}

/// Reads statements in N-Triples form, one per line.
/// Blank lines and `#` comments are skipped.
pub fn parse_ntriples<R: BufRead>(reader: R) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let statement = parse_statement(trimmed).map_err(|reason| VocabularyError::MalformedStatement {
            line: idx + 1,
            reason,
        })?;
        statements.push(statement);
    }
    Ok(statements)
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn node(&mut self, what: &str) -> std::result::Result<String, String> {
        self.skip_ws();
        if let Some(body) = self.rest.strip_prefix('<') {
            let end = body.find('>').ok_or_else(|| format!("unterminated IRI in {what}"))?;
            self.rest = &body[end + 1..];
            Ok(body[..end].to_string())
        } else if self.rest.starts_with("_:") {
            let end = self.rest.find(char::is_whitespace).unwrap_or(self.rest.len());
            let label = self.rest[..end].to_string();
            self.rest = &self.rest[end..];
            Ok(label)
        } else {
            Err(format!("expected IRI or blank node as {what}"))
        }
    }

    fn literal(&mut self) -> std::result::Result<Object, String> {
        let body = self.rest.strip_prefix('"').ok_or("expected literal")?;
        let mut value = String::new();
        let mut chars = body.char_indices();
        let end = loop {
            let Some((i, c)) = chars.next() else {
                return Err("unterminated literal".to_string());
            };
            match c {
                '"' => break i,
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'u')) => {
                        let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                        let ch = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| format!("bad escape \\u{hex}"))?;
                        value.push(ch);
                    }
                    Some((_, other)) => return Err(format!("unknown escape \\{other}")),
                    None => return Err("unterminated literal".to_string()),
                },
                c => value.push(c),
            }
        };
        self.rest = &body[end + 1..];

        let mut lang = None;
        if let Some(tag) = self.rest.strip_prefix('@') {
            let end = tag.find(|c: char| c.is_whitespace() || c == '.').unwrap_or(tag.len());
            lang = Some(tag[..end].to_string());
            self.rest = &tag[end..];
        } else if let Some(typed) = self.rest.strip_prefix("^^") {
            self.rest = typed;
            self.node("datatype")?;
        }
        Ok(Object::Literal { value, lang })
    }
}

fn parse_statement(line: &str) -> std::result::Result<Statement, String> {
    let mut cur = Cursor { rest: line };
    let subject = cur.node("subject")?;
    let predicate = cur.node("predicate")?;
    cur.skip_ws();
    let object = if cur.rest.starts_with('"') {
        cur.literal()?
    } else {
        Object::Resource(cur.node("object")?)
    };
    cur.skip_ws();
    if cur.rest != "." {
        return Err(format!("expected '.' at end of statement, found {:?}", cur.rest));
    }
    Ok(Statement { subject, predicate, object })
}

/// `id label` rows, split on the first space
pub fn parse_label_table<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (id, label) = line.split_once(' ').ok_or_else(|| VocabularyError::MalformedTableRow {
            line: idx + 1,
            reason: "expected `<id> <label>`".to_string(),
        })?;
        rows.push((id.to_string(), label.trim().to_string()));
    }
    Ok(rows)
}

/// `non_descriptor<TAB>descriptor` rows. Rows naming more than one
/// descriptor are dropped.
pub fn parse_use_table<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (nd, desc) = line.split_once('\t').ok_or_else(|| VocabularyError::MalformedTableRow {
            line: idx + 1,
            reason: "expected `<non-descriptor>\\t<descriptor>`".to_string(),
        })?;
        let desc = desc.trim();
        if desc.contains(' ') {
            continue;
        }
        rows.push((nd.to_string(), desc.to_string()));
    }
    Ok(rows)
}

/// `id<TAB>related related ...` rows
pub fn parse_related_table<R: BufRead>(reader: R) -> Result<Vec<(String, Vec<String>)>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (id, related) = line.split_once('\t').ok_or_else(|| VocabularyError::MalformedTableRow {
            line: idx + 1,
            reason: "expected `<id>\\t<related ids>`".to_string(),
        })?;
        let related = related.split_whitespace().map(str::to_string).collect();
        rows.push((id.to_string(), related));
    }
    Ok(rows)
}
