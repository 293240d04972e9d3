//! yarn v1 lockfile model
//!
//! The lockfile is parsed into blocks of fields, mutated in memory and
//! rendered back. Rendering an unmodified lockfile reproduces the original
//! text byte for byte: header comments, token quoting, field order, line
//! endings and trailing blank lines are all remembered.

mod parse;
mod token;

pub use token::Token;

use crate::error::{LockfileError, WriteError};
use crate::manifest::write_atomic;
use std::fmt;
use std::fs;
use std::path::Path;

/// One `name@range` key of a block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Package name, including its scope
    pub name: String,
    /// Range the package was requested with
    pub range: String,
    token: Token,
}

impl Specifier {
    /// Split a `name@range` token; the scope `@` of `@scope/name` is not a separator
    pub(crate) fn from_token(token: Token) -> Option<Self> {
        let text = token.as_str();
        let at = text.get(1..)?.find('@')? + 1;
        Some(Self {
            name: text[..at].to_string(),
            range: text[at + 1..].to_string(),
            token,
        })
    }

    fn to_token(&self) -> Token {
        let text = self.to_string();
        if text == self.token.as_str() {
            self.token.clone()
        } else {
            Token::with_quoting(text, self.token.is_quoted())
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}

/// Value of a field: a scalar or a nested block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockValue {
    Scalar(Token),
    Nested(Vec<LockField>),
}

/// A `key value` line, or a `key:` line followed by indented fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockField {
    pub key: Token,
    pub value: LockValue,
}

impl LockField {
    fn render(&self, depth: usize, eol: &str, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        self.key.render(out);
        match &self.value {
            LockValue::Scalar(value) => {
                out.push(' ');
                value.render(out);
                out.push_str(eol);
            }
            LockValue::Nested(fields) => {
                out.push(':');
                out.push_str(eol);
                for field in fields {
                    field.render(depth + 1, eol, out);
                }
            }
        }
    }
}

/// One block of the lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    /// Header keys resolving to this block, in header order
    pub specifiers: Vec<Specifier>,
    /// Fields in file order
    pub fields: Vec<LockField>,
}

impl LockEntry {
    /// Looks up a top-level field
    pub fn field(&self, key: &str) -> Option<&LockValue> {
        self.fields
            .iter()
            .find(|f| f.key.as_str() == key)
            .map(|f| &f.value)
    }

    /// The resolved version
    pub fn version(&self) -> Option<&str> {
        match self.field("version") {
            Some(LockValue::Scalar(token)) => Some(token.as_str()),
            _ => None,
        }
    }

    /// Returns true if the header contains `name@range`
    pub fn matches(&self, name: &str, range: &str) -> bool {
        self.specifiers
            .iter()
            .any(|s| s.name == name && s.range == range)
    }

    fn render(&self, eol: &str, out: &mut String) {
        for (i, specifier) in self.specifiers.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            specifier.to_token().render(out);
        }
        out.push(':');
        out.push_str(eol);
        for field in &self.fields {
            field.render(1, eol, out);
        }
    }
}

/// A parsed yarn.lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lockfile {
    header: Vec<String>,
    entries: Vec<LockEntry>,
    trailing_blank_lines: usize,
    line_ending: &'static str,
    final_newline: bool,
}

impl Lockfile {
    /// Parse lockfile text
    pub fn parse(text: &str) -> Result<Self, LockfileError> {
        parse::parse(text)
    }

    /// Read and parse a lockfile from disk
    pub fn load(path: &Path) -> Result<Self, LockfileError> {
        let text = fs::read_to_string(path).map_err(|e| LockfileError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    /// Render and atomically write the lockfile
    pub fn save(&self, path: &Path) -> Result<(), WriteError> {
        write_atomic(path, &self.render()).map_err(|e| WriteError::lockfile(path, e))
    }

    /// All (range, block) pairs for a package, in file order
    pub fn get<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a LockEntry)> + 'a {
        self.entries.iter().flat_map(move |entry| {
            entry
                .specifiers
                .iter()
                .filter(move |s| s.name == name)
                .map(move |s| (s.range.as_str(), entry))
        })
    }

    /// Distinct package names, in file order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for specifier in self.entries.iter().flat_map(|e| &e.specifiers) {
            if !names.contains(&specifier.name.as_str()) {
                names.push(&specifier.name);
            }
        }
        names
    }

    /// Removes the `name@range` key
    ///
    /// A block left without keys is dropped. Returns false, and changes
    /// nothing, if no block has that key.
    pub fn remove(&mut self, name: &str, range: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.matches(name, range)) else {
            return false;
        };

        let entry = &mut self.entries[pos];
        entry
            .specifiers
            .retain(|s| !(s.name == name && s.range == range));
        if entry.specifiers.is_empty() {
            self.entries.remove(pos);
        }
        true
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the lockfile has no blocks
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the lockfile text
    pub fn render(&self) -> String {
        let eol = self.line_ending;
        let mut out = String::new();

        for line in &self.header {
            out.push_str(line);
            out.push_str(eol);
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(eol);
            }
            entry.render(eol, &mut out);
        }
        for _ in 0..self.trailing_blank_lines {
            out.push_str(eol);
        }

        if !self.final_newline && out.ends_with(eol) {
            out.truncate(out.len() - eol.len());
        }
        out
    }
}

impl fmt::Display for Lockfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
