//! Scalar tokens of the lockfile

use std::fmt;

/// A scalar as written in the lockfile
///
/// Tokens keep the quoting they were read with. A quoted token read from
/// text also keeps its escaped form, so escapes yarn never writes itself
/// come back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    quoted: bool,
    raw: Option<String>,
}

impl Token {
    /// Creates a token with explicit quoting
    pub fn with_quoting(value: impl Into<String>, quoted: bool) -> Self {
        Self {
            value: value.into(),
            quoted,
            raw: None,
        }
    }

    /// Creates a quoted token remembering the text between its quotes
    pub(crate) fn quoted_raw(value: String, raw: &str) -> Self {
        Self {
            value,
            quoted: true,
            raw: Some(raw.to_string()),
        }
    }

    /// The unquoted value
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the token is written between double quotes
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub(crate) fn render(&self, out: &mut String) {
        if !self.quoted {
            out.push_str(&self.value);
            return;
        }
        out.push('"');
        match &self.raw {
            Some(raw) => out.push_str(raw),
            None => {
                for c in self.value.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        _ => out.push(c),
                    }
                }
            }
        }
        out.push('"');
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes() {
        let token = Token::with_quoting(r#"a"b\c"#, true);
        assert_eq!(token.to_string(), r#""a\"b\\c""#);
    }

    #[test]
    fn test_render_bare() {
        assert_eq!(Token::with_quoting("integrity", false).to_string(), "integrity");
        assert_eq!(Token::with_quoting("1.0.0", true).to_string(), "\"1.0.0\"");
    }

    #[test]
    fn test_raw_text_wins_over_escaping() {
        let token = Token::quoted_raw(r"a\xb".to_string(), r"a\xb");
        assert_eq!(token.as_str(), r"a\xb");
        assert_eq!(token.to_string(), r#""a\xb""#);
    }
}
