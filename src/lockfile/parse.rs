//! yarn v1 lockfile parser
//!
//! Grammar (indentation is two spaces per level):
//! - header: leading `#` comments and blank lines, kept verbatim
//! - block header: `key[, key]*:` with each key a quoted or bare `name@range`
//! - field: `key value` or `key:` followed by deeper fields
//! - blocks are separated by blank lines

use super::{LockEntry, LockField, LockValue, Lockfile, Specifier, Token};
use crate::error::LockfileError;

pub(super) fn parse(text: &str) -> Result<Lockfile, LockfileError> {
    let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let final_newline = text.ends_with('\n');

    let lines: Vec<&str> = if text.is_empty() {
        Vec::new()
    } else {
        text.strip_suffix('\n')
            .unwrap_or(text)
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect()
    };

    let mut parser = Parser { lines, pos: 0 };
    let header = parser.header();
    let (entries, trailing_blank_lines) = parser.entries()?;

    Ok(Lockfile {
        header,
        entries,
        trailing_blank_lines,
        line_ending,
        final_newline,
    })
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn line_no(&self) -> usize {
        self.pos + 1
    }

    fn header(&mut self) -> Vec<String> {
        let mut header = Vec::new();
        while let Some(line) = self.lines.get(self.pos) {
            if !is_blank(line) && !line.starts_with('#') {
                break;
            }
            header.push(line.to_string());
            self.pos += 1;
        }
        header
    }

    /// Blocks, plus the number of blank lines after the last one
    fn entries(&mut self) -> Result<(Vec<LockEntry>, usize), LockfileError> {
        let mut entries = Vec::new();

        loop {
            let blank_start = self.pos;
            while self.lines.get(self.pos).is_some_and(|l| is_blank(l)) {
                self.pos += 1;
            }

            let Some(line) = self.lines.get(self.pos) else {
                return Ok((entries, self.pos - blank_start));
            };
            if line.starts_with('#') {
                return Err(LockfileError::parse(
                    self.line_no(),
                    "comments are only allowed in the header",
                ));
            }
            if line.starts_with([' ', '\t']) {
                return Err(LockfileError::parse(
                    self.line_no(),
                    "field outside of a block",
                ));
            }

            entries.push(self.entry()?);
        }
    }

    fn entry(&mut self) -> Result<LockEntry, LockfileError> {
        let line_no = self.line_no();
        let line = self.lines[self.pos];
        let keys = line
            .strip_suffix(':')
            .ok_or_else(|| LockfileError::parse(line_no, "block header must end with ':'"))?;

        let specifiers = parse_specifiers(keys, line_no)?;
        self.pos += 1;
        let fields = self.fields(1)?;

        Ok(LockEntry { specifiers, fields })
    }

    fn fields(&mut self, depth: usize) -> Result<Vec<LockField>, LockfileError> {
        let mut fields = Vec::new();

        while let Some(line) = self.lines.get(self.pos).copied() {
            if is_blank(line) {
                break;
            }
            let content = line.trim_start_matches(' ');
            let indent = line.len() - content.len();
            if indent < depth * 2 {
                break;
            }
            let line_no = self.line_no();
            if indent > depth * 2 || content.starts_with('\t') {
                return Err(LockfileError::parse(line_no, "unexpected indentation"));
            }

            let (key, rest) = read_token(content, line_no)?;
            self.pos += 1;

            let value = if rest == ":" {
                LockValue::Nested(self.fields(depth + 1)?)
            } else if let Some(value) = rest.strip_prefix(' ') {
                LockValue::Scalar(read_value(value, line_no)?)
            } else {
                return Err(LockfileError::parse(
                    line_no,
                    format!("expected a value after '{}'", key.as_str()),
                ));
            };

            fields.push(LockField { key, value });
        }

        Ok(fields)
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn parse_specifiers(keys: &str, line_no: usize) -> Result<Vec<Specifier>, LockfileError> {
    let mut specifiers = Vec::new();
    let mut rest = keys;

    loop {
        let (token, tail) = read_token(rest, line_no)?;
        let text = token.as_str().to_string();
        let specifier = Specifier::from_token(token).ok_or_else(|| {
            LockfileError::parse(line_no, format!("expected name@range, found '{}'", text))
        })?;
        specifiers.push(specifier);

        if tail.is_empty() {
            return Ok(specifiers);
        }
        rest = tail
            .strip_prefix(',')
            .ok_or_else(|| LockfileError::parse(line_no, "expected ',' between keys"))?
            .trim_start();
    }
}

/// Reads a quoted token, or a bare one up to a space, colon or comma
fn read_token(s: &str, line_no: usize) -> Result<(Token, &str), LockfileError> {
    if let Some(rest) = s.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((Token::quoted_raw(value, &rest[..i]), &rest[i + 1..])),
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                _ => value.push(c),
            }
        }
        return Err(LockfileError::parse(line_no, "unterminated quoted string"));
    }

    let end = s.find([' ', ':', ',']).unwrap_or(s.len());
    if end == 0 {
        return Err(LockfileError::parse(line_no, "expected a key"));
    }
    Ok((Token::with_quoting(&s[..end], false), &s[end..]))
}

/// Reads a scalar value that must span the rest of the line
fn read_value(s: &str, line_no: usize) -> Result<Token, LockfileError> {
    if s.starts_with('"') {
        let (token, tail) = read_token(s, line_no)?;
        if !tail.is_empty() {
            return Err(LockfileError::parse(
                line_no,
                format!("unexpected text after value: '{}'", tail),
            ));
        }
        return Ok(token);
    }
    if s.is_empty() {
        return Err(LockfileError::parse(line_no, "missing value"));
    }
    Ok(Token::with_quoting(s, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REAL_WORLD: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
  version "7.10.4"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.10.4.tgz#168da1a36e90da68ae8d49c0f1b48c7c6249213a"
  integrity sha512-vG6SvB6oYEhvgisZNFRmRCUkLz11c7rp+tbNTynGqc6mS1d5ATd/sGyV6W0KZZnXRKMTzZDRgQT3Ou9jhpAfUg==
  dependencies:
    "@babel/highlight" "^7.10.4"

js-tokens@^3.0.0, "js-tokens@^3.0.0 || ^4.0.0":
  version "4.0.0"
  resolved "https://registry.yarnpkg.com/js-tokens/-/js-tokens-4.0.0.tgz#19203fb59991df98e3a287050d4647cdeaf32499"
  integrity sha512-RdJUflcE3cUzKiMqQgsCu06FPu9UdIJO0beYbPhHN4k6apgJtifcoCtT9bcxOpYBtpD2kCM6Sbzg4CausW/PKQ==

fsevents@~2.1.2:
  version "2.1.3"
  optionalDependencies:
    nan "^2.12.1"
  peerDependenciesMeta:
    typescript:
      optional true
"#;

    #[test]
    fn test_real_world_round_trip() {
        let lockfile = parse(REAL_WORLD).unwrap();
        assert_eq!(lockfile.len(), 3);
        assert_eq!(lockfile.render(), REAL_WORLD);
    }

    #[test]
    fn test_aliases_resolve_to_one_entry() {
        let lockfile = parse(REAL_WORLD).unwrap();
        let entry = &lockfile.entries[1];
        let keys: Vec<_> = entry.specifiers.iter().map(|s| s.to_string()).collect();
        assert_eq!(keys, vec!["js-tokens@^3.0.0", "js-tokens@^3.0.0 || ^4.0.0"]);
        assert_eq!(entry.version(), Some("4.0.0"));
    }

    #[test]
    fn test_scoped_specifier_split() {
        let lockfile = parse(REAL_WORLD).unwrap();
        let specifier = &lockfile.entries[0].specifiers[0];
        assert_eq!(specifier.name, "@babel/code-frame");
        assert_eq!(specifier.range, "^7.0.0");
    }

    #[test]
    fn test_deeply_nested_fields() {
        let lockfile = parse(REAL_WORLD).unwrap();
        let entry = lockfile
            .get("fsevents")
            .find(|(range, _)| *range == "~2.1.2")
            .unwrap()
            .1;
        match entry.field("peerDependenciesMeta") {
            Some(LockValue::Nested(fields)) => {
                assert_eq!(fields[0].key.as_str(), "typescript");
                assert!(matches!(fields[0].value, LockValue::Nested(_)));
            }
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_lines_preserved() {
        let text = "a@^1.0.0:\n  version \"1.0.0\"\n\n\n";
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn test_missing_final_newline_preserved() {
        let text = "# yarn lockfile v1\n\na@^1.0.0:\n  version \"1.0.0\"";
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn test_crlf_preserved() {
        let text = "# yarn lockfile v1\r\n\r\na@^1.0.0:\r\n  version \"1.0.0\"\r\n";
        let lockfile = parse(text).unwrap();
        assert_eq!(lockfile.entries[0].version(), Some("1.0.0"));
        assert_eq!(lockfile.render(), text);
    }

    #[test]
    fn test_escaped_quotes() {
        let text = "a@^1.0.0:\n  version \"1.0.0\"\n  note \"say \\\"hi\\\"\"\n";
        let lockfile = parse(text).unwrap();
        match lockfile.entries[0].field("note") {
            Some(LockValue::Scalar(token)) => assert_eq!(token.as_str(), "say \"hi\""),
            other => panic!("unexpected value: {:?}", other),
        }
        assert_eq!(lockfile.render(), text);
    }

    #[test]
    fn test_unknown_escapes_keep_backslash() {
        let text = "\"a@C:\\dir\\x\":\n  version \"1.0.0\"\n  resolved \"file:C:\\x\\y\\q\"\n";
        let lockfile = parse(text).unwrap();
        let entry = &lockfile.entries[0];
        assert_eq!(entry.specifiers[0].range, "C:\\dir\\x");
        match entry.field("resolved") {
            Some(LockValue::Scalar(token)) => assert_eq!(token.as_str(), "file:C:\\x\\y\\q"),
            other => panic!("unexpected value: {:?}", other),
        }
        assert_eq!(lockfile.render(), text);
    }

    #[test]
    fn test_empty_text() {
        let lockfile = parse("").unwrap();
        assert!(lockfile.is_empty());
        assert_eq!(lockfile.render(), "");
    }

    #[test]
    fn test_error_field_outside_block() {
        let err = parse("# yarn lockfile v1\n\n  version \"1.0.0\"\n").unwrap_err();
        assert!(matches!(err, LockfileError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_error_header_without_colon() {
        let err = parse("a@^1.0.0\n  version \"1.0.0\"\n").unwrap_err();
        assert!(matches!(err, LockfileError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_error_bad_indentation() {
        let err = parse("a@^1.0.0:\n   version \"1.0.0\"\n").unwrap_err();
        assert!(matches!(err, LockfileError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_error_unterminated_quote() {
        let err = parse("a@^1.0.0:\n  version \"1.0.0\n").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_error_specifier_without_range() {
        let err = parse("lodash:\n  version \"1.0.0\"\n").unwrap_err();
        assert!(err.to_string().contains("expected name@range"));
    }

    #[test]
    fn test_error_comment_between_blocks() {
        let err = parse("a@^1.0.0:\n  version \"1.0.0\"\n\n# stray\n").unwrap_err();
        assert!(matches!(err, LockfileError::Parse { line: 4, .. }));
    }
}
