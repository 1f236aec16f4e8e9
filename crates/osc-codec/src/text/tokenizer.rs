//! Lexer for the textual packet form

use crate::{Error, Result};

/// Lexical token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextToken {
    /// Bare text up to the next `,`, `]` or `}`
    Literal,
    /// `"..."`
    String,
    /// `$"..."`
    Symbol,
    /// `'...'`
    Char,
    /// `,`
    Separator,
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
    End,
}

/// Splits text into [`TextToken`]s, borrowing token text from the input
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Next non-whitespace character without consuming anything
    pub fn peek_char(&self) -> Option<char> {
        self.input[self.position..]
            .chars()
            .find(|c| !is_whitespace(*c))
    }

    /// Next token and its text. Quoted tokens yield the text between the
    /// quotes, still escaped; punctuation yields an empty string.
    pub fn next_token(&mut self) -> Result<(TextToken, &'a str)> {
        self.skip_whitespace();

        let rest = &self.input[self.position..];
        let Some(c) = rest.chars().next() else {
            return Ok((TextToken::End, ""));
        };

        let token = match c {
            '$' if rest[1..].starts_with('"') => {
                self.position += 2;
                return Ok((TextToken::Symbol, self.read_quoted('"')?));
            }
            '"' => {
                self.position += 1;
                return Ok((TextToken::String, self.read_quoted('"')?));
            }
            '\'' => {
                self.position += 1;
                return Ok((TextToken::Char, self.read_quoted('\'')?));
            }
            ',' => TextToken::Separator,
            '[' => TextToken::ArrayStart,
            ']' => TextToken::ArrayEnd,
            '{' => TextToken::ObjectStart,
            '}' => TextToken::ObjectEnd,
            _ => return Ok((TextToken::Literal, self.read_literal())),
        };

        self.position += 1;
        Ok((token, ""))
    }

    /// Name of an object, up to and including its `:`
    pub fn read_object_name(&mut self) -> Result<&'a str> {
        let rest = &self.input[self.position..];

        match rest.find([',', ':', ']', '}']) {
            Some(index) if rest[index..].starts_with(':') => {
                self.position += index + 1;
                Ok(rest[..index].trim())
            }
            Some(index) => Err(Error::InvalidObjectName(format!(
                "invalid object name {}",
                rest[..index].trim()
            ))),
            None => Err(Error::InvalidObjectName(format!(
                "invalid object name {}",
                rest.trim()
            ))),
        }
    }

    fn read_literal(&mut self) -> &'a str {
        let rest = &self.input[self.position..];
        let end = rest.find([',', ']', '}']).unwrap_or(rest.len());
        self.position += end;
        &rest[..end]
    }

    /// Text up to the unescaped closing `quote`, which is consumed
    fn read_quoted(&mut self, quote: char) -> Result<&'a str> {
        let rest = &self.input[self.position..];
        let mut escaped = false;

        for (index, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }

            if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.position += index + c.len_utf8();
                return Ok(&rest[..index]);
            }
        }

        Err(Error::InvalidValue(format!(
            "unterminated quoted value starting at {}",
            self.position
        )))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        let skipped = rest
            .find(|c: char| !is_whitespace(c))
            .unwrap_or(rest.len());
        self.position += skipped;
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<(TextToken, &str)> {
        let mut tokenizer = Tokenizer::new(input);
        let mut out = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            out.push(token);
            if token.0 == TextToken::End {
                return out;
            }
        }
    }

    #[test]
    fn test_message_tokens() {
        assert_eq!(
            tokens("/test, 1, \"two\", $\"three\", 'c', [4]"),
            vec![
                (TextToken::Literal, "/test"),
                (TextToken::Separator, ""),
                (TextToken::Literal, " 1"),
                (TextToken::Separator, ""),
                (TextToken::String, "two"),
                (TextToken::Separator, ""),
                (TextToken::Symbol, "three"),
                (TextToken::Separator, ""),
                (TextToken::Char, "c"),
                (TextToken::Separator, ""),
                (TextToken::ArrayStart, ""),
                (TextToken::Literal, "4"),
                (TextToken::ArrayEnd, ""),
                (TextToken::End, ""),
            ]
        );
    }

    #[test]
    fn test_escaped_quote() {
        let mut tokenizer = Tokenizer::new(r#""say \"hi\"""#);
        assert_eq!(
            tokenizer.next_token().unwrap(),
            (TextToken::String, r#"say \"hi\""#)
        );
    }

    #[test]
    fn test_dollar_literal() {
        let mut tokenizer = Tokenizer::new("$money");
        assert_eq!(tokenizer.next_token().unwrap(), (TextToken::Literal, "$money"));
    }

    #[test]
    fn test_object_name() {
        let mut tokenizer = Tokenizer::new("{ blob: 1 }");
        assert_eq!(tokenizer.next_token().unwrap().0, TextToken::ObjectStart);
        assert_eq!(tokenizer.read_object_name().unwrap(), "blob");

        let mut tokenizer = Tokenizer::new("{ blob, 1 }");
        tokenizer.next_token().unwrap();
        assert!(matches!(
            tokenizer.read_object_name(),
            Err(Error::InvalidObjectName(_))
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("\"open");
        assert!(tokenizer.next_token().is_err());
    }
}
