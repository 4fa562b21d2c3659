//! SQL text -> token stream.
//!
//! Comments are stripped first, then the remaining text is scanned by a
//! single prioritized alternation: Number, String, Identifier, Operator,
//! Comma, LParen, RParen, Semicolon, Whitespace (discarded). Whichever
//! alternative matches at the current position wins; there is no
//! backtracking between alternatives.

use common::{DbError, DbResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Keyword,
    Operator,
    Comma,
    LParen,
    RParen,
    Semicolon,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: usize,
}

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "CREATE", "TABLE", "INT", "VARCHAR",
    "PRIMARY", "KEY", "AND", "OR", "NOT", "NULL", "DROP",
];

/// Strip `-- ... <newline>` and `/* ... */` comments, preserving every other
/// byte's position exactly by blanking comment bodies to spaces rather than
/// deleting them. Lexed token positions are reported against the original,
/// un-stripped input.
fn strip_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = bytes.to_vec();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'-' && i + 1 < bytes.len() && bytes[i + 1] == b'-' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            for b in out.iter_mut().take(i).skip(start) {
                *b = b' ';
            }
        } else if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            let start = i;
            i += 2;
            while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            i = (i + 2).min(bytes.len());
            for b in out.iter_mut().take(i).skip(start) {
                if *b != b'\n' {
                    *b = b' ';
                }
            }
        } else {
            i += 1;
        }
    }
    String::from_utf8(out).expect("comment-stripping preserves UTF-8 boundaries")
}

/// Tokenize `sql`. The final token is always `End`, positioned at the
/// length of the (comment-stripped) input.
pub fn tokenize(sql: &str) -> DbResult<Vec<Token>> {
    let stripped = strip_comments(sql);
    let chars: Vec<char> = stripped.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let lexeme: String = chars[start..i].iter().collect();
            tokens.push(Token {
                kind: TokenKind::Number,
                lexeme,
                position: start,
            });
            continue;
        }

        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    i += 2;
                } else {
                    i += 1;
                }
            }
            if i >= chars.len() {
                return Err(DbError::Lex(format!(
                    "unterminated string literal starting at position {start}"
                )));
            }
            // Quotes stripped; escape sequences kept verbatim (not interpreted).
            let lexeme: String = chars[start + 1..i].iter().collect();
            i += 1; // closing quote
            tokens.push(Token {
                kind: TokenKind::String,
                lexeme,
                position: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let lexeme: String = chars[start..i].iter().collect();
            let upper = lexeme.to_ascii_uppercase();
            if KEYWORDS.contains(&upper.as_str()) {
                tokens.push(Token {
                    kind: TokenKind::Keyword,
                    lexeme: upper,
                    position: start,
                });
            } else {
                tokens.push(Token {
                    kind: TokenKind::Identifier,
                    lexeme,
                    position: start,
                });
            }
            continue;
        }

        // Operator alternative 1: one of `=<>!`, optionally followed by `=`.
        // This always wins over the `<>` alternative below: `<` alone
        // already satisfies this branch, so a literal `<>` lexes as two
        // separate one-character operator tokens, never as one `<>` token.
        if matches!(c, '=' | '<' | '>' | '!') {
            i += 1;
            let mut lexeme = String::from(c);
            if i < chars.len() && chars[i] == '=' {
                lexeme.push('=');
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Operator,
                lexeme,
                position: start,
            });
            continue;
        }

        if matches!(c, '+' | '-' | '*' | '/') {
            i += 1;
            tokens.push(Token {
                kind: TokenKind::Operator,
                lexeme: c.to_string(),
                position: start,
            });
            continue;
        }

        match c {
            ',' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    lexeme: ",".into(),
                    position: start,
                });
            }
            '(' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    lexeme: "(".into(),
                    position: start,
                });
            }
            ')' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    lexeme: ")".into(),
                    position: start,
                });
            }
            ';' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Semicolon,
                    lexeme: ";".into(),
                    position: start,
                });
            }
            other => {
                return Err(DbError::Lex(format!(
                    "unrecognized character '{other}' at position {start}"
                )));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::End,
        lexeme: String::new(),
        position: chars.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        tokenize(sql).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_select_statement() {
        let toks = tokenize("SELECT id, name FROM users WHERE id = 2;").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[0].lexeme, "SELECT");
        assert_eq!(toks.last().unwrap().kind, TokenKind::End);
    }

    #[test]
    fn identifiers_uppercased_when_keyword() {
        let toks = tokenize("select FROM table").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[0].lexeme, "SELECT");
    }

    #[test]
    fn plain_identifier_preserves_case() {
        let toks = tokenize("MyTable").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].lexeme, "MyTable");
    }

    #[test]
    fn strings_strip_quotes_keep_escapes_verbatim() {
        let toks = tokenize("'it\\'s'").unwrap();
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].lexeme, "it\\'s");
    }

    #[test]
    fn numbers_integer_and_decimal() {
        let toks = tokenize("42 3.14 5.").unwrap();
        assert_eq!(toks[0].lexeme, "42");
        assert_eq!(toks[1].lexeme, "3.14");
        assert_eq!(toks[2].lexeme, "5.");
    }

    #[test]
    fn not_equal_operator_lexemes() {
        assert_eq!(
            kinds("!="),
            vec![TokenKind::Operator, TokenKind::End]
        );
        let toks = tokenize("!=").unwrap();
        assert_eq!(toks[0].lexeme, "!=");
    }

    #[test]
    fn angle_bracket_not_equal_splits_into_two_tokens() {
        // `<>` is never produced as a single token: `<` alone already
        // satisfies the first operator alternative.
        let toks = tokenize("<>").unwrap();
        assert_eq!(toks[0].lexeme, "<");
        assert_eq!(toks[1].lexeme, ">");
    }

    #[test]
    fn line_comment_stripped() {
        let toks = tokenize("SELECT 1 -- trailing comment\nFROM t").unwrap();
        let kws: Vec<_> = toks.iter().map(|t| t.lexeme.as_str()).collect();
        assert!(!kws.contains(&"trailing"));
    }

    #[test]
    fn block_comment_stripped_multiline() {
        let toks = tokenize("SELECT /* a\nb */ 1 FROM t").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[1].kind, TokenKind::Number);
    }

    #[test]
    fn unrecognized_character_is_lex_error() {
        let err = tokenize("SELECT $ FROM t").unwrap_err();
        assert!(matches!(err, DbError::Lex(_)));
    }

    #[test]
    fn end_position_equals_input_length() {
        let toks = tokenize("abc").unwrap();
        assert_eq!(toks.last().unwrap().position, 3);
    }
}
