//! Lexer (tokenizer) for step script command lines
//!
//! Mutation lines use a small call/attribute syntax:
//! `symbol[3].first.add(5)`, `addEdge(0, 1, 'E')`, `production[2].body = [1, 4]`.
//! The lexer turns one such line into a flat [`Token`] stream. Identifiers
//! borrow from the line; string literals are unescaped into owned strings.

use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries the zero-based column where it starts so that
/// parse errors can point into the line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    // Literals
    IntLiteral(i64, usize),
    StringLiteral(String, usize),

    // Identifiers (including True/False, resolved by the parser)
    Ident(&'a str, usize),

    // Punctuation
    LParen(usize),   // (
    RParen(usize),   // )
    LBracket(usize), // [
    RBracket(usize), // ]
    Dot(usize),      // .
    Comma(usize),    // ,
    Eq(usize),       // =

    // End of line
    Eol(usize),
}

impl Token<'_> {
    /// Returns the column where this token appears.
    pub fn column(&self) -> usize {
        match self {
            Token::IntLiteral(_, col)
            | Token::StringLiteral(_, col)
            | Token::Ident(_, col)
            | Token::LParen(col)
            | Token::RParen(col)
            | Token::LBracket(col)
            | Token::RBracket(col)
            | Token::Dot(col)
            | Token::Comma(col)
            | Token::Eq(col)
            | Token::Eol(col) => *col,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::StringLiteral(s, _) => write!(f, "string literal '{}'", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Eol(_) => write!(f, "end of line"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("column {column}: {message}")]
pub struct LexError {
    pub message: String,
    pub column: usize,
}

/// Lexer for a single command line
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given line.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Tokenize the entire line
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::Eol(self.position));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        let start = self.position;
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of line".to_string(),
            column: start,
        })?;

        match ch {
            '\'' | '"' => self.string_literal(ch, start),
            '0'..='9' => self.number_literal(start),
            '-' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.number_literal(start)
                } else {
                    Err(LexError {
                        message: "Expected digit after '-'".to_string(),
                        column: start,
                    })
                }
            }
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier(start)),
            '(' => Ok(Token::LParen(start)),
            ')' => Ok(Token::RParen(start)),
            '[' => Ok(Token::LBracket(start)),
            ']' => Ok(Token::RBracket(start)),
            '.' => Ok(Token::Dot(start)),
            ',' => Ok(Token::Comma(start)),
            '=' => Ok(Token::Eq(start)),
            other => Err(LexError {
                message: format!("Unexpected character '{}'", other),
                column: start,
            }),
        }
    }

    /// Lex a quoted string; the opening quote has been consumed.
    fn string_literal(&mut self, quote: char, start: usize) -> Result<Token<'a>, LexError> {
        let mut value = String::new();

        loop {
            let ch = self.advance().ok_or_else(|| LexError {
                message: "Unterminated string literal".to_string(),
                column: start,
            })?;

            if ch == quote {
                break;
            }

            if ch == '\\' {
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unterminated escape sequence".to_string(),
                    column: self.position,
                })?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\\' => value.push('\\'),
                    '\'' => value.push('\''),
                    '"' => value.push('"'),
                    other => {
                        // Unknown escapes are kept verbatim
                        value.push('\\');
                        value.push(other);
                    }
                }
            } else {
                value.push(ch);
            }
        }

        Ok(Token::StringLiteral(value, start))
    }

    /// Lex an integer; the first character (digit or '-') has been consumed.
    fn number_literal(&mut self, start: usize) -> Result<Token<'a>, LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.input[start..self.position];
        text.parse::<i64>()
            .map(|n| Token::IntLiteral(n, start))
            .map_err(|_| LexError {
                message: format!("Integer literal '{}' out of range", text),
                column: start,
            })
    }

    fn identifier(&mut self, start: usize) -> Token<'a> {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::Ident(&self.input[start..self.position], start)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_chain() {
        let mut lexer = Lexer::new("symbol[3].first.add(5)");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident("symbol", 0)));
        assert!(matches!(tokens[1], Token::LBracket(_)));
        assert!(matches!(tokens[2], Token::IntLiteral(3, _)));
        assert!(matches!(tokens[3], Token::RBracket(_)));
        assert!(matches!(tokens[4], Token::Dot(_)));
        assert!(matches!(tokens[5], Token::Ident("first", _)));
        assert!(matches!(tokens[6], Token::Dot(_)));
        assert!(matches!(tokens[7], Token::Ident("add", _)));
        assert!(matches!(tokens[8], Token::LParen(_)));
        assert!(matches!(tokens[9], Token::IntLiteral(5, _)));
        assert!(matches!(tokens[10], Token::RParen(_)));
        assert!(matches!(tokens[11], Token::Eol(_)));
    }

    #[test]
    fn test_string_literals_and_escapes() {
        let mut lexer = Lexer::new(r#"show('it\'s'), "a\nb""#);
        let tokens = lexer.tokenize().unwrap();

        match &tokens[2] {
            Token::StringLiteral(s, _) => assert_eq!(s, "it's"),
            other => panic!("Expected string literal, got {:?}", other),
        }
        match &tokens[5] {
            Token::StringLiteral(s, _) => assert_eq!(s, "a\nb"),
            other => panic!("Expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_non_ascii_in_strings() {
        let mut lexer = Lexer::new("symbol[0].name='ε'");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[6], Token::Eq(_)));
        assert!(matches!(&tokens[7], Token::StringLiteral(s, _) if s == "ε"));
    }

    #[test]
    fn test_negative_integers() {
        let mut lexer = Lexer::new("[-1, 2]");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[1], Token::IntLiteral(-1, 1)));
        assert!(matches!(tokens[3], Token::IntLiteral(2, _)));
    }

    #[test]
    fn test_errors() {
        assert!(Lexer::new("show('open").tokenize().is_err());
        assert!(Lexer::new("a + b").tokenize().is_err());
        let err = Lexer::new("x = - 1").tokenize().unwrap_err();
        assert_eq!(err.column, 4);
    }
}
