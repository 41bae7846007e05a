//! KCQL Lexer - Tokenization using logos
//!
//! Handles KCQL's loose naming rules:
//! - keywords match regardless of case (`insert`, `INSERT`, `Insert`)
//! - bare names may contain `-`, `+`, `/`, `:`, `@` and start with digits
//! - names can be escaped with backticks or single quotes
//! - numbers are plain words; their validation belongs to the builder

mod token;

pub use token::*;

use kcql_ast::Span;
use logos::Logos;

/// Tokenize a statement into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// Strip one matching pair of backticks or single quotes
pub fn unescape(text: &str) -> &str {
    for quote in ['`', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// A token with its span
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    /// Token text with quoting removed
    pub fn value<'a>(&self, source: &'a str) -> &'a str {
        match self.kind {
            TokenKind::Backtick | TokenKind::Quoted => unescape(self.text(source)),
            _ => self.text(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_statement() {
        let tokens = kinds("INSERT INTO t SELECT * FROM s");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Insert,
                TokenKind::Into,
                TokenKind::Word,
                TokenKind::Select,
                TokenKind::Star,
                TokenKind::From,
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_ignore_case() {
        assert_eq!(kinds("upsert")[0], TokenKind::Upsert);
        assert_eq!(kinds("UpSeRt")[0], TokenKind::Upsert);
        assert_eq!(kinds("with_flush_count")[0], TokenKind::WithFlushCount);
        assert_eq!(kinds("WITHTAGS")[0], TokenKind::WithTags);
    }

    #[test]
    fn test_keyword_prefix_is_a_word() {
        assert_eq!(kinds("assets")[0], TokenKind::Word);
        assert_eq!(kinds("pkey")[0], TokenKind::Word);
    }

    #[test]
    fn test_loose_names_are_single_words() {
        for name in ["TOPIC-A", "TOPIC+A", "/TOPIC_A", "namespace1:TABLE_A", "@col1", "1col2", "%s"] {
            let tokens = tokenize(name);
            assert_eq!(tokens.len(), 2, "{} should be one token", name);
            assert_eq!(tokens[0].kind, TokenKind::Word);
            assert_eq!(tokens[0].text(name), name);
        }
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(
            kinds("a.b.*"),
            vec![
                TokenKind::Word,
                TokenKind::Dot,
                TokenKind::Word,
                TokenKind::Dot,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_values() {
        let source = "`apples > 10` '|'";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Backtick);
        assert_eq!(tokens[0].value(source), "apples > 10");
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
        assert_eq!(tokens[1].value(source), "|");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert_eq!(kinds("`abc")[0], TokenKind::Error);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("`TOPIC.A`"), "TOPIC.A");
        assert_eq!(unescape("'x'"), "x");
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("`"), "`");
    }
}
