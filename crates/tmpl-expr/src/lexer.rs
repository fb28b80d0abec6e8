//! Expression lexer using logos.
//!
//! The lexer only needs enough structure to find construct boundaries:
//! delimiters, the control-flow keywords and string literals (so that
//! delimiters inside strings are not counted). Everything else collapses
//! into identifiers, numbers and punctuation runs, which is also how markup
//! inside branch bodies gets lexed.

use logos::Logos;
use source_map::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the expression text.
    pub span: Span,
}

/// Token kinds of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `|`
    #[token("|")]
    Pipe,

    /// `,`
    #[token(",")]
    Comma,

    /// `:`
    #[token(":")]
    Colon,

    /// `=>`
    #[token("=>")]
    FatArrow,

    /// `=`
    #[token("=")]
    Eq,

    /// `if`
    #[token("if")]
    If,

    /// `else`
    #[token("else")]
    Else,

    /// `for`
    #[token("for")]
    For,

    /// `while`
    #[token("while")]
    While,

    /// `switch`
    #[token("switch")]
    Switch,

    /// A double-quoted string literal.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    /// A character literal such as `'a'` or `'\n'`.
    #[regex(r"'([^'\\\n]|\\.)'")]
    Char,

    /// An identifier.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// A number literal.
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    /// Any other run of punctuation (operators, `.`, `<`, `/`, ...).
    #[regex(r#"[^ \t\r\n\fA-Za-z0-9_(){}\[\]|,:="]+"#)]
    Punct,
}

impl TokenKind {
    /// Returns true for `(`, `{` and `[`.
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket
        )
    }

    /// Returns true for `)`, `}` and `]`.
    #[inline]
    pub fn is_close(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket
        )
    }
}

/// A lexer over one expression's text.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given text.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    /// `Err` carries the span of text no token matches.
    type Item = Result<Token, Span>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let range = self.inner.span();
        let span = Span::from_usize(range.start, range.end);
        Some(match result {
            Ok(kind) => Ok(Token { kind, span }),
            Err(()) => Err(span),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn test_if_header() {
        assert_eq!(
            kinds("{if (user.admin) |a| (<b>hi</b>)}"),
            vec![
                TokenKind::LBrace,
                TokenKind::If,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Pipe,
                TokenKind::Ident,
                TokenKind::Pipe,
                TokenKind::LParen,
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::RParen,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(kinds("iffy"), vec![TokenKind::Ident]);
        assert_eq!(kinds("switcher"), vec![TokenKind::Ident]);
        assert_eq!(kinds("for"), vec![TokenKind::For]);
    }

    #[test]
    fn test_strings_hide_delimiters() {
        assert_eq!(
            kinds(r#"("a)b" ')')"#),
            vec![
                TokenKind::LParen,
                TokenKind::String,
                TokenKind::Char,
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn test_apostrophe_in_markup_is_punctuation() {
        assert_eq!(
            kinds("don't"),
            vec![TokenKind::Ident, TokenKind::Punct, TokenKind::Ident]
        );
    }

    #[test]
    fn test_fat_arrow_and_eq() {
        assert_eq!(
            kinds(".a => x = 1"),
            vec![
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::FatArrow,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let tokens: Vec<_> = Lexer::new("\"abc").collect();
        assert!(tokens.iter().any(|t| t.is_err()));
    }
}
