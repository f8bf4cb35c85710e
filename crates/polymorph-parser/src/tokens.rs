//! Token types shared by the schema and declaration parsers.

use std::fmt;

use crate::span::Span;

/// Tokens of the schema and TypeScript declaration languages.
///
/// Keywords are not distinguished lexically: both languages allow most
/// keywords as member names, so parsers match on identifier text instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Literals
    Identifier(&'src str),
    /// Quoted string, content without the quotes and with escapes left as-is.
    StringLiteral(&'src str),
    /// Backtick template, content without the backticks.
    TemplateLiteral(&'src str),
    NumberLiteral(&'src str),

    // Operators
    Arrow,    // =>
    Ellipsis, // ...
    AtAt,     // @@
    At,       // @
    Equals,   // =
    Colon,    // :
    Question, // ?
    Bang,     // !
    Pipe,     // |
    Ampersand, // &
    Dot,      // .
    Minus,    // -
    Plus,     // +
    Star,     // *
    Hash,     // #

    // Punctuation
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftAngle,    // <
    RightAngle,   // >
    Semicolon,    // ;
    Comma,        // ,

    // Comments
    LineComment(&'src str),  // // comment
    BlockComment(&'src str), // /* comment */

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for whitespace, newlines and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_) | Token::BlockComment(_)
        )
    }

    /// Returns `true` if this is the identifier `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Identifier(ident) if *ident == word)
    }

    /// Returns the closing token for an opening delimiter.
    pub fn closing(&self) -> Option<Token<'static>> {
        match self {
            Token::LeftBrace => Some(Token::RightBrace),
            Token::LeftParen => Some(Token::RightParen),
            Token::LeftBracket => Some(Token::RightBracket),
            Token::LeftAngle => Some(Token::RightAngle),
            _ => None,
        }
    }

    /// Returns `true` for closing delimiters.
    pub fn is_closing(&self) -> bool {
        matches!(
            self,
            Token::RightBrace | Token::RightParen | Token::RightBracket | Token::RightAngle
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "`{name}`"),
            Token::StringLiteral(s) => write!(f, "string \"{s}\""),
            Token::TemplateLiteral(_) => write!(f, "template literal"),
            Token::NumberLiteral(n) => write!(f, "number `{n}`"),
            Token::Arrow => write!(f, "`=>`"),
            Token::Ellipsis => write!(f, "`...`"),
            Token::AtAt => write!(f, "`@@`"),
            Token::At => write!(f, "`@`"),
            Token::Equals => write!(f, "`=`"),
            Token::Colon => write!(f, "`:`"),
            Token::Question => write!(f, "`?`"),
            Token::Bang => write!(f, "`!`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Ampersand => write!(f, "`&`"),
            Token::Dot => write!(f, "`.`"),
            Token::Minus => write!(f, "`-`"),
            Token::Plus => write!(f, "`+`"),
            Token::Star => write!(f, "`*`"),
            Token::Hash => write!(f, "`#`"),
            Token::LeftBrace => write!(f, "`{{`"),
            Token::RightBrace => write!(f, "`}}`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::LeftAngle => write!(f, "`<`"),
            Token::RightAngle => write!(f, "`>`"),
            Token::Semicolon => write!(f, "`;`"),
            Token::Comma => write!(f, "`,`"),
            Token::LineComment(_) | Token::BlockComment(_) => write!(f, "comment"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}
