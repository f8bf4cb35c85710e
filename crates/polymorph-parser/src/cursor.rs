//! Token cursor shared by the schema and declaration parsers.
//!
//! Both parsers walk a [`TokenSlice`] that still contains trivia, because
//! newlines terminate schema fields and semicolon-less declaration members.
//! The helpers here peek and consume significant tokens while reporting the
//! trivia they skipped, and build the winnow errors the parsers return.

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected at the error position
    Label(&'static str),
    /// Error code overriding the default E100
    Code(ErrorCode),
    /// Span of the delimiter left open when the error occurred
    OpenedAt(Span),
}

pub(crate) type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
pub(crate) type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Trivia skipped in front of a token.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Trivia {
    pub newline: bool,
    /// Start of the first comment that begins a line and is not separated
    /// from the token by a blank line.
    pub comment_start: Option<usize>,
}

pub(crate) fn error_with(contexts: impl IntoIterator<Item = Context>) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    for context in contexts {
        e.push(context);
    }
    ErrMode::Cut(e)
}

pub(crate) fn expected(label: &'static str) -> ErrMode<ContextError<Context>> {
    error_with([Context::Label(label)])
}

pub(crate) fn unclosed(open: Span, closer: &'static str) -> ErrMode<ContextError<Context>> {
    error_with([
        Context::Code(ErrorCode::E101),
        Context::Label(closer),
        Context::OpenedAt(open),
    ])
}

pub(crate) fn mismatched(open: Option<Span>, closer: &'static str) -> ErrMode<ContextError<Context>> {
    let mut contexts = vec![Context::Code(ErrorCode::E102), Context::Label(closer)];
    contexts.extend(open.map(Context::OpenedAt));
    error_with(contexts)
}

pub(crate) fn closer_label(open: &Token<'_>) -> &'static str {
    match open {
        Token::LeftParen => "closing `)`",
        Token::LeftBracket => "closing `]`",
        Token::LeftAngle => "closing `>`",
        _ => "closing `}`",
    }
}

pub(crate) fn is_identifier(token: Option<&PositionedToken<'_>>) -> bool {
    token.is_some_and(|t| matches!(t.token, Token::Identifier(_)))
}

/// Skip whitespace, newlines and comments.
pub(crate) fn skip_trivia(input: &mut Input<'_>) -> Trivia {
    let mut trivia = Trivia::default();
    let mut blank_line = false;

    loop {
        let checkpoint = input.checkpoint();
        match input.next_token() {
            Some(token) if token.is_trivia() => match token.token {
                Token::Newline => {
                    if blank_line {
                        trivia.comment_start = None;
                    }
                    blank_line = true;
                    trivia.newline = true;
                }
                Token::LineComment(_) | Token::BlockComment(_) => {
                    blank_line = false;
                    if trivia.newline && trivia.comment_start.is_none() {
                        trivia.comment_start = Some(token.span.start());
                    }
                }
                _ => {}
            },
            _ => {
                input.reset(&checkpoint);
                return trivia;
            }
        }
    }
}

/// Peek at the next raw token without consuming it.
pub(crate) fn peek_raw<'src>(input: &mut Input<'src>) -> Option<&'src PositionedToken<'src>> {
    let checkpoint = input.checkpoint();
    let token = input.next_token();
    input.reset(&checkpoint);
    token
}

/// Peek at the `n`th significant token (0-based) without consuming anything.
pub(crate) fn peek_nth<'src>(input: &mut Input<'src>, n: usize) -> Option<&'src PositionedToken<'src>> {
    let checkpoint = input.checkpoint();
    let mut found = None;
    for _ in 0..=n {
        skip_trivia(input);
        found = input.next_token();
        if found.is_none() {
            break;
        }
    }
    input.reset(&checkpoint);
    found
}

pub(crate) fn peek<'src>(input: &mut Input<'src>) -> Option<&'src PositionedToken<'src>> {
    peek_nth(input, 0)
}

pub(crate) fn peek_is(input: &mut Input<'_>, pred: impl Fn(&Token<'_>) -> bool) -> bool {
    peek(input).is_some_and(|token| pred(&token.token))
}

/// Consume the next significant token.
pub(crate) fn bump<'src>(input: &mut Input<'src>) -> Option<&'src PositionedToken<'src>> {
    skip_trivia(input);
    input.next_token()
}

pub(crate) fn eat<'src>(
    input: &mut Input<'src>,
    pred: impl Fn(&Token<'_>) -> bool,
) -> Option<&'src PositionedToken<'src>> {
    if peek_is(input, pred) {
        bump(input)
    } else {
        None
    }
}

pub(crate) fn expect<'src>(
    input: &mut Input<'src>,
    label: &'static str,
    pred: impl Fn(&Token<'_>) -> bool,
) -> IResult<&'src PositionedToken<'src>> {
    skip_trivia(input);
    let result: IResult<&'src PositionedToken<'src>> = any
        .verify(|token: &PositionedToken<'_>| pred(&token.token))
        .parse_next(input);
    result.map_err(|_| expected(label))
}

/// Parse an identifier with span preservation
pub(crate) fn identifier(input: &mut Input<'_>, label: &'static str) -> IResult<Spanned<String>> {
    skip_trivia(input);
    let result: IResult<Spanned<String>> = any
        .verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
            _ => None,
        })
        .parse_next(input);
    result.map_err(|_| expected(label))
}

/// Skip whitespace and comments up to, but not including, the next newline.
pub(crate) fn skip_inline_trivia(input: &mut Input<'_>) {
    loop {
        let checkpoint = input.checkpoint();
        match input.next_token() {
            Some(token) if token.is_trivia() && token.token != Token::Newline => {}
            _ => {
                input.reset(&checkpoint);
                return;
            }
        }
    }
}

/// Skip a balanced group starting at an opening delimiter and return its span.
pub(crate) fn skip_group(input: &mut Input<'_>) -> IResult<Span> {
    let Some(open) = bump(input) else {
        return Err(expected("opening delimiter"));
    };
    let closer: Option<Token<'_>> = open.closing();
    let label = closer_label(&open.token);

    loop {
        skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Err(unclosed(open.span, label));
        };
        match &token.token {
            t if Some(t) == closer.as_ref() => {
                input.next_token();
                return Ok(open.span.union(token.span));
            }
            t if t.is_closing() => return Err(mismatched(Some(open.span), label)),
            Token::LeftBrace | Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                skip_group(input)?;
            }
            _ => {
                input.next_token();
            }
        }
    }
}

/// Convert a parser error into a diagnostic pointing at the offending token.
///
/// `current_remaining` is the number of tokens left when parsing stopped.
pub(crate) fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let contexts: Vec<Context> = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().cloned().collect(),
        ErrMode::Incomplete(_) => Vec::new(),
    };

    let position = tokens.len().saturating_sub(current_remaining);
    let found = tokens
        .get(position..)
        .and_then(|rest| rest.iter().find(|t| !t.is_trivia()));
    let end_of_input = tokens.last().map_or(0, |t| t.span.end());

    let code = contexts
        .iter()
        .find_map(|ctx| match ctx {
            Context::Code(code) => Some(*code),
            _ => None,
        })
        .unwrap_or(if found.is_some() {
            ErrorCode::E100
        } else {
            ErrorCode::E101
        });
    let expectation = contexts.iter().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        _ => None,
    });

    let (span, found_text) = match found {
        Some(token) => (token.span, token.token.to_string()),
        None => (
            Span::new(end_of_input..end_of_input),
            "end of input".to_string(),
        ),
    };

    let message = match (code, expectation) {
        (ErrorCode::E102, Some(label)) => format!("unbalanced delimiter {found_text}, expected {label}"),
        (_, Some(label)) => format!("unexpected {found_text}, expected {label}"),
        (_, None) => format!("unexpected {found_text}"),
    };

    let mut diagnostic = Diagnostic::error(message)
        .with_code(code)
        .with_label(span, code.description());
    for ctx in &contexts {
        if let Context::OpenedAt(open) = ctx {
            diagnostic = diagnostic.with_secondary_label(*open, "opened here");
        }
    }
    if code == ErrorCode::E101 {
        diagnostic = diagnostic.with_help("the input ends before this construct is complete");
    }
    diagnostic
}
