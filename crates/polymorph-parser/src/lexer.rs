//! Lexical analyzer shared by the schema and declaration parsers.
//!
//! The lexer converts source text into a stream of [`Token`]s. It keeps
//! every byte of the input: whitespace, newlines and comments are emitted as
//! trivia tokens, so the concatenated spans of the token stream always cover
//! the source exactly. The declaration parser relies on this to compute
//! removal spans that include leading comments.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()` so the error carries its
/// code, help text and the offset where the failing construct started.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Body of a quoted string. Escapes are kept verbatim.
fn quoted_body<'a>(input: &mut Input<'a>, quote: char) -> IResult<'a, &'a str> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((
            preceded('\\', any).void(),
            none_of([quote, '\\', '\n', '\r']).void(),
        )),
    )
    .take()
    .parse_next(input)
}

/// Parse a single- or double-quoted string literal.
///
/// The token carries the content between the quotes. A string may not span
/// lines; reaching a newline before the closing quote is E001.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();
    let quote = one_of(['\'', '"']).parse_next(input)?;

    cut_err(terminated(|i: &mut Input<'a>| quoted_body(i, quote), quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add the closing quote before the end of the line"),
            start,
        })
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse the inside of a `${ ... }` placeholder up to its closing brace.
fn template_placeholder<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    repeat(
        0..,
        alt((
            ('{', template_placeholder, '}').void(),
            string_literal.void(),
            template_literal.void(),
            none_of(['{', '}', '\'', '"', '`']).void(),
        )),
    )
    .parse_next(input)
}

/// Body of a template literal: text, escapes and `${}` placeholders.
fn template_body<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((
            preceded('\\', any).void(),
            ("${", template_placeholder, '}').void(),
            terminated('$', not('{')).void(),
            none_of(['`', '\\', '$']).void(),
        )),
    )
    .take()
    .parse_next(input)
}

/// Parse a backtick template literal, including nested placeholders.
fn template_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();
    '`'.parse_next(input)?;

    cut_err(terminated(template_body, '`'))
        .context(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "unterminated template literal",
            help: Some("add closing '`'"),
            start,
        })
        .map(Token::TemplateLiteral)
        .parse_next(input)
}

/// Parse block comment `/* ... */`, including JSDoc comments.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();
    "/*".parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated block comment",
            help: Some("add closing `*/`"),
            start,
        })
        .map(Token::BlockComment)
        .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse a numeric literal.
///
/// Digits may be followed by any run of alphanumerics, `_` and `.`, which
/// covers decimals, exponents, hex/binary prefixes and bigint suffixes.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        one_of(|c: char| c.is_ascii_digit()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    )
        .take()
        .map(Token::NumberLiteral)
        .parse_next(input)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse identifiers. `$` is an identifier character, as in `$PostPayload`.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        one_of(is_identifier_start),
        take_while(0.., is_identifier_continue),
    )
        .take()
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse multi-character operators (longest first)
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("=>").value(Token::Arrow),
        literal("...").value(Token::Ellipsis),
        literal("@@").value(Token::AtAt),
    ))
    .parse_next(input)
}

/// Parse single character operators
fn operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '@'.value(Token::At),
        '='.value(Token::Equals),
        ':'.value(Token::Colon),
        '?'.value(Token::Question),
        '!'.value(Token::Bang),
        '|'.value(Token::Pipe),
        '&'.value(Token::Ampersand),
        '.'.value(Token::Dot),
        '-'.value(Token::Minus),
        '+'.value(Token::Plus),
        '*'.value(Token::Star),
        '#'.value(Token::Hash),
    ))
    .parse_next(input)
}

/// Parse delimiters and separators
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '<'.value(Token::LeftAngle),
        '>'.value(Token::RightAngle),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, carriage returns but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        block_comment,       // Must come before line comments
        line_comment,        // Must come before any single char
        string_literal,      // Quoted strings
        template_literal,    // Backtick templates
        multi_char_operator, // Must come before single char operators
        number_literal,      // Must come before identifier
        identifier,          // Must come before single chars
        operator,            // Single character operators
        punctuation,         // Delimiters and separators
        newline,             // Must come before whitespace
        whitespace,          // General whitespace
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self) {
        let mut input = LocatingSlice::new(self.source);

        while !input.is_empty() {
            let token_start = input.current_token_start();
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = self.convert_err_mode(e, error_pos);
                    let code = diagnostic.code();
                    self.diagnostics.emit(diagnostic);

                    // Unterminated comments and templates run to the end of
                    // the input; anything after them would only cascade.
                    if matches!(code, Some(ErrorCode::E003 | ErrorCode::E004)) {
                        break;
                    }
                    if error_pos == token_start && !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|_| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context
    /// is attached to the error.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let ch = self.source[error_pos..].chars().next();
        let width = ch.map_or(1, char::len_utf8);
        let span = Span::new(error_pos..error_pos + width);
        let message = match ch {
            Some(ch) => format!("unexpected character `{ch}`"),
            None => "unexpected end of input".to_string(),
        };
        Diagnostic::error(message)
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize `input`, collecting every lexical error in one pass.
///
/// On success the returned tokens cover the input without gaps, trivia
/// included.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per lexical error.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new(input);
    lexer.tokenize();
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located_input = LocatingSlice::new(input);
        let positioned = positioned_token(&mut located_input)
            .unwrap_or_else(|e| panic!("failed to lex {input:?}: {e:?}"));
        assert!(located_input.is_empty(), "trailing input for {input:?}");
        positioned.token
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .expect_err("input should fail to tokenize")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(single_token("Post"), Token::Identifier("Post"));
        assert_eq!(single_token("_private"), Token::Identifier("_private"));
        assert_eq!(single_token("$PostPayload"), Token::Identifier("$PostPayload"));
        assert_eq!(single_token("poly_aux_post"), Token::Identifier("poly_aux_post"));
        assert_eq!(single_token("Größe"), Token::Identifier("Größe"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(single_token("'Post'"), Token::StringLiteral("Post"));
        assert_eq!(single_token("\"create\""), Token::StringLiteral("create"));
        assert_eq!(single_token("''"), Token::StringLiteral(""));
        assert_eq!(single_token(r"'it\'s'"), Token::StringLiteral(r"it\'s"));
    }

    #[test]
    fn test_template_literals() {
        assert_eq!(single_token("`plain`"), Token::TemplateLiteral("plain"));
        assert_eq!(
            single_token("`${string}_${number}`"),
            Token::TemplateLiteral("${string}_${number}")
        );
        assert_eq!(
            single_token("`a${ { x: `inner` } }b`"),
            Token::TemplateLiteral("a${ { x: `inner` } }b")
        );
        assert_eq!(single_token("`cost: $5`"), Token::TemplateLiteral("cost: $5"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(single_token("// note"), Token::LineComment(" note"));
        assert_eq!(single_token("/** doc */"), Token::BlockComment("* doc "));
        assert_eq!(
            single_token("/*\n * multi\n */"),
            Token::BlockComment("\n * multi\n ")
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(single_token("42"), Token::NumberLiteral("42"));
        assert_eq!(single_token("3.14"), Token::NumberLiteral("3.14"));
        assert_eq!(single_token("0xFF"), Token::NumberLiteral("0xFF"));
        assert_eq!(single_token("10n"), Token::NumberLiteral("10n"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(single_token("=>"), Token::Arrow);
        assert_eq!(single_token("..."), Token::Ellipsis);
        assert_eq!(single_token("@@"), Token::AtAt);
        assert_eq!(single_token("@"), Token::At);
        assert_eq!(single_token("|"), Token::Pipe);
        assert_eq!(single_token("&"), Token::Ampersand);
        assert_eq!(single_token("?"), Token::Question);
    }

    #[test]
    fn test_nested_generics_close_separately() {
        assert_eq!(
            significant("Map<K, Array<V>>"),
            vec![
                Token::Identifier("Map"),
                Token::LeftAngle,
                Token::Identifier("K"),
                Token::Comma,
                Token::Identifier("Array"),
                Token::LeftAngle,
                Token::Identifier("V"),
                Token::RightAngle,
                Token::RightAngle,
            ]
        );
    }

    #[test]
    fn test_schema_attribute_tokens() {
        assert_eq!(
            significant("@@delegate(type)"),
            vec![
                Token::AtAt,
                Token::Identifier("delegate"),
                Token::LeftParen,
                Token::Identifier("type"),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_trivia_is_preserved() {
        let tokens = tokenize("a: A\n  // c\n").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Identifier("a"),
                Token::Colon,
                Token::Whitespace,
                Token::Identifier("A"),
                Token::Newline,
                Token::Whitespace,
                Token::LineComment(" c"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(error_codes("x: 'abc\ny"), vec![ErrorCode::E001]);
    }

    #[test]
    fn test_unterminated_block_comment_stops_lexing() {
        let err = tokenize("type A = B /* never closed ' \"").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E003));
        assert_eq!(err.diagnostics()[0].labels()[0].span().start(), 11);
    }

    #[test]
    fn test_unterminated_template() {
        assert_eq!(error_codes("type A = `abc"), vec![ErrorCode::E004]);
    }

    #[test]
    fn test_unexpected_characters_are_all_reported() {
        let err = tokenize("a ^ b ~ c").unwrap_err();
        let spans: Vec<_> = err
            .diagnostics()
            .iter()
            .map(|d| d.labels()[0].span())
            .collect();
        assert_eq!(spans, vec![Span::new(2..3), Span::new(6..7)]);
        assert!(
            err.diagnostics()
                .iter()
                .all(|d| d.code() == Some(ErrorCode::E002))
        );
    }

    #[test]
    fn test_unexpected_multibyte_character_span() {
        let err = tokenize("a → b").unwrap_err();
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(2..5));
    }

    proptest! {
        #[test]
        fn prop_tokens_cover_input(input in "[a-zA-Z0-9_ \n{}()<>\\[\\];:,|&?.=@'\"/*-]{0,64}") {
            if let Ok(tokens) = tokenize(&input) {
                let mut expected = 0;
                for token in &tokens {
                    prop_assert_eq!(token.span.start(), expected);
                    prop_assert!(token.span.end() > token.span.start());
                    expected = token.span.end();
                }
                prop_assert_eq!(expected, input.len());
            }
        }

        #[test]
        fn prop_never_panics(input in "\\PC{0,64}") {
            let _ = tokenize(&input);
        }
    }
}
