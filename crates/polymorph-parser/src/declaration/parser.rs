//! Parser for TypeScript declaration tokens.
//!
//! This module turns the token stream from the [`lexer`](crate::lexer) into
//! a [`DeclarationTree`]. It is a skeleton parser: declarations and members
//! are parsed structurally, while type expressions are scanned as balanced
//! token runs from which only object-type literals are extracted. The
//! entry point is [`build_tree`].
//!
//! Members and statements may end without a semicolon. A newline ends them
//! unless the token before it expects a continuation (`|`, `&`, `=>`, `:`,
//! `extends`, ...) or the token after it continues the expression (a
//! leading `|`, `?` or `:` of a multi-line union or conditional type).

use winnow::stream::{Stream, TokenSlice};

use crate::{
    cursor::{
        Context, IResult, Input, bump, closer_label, convert_error, eat, error_with, expect, expected,
        identifier, is_identifier, mismatched, peek, peek_is, peek_nth, peek_raw, skip_trivia,
        unclosed,
    },
    declaration::tree::{
        DeclarationTree, Member, MemberBlock, MemberKind, Namespace, ObjectType, OtherStatement,
        Statement, TypeAlias, TypeExpr, TypeParam,
    },
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

const STATEMENT_MODIFIERS: &[&str] = &["export", "declare", "default", "abstract"];

const MEMBER_MODIFIERS: &[&str] = &[
    "readonly",
    "public",
    "private",
    "protected",
    "static",
    "abstract",
    "declare",
    "override",
    "accessor",
    "async",
    "get",
    "set",
];

const TYPE_PARAM_MODIFIERS: &[&str] = &["const", "in", "out"];

/// Words after which a type expression always continues.
const CONTINUE_AFTER_WORDS: &[&str] = &[
    "extends", "keyof", "typeof", "infer", "is", "as", "in", "readonly", "unique", "asserts",
    "new",
];

/// Words that continue the previous line's expression.
const CONTINUE_BEFORE_WORDS: &[&str] = &["extends", "is", "as", "implements"];

/// Scanning mode for type expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Inside a member list: `,` also terminates.
    Member,
    /// At statement level: only `;`, `}` and newlines terminate.
    Statement,
}

/// Result of scanning a type expression.
#[derive(Debug, Default)]
struct Scanned {
    objects: Vec<ObjectType>,
    span: Option<Span>,
}

fn continues_after(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Pipe
            | Token::Ampersand
            | Token::Arrow
            | Token::Question
            | Token::Colon
            | Token::Equals
            | Token::Dot
            | Token::Comma
            | Token::LeftAngle
    ) || CONTINUE_AFTER_WORDS.iter().any(|word| token.is_word(word))
}

fn continues_before(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Pipe | Token::Ampersand | Token::Arrow | Token::Question | Token::Colon | Token::Dot
    ) || CONTINUE_BEFORE_WORDS.iter().any(|word| token.is_word(word))
}

/// Tokens that can start a member name.
fn starts_member_name(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::StringLiteral(_)
            | Token::NumberLiteral(_)
            | Token::LeftBracket
            | Token::Hash
    )
}

/// Consume a `;` or `,` on the same line as the preceding token.
fn eat_terminator(input: &mut Input<'_>) -> Option<Span> {
    let checkpoint = input.checkpoint();
    let trivia = skip_trivia(input);
    match peek_raw(input) {
        Some(token) if !trivia.newline && matches!(token.token, Token::Semicolon | Token::Comma) => {
            input.next_token();
            Some(token.span)
        }
        _ => {
            input.reset(&checkpoint);
            None
        }
    }
}

/// Parse a balanced group starting at an opening delimiter.
///
/// Object-type literals inside the group are collected into `objects` when
/// `collect` is set.
fn group(input: &mut Input<'_>, collect: bool, objects: &mut Vec<ObjectType>) -> IResult<Span> {
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
            Token::LeftBrace if collect => objects.push(object_type(input)?),
            Token::LeftBrace | Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                group(input, collect, objects)?;
            }
            _ => {
                input.next_token();
            }
        }
    }
}

/// Scan a type expression up to its terminator.
///
/// `started` tells whether the expression continues tokens already consumed
/// by the caller, in which case a newline can end it immediately.
fn scan(input: &mut Input<'_>, mode: Mode, collect: bool, started: bool) -> IResult<Scanned> {
    let mut scanned = Scanned::default();
    let mut last: Option<Token<'_>> = None;

    loop {
        let checkpoint = input.checkpoint();
        let trivia = skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            input.reset(&checkpoint);
            break;
        };

        let stop = match token.token {
            Token::Semicolon
            | Token::RightBrace
            | Token::RightParen
            | Token::RightBracket
            | Token::RightAngle => true,
            Token::Comma if mode == Mode::Member => true,
            _ => {
                trivia.newline
                    && (started || last.is_some())
                    && !last.as_ref().is_some_and(continues_after)
                    && !continues_before(&token.token)
            }
        };
        if stop {
            input.reset(&checkpoint);
            break;
        }

        let span = match token.token {
            Token::LeftBrace if collect => {
                let object = object_type(input)?;
                let span = object.span();
                scanned.objects.push(object);
                span
            }
            Token::LeftBrace | Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                group(input, collect, &mut scanned.objects)?
            }
            _ => {
                input.next_token();
                token.span
            }
        };
        let closed: Option<Token<'_>> = token.closing();
        last = Some(closed.unwrap_or_else(|| token.token.clone()));
        scanned.span = Some(scanned.span.map_or(span, |s| s.union(span)));
    }

    Ok(scanned)
}

/// Parse an object-type literal `{ ... }`.
fn object_type(input: &mut Input<'_>) -> IResult<ObjectType> {
    let open = expect(input, "`{`", |t| matches!(t, Token::LeftBrace))?;
    let (members, close) = members(input, open.span)?;
    Ok(ObjectType::new(members, open.span.union(close)))
}

/// Parse members up to and including the closing `}`.
fn members(input: &mut Input<'_>, open: Span) -> IResult<(Vec<Member>, Span)> {
    let mut members = Vec::new();

    loop {
        let trivia = skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Err(unclosed(open, "closing `}`"));
        };
        match token.token {
            Token::RightBrace => {
                input.next_token();
                return Ok((members, token.span));
            }
            Token::Semicolon | Token::Comma => {
                input.next_token();
            }
            Token::RightParen | Token::RightBracket | Token::RightAngle => {
                return Err(mismatched(Some(open), "closing `}`"));
            }
            _ => {
                let start = trivia.comment_start.unwrap_or(token.span.start());
                members.push(member(input, start)?);
            }
        }
    }
}

/// Parse a single member. `start` is where its removal span begins.
fn member(input: &mut Input<'_>, start: usize) -> IResult<Member> {
    while let Some(token) = peek(input) {
        let is_modifier = match &token.token {
            Token::Plus | Token::Minus => peek_nth(input, 1).is_some_and(|t| t.is_word("readonly")),
            Token::Identifier(word) => {
                MEMBER_MODIFIERS.contains(word)
                    && peek_nth(input, 1).is_some_and(|t| starts_member_name(&t.token))
            }
            _ => false,
        };
        if !is_modifier {
            break;
        }
        bump(input);
    }

    let Some(head) = peek(input) else {
        return Err(expected("member"));
    };
    let mut end = head.span.end();

    let (mut kind, name) = match &head.token {
        Token::LeftParen | Token::LeftAngle => (MemberKind::CallSignature, None),
        Token::Identifier("new")
            if peek_nth(input, 1)
                .is_some_and(|t| matches!(t.token, Token::LeftParen | Token::LeftAngle)) =>
        {
            bump(input);
            (MemberKind::ConstructSignature, None)
        }
        Token::LeftBracket => {
            end = group(input, false, &mut Vec::new())?.end();
            if peek_is(input, |t| matches!(t, Token::LeftParen | Token::LeftAngle)) {
                (MemberKind::Method, None)
            } else {
                (MemberKind::Index, None)
            }
        }
        Token::Hash => {
            bump(input);
            let name = identifier(input, "private member name")?;
            end = name.span().end();
            let span = head.span.union(name.span());
            (MemberKind::Property, Some(Spanned::new(format!("#{name}"), span)))
        }
        Token::Identifier(name) | Token::StringLiteral(name) | Token::NumberLiteral(name) => {
            bump(input);
            (MemberKind::Property, Some(Spanned::new(name.to_string(), head.span)))
        }
        _ => return Err(expected("member name")),
    };

    let mut optional = false;
    if let Some(marker) = eat(input, |t| matches!(t, Token::Question | Token::Bang)) {
        optional = marker.token == Token::Question;
        end = marker.span.end();
    } else if peek_is(input, |t| matches!(t, Token::Plus | Token::Minus))
        && peek_nth(input, 1).is_some_and(|t| t.token == Token::Question)
    {
        let sign = bump(input);
        optional = sign.is_some_and(|t| t.token == Token::Plus);
        end = bump(input).map_or(end, |t| t.span.end());
    }

    if kind == MemberKind::Property
        && peek_is(input, |t| matches!(t, Token::LeftParen | Token::LeftAngle))
    {
        kind = MemberKind::Method;
    }

    let started = !matches!(
        kind,
        MemberKind::CallSignature | MemberKind::ConstructSignature
    );
    let tail = scan(input, Mode::Member, true, started)?;
    if let Some(span) = tail.span {
        end = end.max(span.end());
    }
    if let Some(separator) = eat_terminator(input) {
        end = separator.end();
    }

    Ok(Member::new(kind, name, Span::new(start..end))
        .with_optional(optional)
        .with_objects(tail.objects))
}

/// Parse an optional generic parameter list `<A, B extends C = D>`.
fn type_params(input: &mut Input<'_>) -> IResult<Vec<TypeParam>> {
    let Some(open) = eat(input, |t| matches!(t, Token::LeftAngle)) else {
        return Ok(Vec::new());
    };
    let mut params = Vec::new();

    loop {
        if eat(input, |t| matches!(t, Token::RightAngle)).is_some() {
            return Ok(params);
        }
        while peek(input).is_some_and(|t| TYPE_PARAM_MODIFIERS.iter().any(|m| t.is_word(m)))
            && is_identifier(peek_nth(input, 1))
        {
            bump(input);
        }

        let name = identifier(input, "type parameter")?;
        let mut end = name.span().end();
        loop {
            skip_trivia(input);
            let Some(token) = peek_raw(input) else {
                return Err(unclosed(open.span, "closing `>`"));
            };
            match token.token {
                Token::Comma => {
                    input.next_token();
                    break;
                }
                Token::RightAngle => break,
                Token::LeftBrace | Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                    end = group(input, false, &mut Vec::new())?.end();
                }
                Token::RightBrace | Token::RightParen | Token::RightBracket => {
                    return Err(mismatched(Some(open.span), "closing `>`"));
                }
                _ => {
                    input.next_token();
                    end = token.span.end();
                }
            }
        }

        let span = Span::new(name.span().start()..end);
        params.push(TypeParam::new(name, span));
    }
}

fn type_alias(input: &mut Input<'_>, start: usize) -> IResult<TypeAlias> {
    bump(input);
    let name = identifier(input, "type alias name")?;
    let type_params = type_params(input)?;
    expect(input, "`=`", |t| matches!(t, Token::Equals))?;

    let scanned = scan(input, Mode::Statement, true, false)?;
    let Some(ty_span) = scanned.span else {
        return Err(expected("type"));
    };
    let end = eat_terminator(input).map_or(ty_span.end(), |s| s.end());

    Ok(TypeAlias::new(
        name,
        type_params,
        TypeExpr::new(scanned.objects, ty_span),
        Span::new(start..end),
    ))
}

/// Parse an interface or class declaration.
fn member_block(input: &mut Input<'_>, start: usize) -> IResult<MemberBlock> {
    bump(input);
    let name = identifier(input, "declaration name")?;
    let type_params = type_params(input)?;

    // Heritage clauses run up to the body.
    loop {
        skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Err(error_with([
                Context::Code(ErrorCode::E101),
                Context::Label("`{`"),
            ]));
        };
        match token.token {
            Token::LeftBrace => break,
            Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                group(input, false, &mut Vec::new())?;
            }
            Token::Semicolon
            | Token::RightBrace
            | Token::RightParen
            | Token::RightBracket
            | Token::RightAngle => return Err(expected("`{`")),
            _ => {
                input.next_token();
            }
        }
    }

    let open = expect(input, "`{`", |t| matches!(t, Token::LeftBrace))?;
    let (members, close) = members(input, open.span)?;
    Ok(MemberBlock::new(
        name,
        type_params,
        members,
        Span::new(start..close.end()),
    ))
}

/// Parse `namespace A.B { }`, `module 'x' { }` or `global { }`.
///
/// Body-less forms such as `declare module 'x';` become other statements.
fn namespace(input: &mut Input<'_>, start: usize) -> IResult<Statement> {
    let Some(keyword) = bump(input) else {
        return Err(expected("namespace"));
    };

    let name = if keyword.is_word("global") {
        Spanned::new("global".to_string(), keyword.span)
    } else if let Some(token) = eat(input, |t| matches!(t, Token::StringLiteral(_))) {
        let Token::StringLiteral(name) = token.token else {
            return Err(expected("module name"));
        };
        Spanned::new(name.to_string(), token.span)
    } else {
        let first = identifier(input, "namespace name")?;
        let mut name = first.inner().clone();
        let mut span = first.span();
        while peek_is(input, |t| matches!(t, Token::Dot)) && is_identifier(peek_nth(input, 1)) {
            bump(input);
            let part = identifier(input, "namespace name")?;
            name.push('.');
            name.push_str(part.inner());
            span = span.union(part.span());
        }
        Spanned::new(name, span)
    };

    if !peek_is(input, |t| matches!(t, Token::LeftBrace)) {
        let scanned = scan(input, Mode::Statement, false, true)?;
        let end = scanned.span.map_or(name.span().end(), |s| s.end());
        let end = eat_terminator(input).map_or(end, |s| s.end());
        return Ok(Statement::Other(OtherStatement::new(
            scanned.objects,
            Span::new(start..end),
        )));
    }

    let open = expect(input, "`{`", |t| matches!(t, Token::LeftBrace))?;
    let statements = statements(input, Some(open.span))?;
    let close = expect(input, "closing `}`", |t| matches!(t, Token::RightBrace))?;

    Ok(Statement::Namespace(Namespace::new(
        name,
        statements,
        Span::new(start..close.span.end()),
    )))
}

/// Parse a statement the tree does not model, keeping its object literals
/// when `collect` is set.
fn other_statement(input: &mut Input<'_>, start: usize, collect: bool) -> IResult<OtherStatement> {
    let scanned = scan(input, Mode::Statement, collect, false)?;
    let end = scanned.span.map_or(start, |s| s.end());
    let end = eat_terminator(input).map_or(end, |s| s.end());
    Ok(OtherStatement::new(scanned.objects, Span::new(start..end)))
}

fn statement(input: &mut Input<'_>) -> IResult<Statement> {
    let Some(first) = peek(input) else {
        return Err(expected("statement"));
    };
    let start = first.span.start();

    while peek(input)
        .is_some_and(|t| STATEMENT_MODIFIERS.iter().any(|m| t.is_word(m)))
        && is_identifier(peek_nth(input, 1))
    {
        bump(input);
    }

    let keyword = peek(input);
    let next = peek_nth(input, 1);
    let is_word = |word: &str| keyword.is_some_and(|t| t.is_word(word));

    if is_word("type")
        && is_identifier(next)
        && peek_nth(input, 2).is_some_and(|t| matches!(t.token, Token::LeftAngle | Token::Equals))
    {
        return type_alias(input, start).map(Statement::TypeAlias);
    }
    if is_word("interface") && is_identifier(next) {
        return member_block(input, start).map(Statement::Interface);
    }
    if is_word("class") && is_identifier(next) {
        return member_block(input, start).map(Statement::Class);
    }
    if ((is_word("namespace") || is_word("module"))
        && next.is_some_and(|t| matches!(t.token, Token::Identifier(_) | Token::StringLiteral(_))))
        || (is_word("global") && next.is_some_and(|t| t.token == Token::LeftBrace))
    {
        return namespace(input, start);
    }

    let collect = ["const", "let", "var", "function"]
        .iter()
        .any(|word| is_word(word))
        && !next.is_some_and(|t| t.is_word("enum"));
    other_statement(input, start, collect).map(Statement::Other)
}

/// Parse statements until end of input, or until the `}` closing the block
/// opened at `open`.
fn statements(input: &mut Input<'_>, open: Option<Span>) -> IResult<Vec<Statement>> {
    let mut statements = Vec::new();

    loop {
        skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return match open {
                Some(open) => Err(unclosed(open, "closing `}`")),
                None => Ok(statements),
            };
        };
        match token.token {
            Token::RightBrace if open.is_some() => return Ok(statements),
            Token::Semicolon => {
                input.next_token();
            }
            Token::RightBrace | Token::RightParen | Token::RightBracket | Token::RightAngle => {
                return Err(mismatched(open, "statement"));
            }
            _ => statements.push(statement(input)?),
        }
    }
}

/// Build a declaration tree from tokens.
///
/// # Errors
///
/// Returns a diagnostic for the first syntax error.
pub(crate) fn build_tree<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<DeclarationTree, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match statements(&mut token_slice, None) {
        Ok(statements) => {
            let span = tokens
                .first()
                .and_then(|f| tokens.last().map(|l| f.span.union(l.span)))
                .unwrap_or_default();
            Ok(DeclarationTree::new(statements, span))
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
