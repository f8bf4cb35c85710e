//! Parser for schema tokens.
//!
//! Fields and attributes are line oriented: a field ends at the newline
//! after its last attribute. Top-level blocks other than models
//! (`datasource`, `generator`, `enum`, `plugin`, ...) are skipped as
//! balanced token runs, and `import` lines are ignored.

use winnow::stream::{Stream, TokenSlice};

use crate::{
    cursor::{
        IResult, Input, bump, convert_error, eat, expect, expected, identifier, mismatched,
        peek, peek_nth, peek_raw, skip_group, skip_inline_trivia, skip_trivia, unclosed,
    },
    error::Diagnostic,
    schema::types::{AttributeDecl, FieldDecl, ModelDecl, SchemaFile},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

fn is_model_start(input: &mut Input<'_>) -> bool {
    let Some(first) = peek(input) else {
        return false;
    };
    first.is_word("model")
        || (first.is_word("abstract") && peek_nth(input, 1).is_some_and(|t| t.is_word("model")))
}

/// Skip the rest of the current line.
fn skip_line(input: &mut Input<'_>) {
    bump(input);
    while peek_raw(input).is_some_and(|t| t.token != Token::Newline) {
        input.next_token();
    }
}

/// Skip a top-level block such as `datasource db { ... }`.
///
/// Declarations without a body (`attribute @@foo(...)`) end at the newline.
fn skip_block(input: &mut Input<'_>) -> IResult<()> {
    bump(input);
    loop {
        skip_inline_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Ok(());
        };
        match token.token {
            Token::Newline => return Ok(()),
            Token::LeftBrace => {
                skip_group(input)?;
                return Ok(());
            }
            Token::LeftParen | Token::LeftBracket | Token::LeftAngle => {
                skip_group(input)?;
            }
            Token::RightBrace | Token::RightParen | Token::RightBracket | Token::RightAngle => {
                return Err(mismatched(None, "declaration"));
            }
            _ => {
                input.next_token();
            }
        }
    }
}

/// Parse `@name`, `@@name`, `@db.VarChar(255)`.
fn attribute(input: &mut Input<'_>) -> IResult<AttributeDecl> {
    let Some(sigil) = bump(input) else {
        return Err(expected("attribute"));
    };
    let sigil_text = match sigil.token {
        Token::AtAt => "@@",
        _ => "@",
    };

    let first = identifier(input, "attribute name")?;
    let mut name = format!("{sigil_text}{}", first.inner());
    let mut span = sigil.span.union(first.span());

    while peek_raw(input).is_some_and(|t| t.token == Token::Dot) {
        input.next_token();
        let part = identifier(input, "attribute name")?;
        name.push('.');
        name.push_str(part.inner());
        span = span.union(part.span());
    }

    let args = if peek_raw(input).is_some_and(|t| t.token == Token::LeftParen) {
        let group = skip_group(input)?;
        span = span.union(group);
        Some(Span::new(group.start() + 1..group.end() - 1))
    } else {
        None
    };

    Ok(AttributeDecl {
        name: Spanned::new(name, span),
        args,
    })
}

fn field(input: &mut Input<'_>) -> IResult<FieldDecl> {
    let name = identifier(input, "field name")?;

    skip_inline_trivia(input);
    if !peek_raw(input).is_some_and(|t| matches!(t.token, Token::Identifier(_))) {
        return Err(expected("field type"));
    }
    let type_name = identifier(input, "field type")?;

    if peek_raw(input).is_some_and(|t| t.token == Token::LeftParen) {
        skip_group(input)?;
    }

    let mut is_array = false;
    if peek_raw(input).is_some_and(|t| t.token == Token::LeftBracket) {
        input.next_token();
        expect(input, "`]`", |t| matches!(t, Token::RightBracket))?;
        is_array = true;
    }
    let is_optional = peek_raw(input).is_some_and(|t| t.token == Token::Question);
    if is_optional {
        input.next_token();
    }

    let mut attributes = Vec::new();
    loop {
        skip_inline_trivia(input);
        match peek_raw(input).map(|t| &t.token) {
            Some(Token::At) => attributes.push(attribute(input)?),
            None | Some(Token::Newline | Token::RightBrace) => break,
            Some(_) => return Err(expected("field attribute or end of line")),
        }
    }

    Ok(FieldDecl {
        name,
        type_name,
        is_array,
        is_optional,
        attributes,
    })
}

fn model(input: &mut Input<'_>) -> IResult<ModelDecl> {
    let start = peek(input).map_or(0, |t| t.span.start());
    let is_abstract = eat(input, |t| t.is_word("abstract")).is_some();
    expect(input, "`model`", |t| t.is_word("model"))?;
    let name = identifier(input, "model name")?;

    let mut super_types = Vec::new();
    if eat(input, |t| t.is_word("extends")).is_some() {
        loop {
            super_types.push(identifier(input, "super model name")?);
            if eat(input, |t| matches!(t, Token::Comma)).is_none() {
                break;
            }
        }
    }

    let open = expect(input, "`{`", |t| matches!(t, Token::LeftBrace))?;
    let mut fields = Vec::new();
    let mut attributes = Vec::new();

    let close = loop {
        skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Err(unclosed(open.span, "closing `}`"));
        };
        match token.token {
            Token::RightBrace => {
                input.next_token();
                break token.span;
            }
            Token::AtAt => attributes.push(attribute(input)?),
            Token::Identifier(_) => fields.push(field(input)?),
            _ => return Err(expected("field or model attribute")),
        }
    };

    Ok(ModelDecl {
        is_abstract,
        name,
        super_types,
        fields,
        attributes,
        span: Span::new(start..close.end()),
    })
}

fn schema_file(input: &mut Input<'_>) -> IResult<SchemaFile> {
    let mut models = Vec::new();

    loop {
        skip_trivia(input);
        let Some(token) = peek_raw(input) else {
            return Ok(SchemaFile { models });
        };

        if is_model_start(input) {
            models.push(model(input)?);
        } else if token.is_word("import") {
            skip_line(input);
        } else if matches!(token.token, Token::Identifier(_)) {
            skip_block(input)?;
        } else {
            return Err(expected("declaration"));
        }
    }
}

/// Build the schema syntax tree from tokens.
pub(crate) fn build_schema<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<SchemaFile, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    schema_file(&mut token_slice).map_err(|e| {
        let current_remaining = token_slice.eof_offset();
        convert_error(e, tokens, current_remaining)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, lexer};

    fn parse(source: &str) -> SchemaFile {
        let tokens = lexer::tokenize(source).expect("schema should tokenize");
        build_schema(&tokens).expect("schema should parse")
    }

    fn parse_err(source: &str) -> Diagnostic {
        let tokens = lexer::tokenize(source).expect("schema should tokenize");
        build_schema(&tokens).expect_err("schema should not parse")
    }

    #[test]
    fn test_model_with_fields_and_attributes() {
        let source = r#"
model Activity {
    id        Int      @id @default(autoincrement())
    createdAt DateTime @default(now())
    tags      String[]
    note      String?
    type      String

    @@delegate(type)
}
"#;
        let file = parse(source);
        assert_eq!(file.models.len(), 1);

        let activity = &file.models[0];
        assert_eq!(activity.name.inner(), "Activity");
        assert!(!activity.is_abstract);
        assert_eq!(activity.fields.len(), 5);

        let id = &activity.fields[0];
        assert_eq!(id.type_name.inner(), "Int");
        let names: Vec<_> = id.attributes.iter().map(|a| a.name.inner().as_str()).collect();
        assert_eq!(names, vec!["@id", "@default"]);
        let default_args = id.attributes[1].args.expect("arguments");
        assert_eq!(default_args.text(source), "autoincrement()");

        assert!(activity.fields[2].is_array);
        assert!(activity.fields[3].is_optional);

        let delegate = &activity.attributes[0];
        assert_eq!(delegate.name.inner(), "@@delegate");
        assert_eq!(delegate.args.map(|s| s.text(source)), Some("type"));
    }

    #[test]
    fn test_extends_list() {
        let file = parse("abstract model Base {\n id Int\n}\nmodel Post extends Activity, Base {\n title String\n}\n");
        assert!(file.models[0].is_abstract);

        let supers: Vec<_> = file.models[1]
            .super_types
            .iter()
            .map(|s| s.inner().as_str())
            .collect();
        assert_eq!(supers, vec!["Activity", "Base"]);
    }

    #[test]
    fn test_other_blocks_are_skipped() {
        let source = r#"
import "base"

datasource db {
    provider = "sqlite"
    url      = env("DATABASE_URL")
}

generator client {
    provider = "prisma-client-js"
}

enum Role {
    USER
    ADMIN
}

attribute @@meta(_ name: String)

model User {
    id   Int  @id
    role Role @default(USER)
}
"#;
        let file = parse(source);
        assert_eq!(file.models.len(), 1);
        assert_eq!(file.models[0].name.inner(), "User");
    }

    #[test]
    fn test_dotted_attribute_and_type_arguments() {
        let source = "model Doc {\n  body String @db.VarChar(255)\n  raw Unsupported(\"xml\")?\n}\n";
        let file = parse(source);
        let body = &file.models[0].fields[0];
        assert_eq!(body.attributes[0].name.inner(), "@db.VarChar");
        let raw = &file.models[0].fields[1];
        assert_eq!(raw.type_name.inner(), "Unsupported");
        assert!(raw.is_optional);
    }

    #[test]
    fn test_comments_are_ignored() {
        let source = "/// A user\nmodel User { // trailing\n  id Int @id // primary key\n}\n";
        let file = parse(source);
        assert_eq!(file.models[0].fields.len(), 1);
    }

    #[test]
    fn test_unclosed_model() {
        let diag = parse_err("model User {\n  id Int\n");
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_field_without_type() {
        let diag = parse_err("model User {\n  id\n}\n");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("field type"), "{}", diag.message());
    }

    #[test]
    fn test_garbage_on_field_line() {
        let diag = parse_err("model User {\n  id Int = 5\n}\n");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }
}
