use polymorph_core::delegate::{DelegateGraph, EmptyDelegatePolicy};
use polymorph_parser::{
    SchemaConfig,
    declaration::Statement,
    error::{ErrorCode, Severity},
    parse_declarations, parse_schema, parse_schema_with_warnings,
};

fn codes(source: &str, config: SchemaConfig) -> Vec<ErrorCode> {
    let err = parse_schema(source, config).expect_err("schema should be rejected");
    err.diagnostics()
        .iter()
        .filter_map(|diagnostic| diagnostic.code())
        .collect()
}

#[test]
fn test_delegate_schema() {
    let source = r#"
        datasource db {
            provider = "sqlite"
        }

        model Activity {
            id            Int    @id
            delegatedType String
            @@delegate(delegatedType)
        }

        model Post extends Activity {
            title String
        }

        model Comment extends Activity {
            body String?
        }
    "#;

    let model = parse_schema(source, SchemaConfig::default()).expect("Failed to parse");
    assert_eq!(model.entities().len(), 3);

    let activity = model.entity("Activity").unwrap();
    assert!(activity.is_delegate());
    assert_eq!(activity.discriminator_field(), Some("delegatedType"));

    let graph = DelegateGraph::build(&model);
    let subtypes: Vec<&str> = graph
        .subtypes("Activity")
        .unwrap()
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(subtypes, vec!["Post", "Comment"]);
}

#[test]
fn test_field_shapes_survive_elaboration() {
    let source = "model Doc {\n  tags String[]\n  note String? @default(\"\")\n}\n";
    let model = parse_schema(source, SchemaConfig::default()).unwrap();
    let fields = model.entity("Doc").unwrap().fields();

    assert!(fields[0].is_array());
    assert!(fields[1].is_optional());
    assert_eq!(fields[1].attributes()[0].name(), "@default");
    assert_eq!(fields[1].attributes()[0].args(), Some("\"\""));
}

#[test]
fn test_undefined_super_entity() {
    let codes = codes(
        "model Post extends Activity {\n  id Int\n}\n",
        SchemaConfig::default(),
    );
    assert_eq!(codes, vec![ErrorCode::E200]);
}

#[test]
fn test_duplicate_entity() {
    let source = "model Post {\n  id Int\n}\nmodel Post {\n  id Int\n}\n";
    let err = parse_schema(source, SchemaConfig::default()).unwrap_err();
    let diagnostic = &err.diagnostics()[0];

    assert_eq!(diagnostic.code(), Some(ErrorCode::E201));
    assert_eq!(diagnostic.labels().len(), 2);
    assert!(!diagnostic.labels()[1].is_primary());
}

#[test]
fn test_all_naming_errors_are_reported_together() {
    let source = "model Post extends Missing {\n  id Int\n}\nmodel Post {\n  id Int\n}\nmodel Café {\n  id Int\n}\n";
    let mut codes = codes(source, SchemaConfig::default());
    codes.sort_by_key(|code| code.as_str());
    assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E201, ErrorCode::E204]);
}

#[test]
fn test_inheritance_cycle() {
    let source = "model A extends B {\n  id Int\n}\nmodel B extends A {\n  id Int\n}\n";
    let err = parse_schema(source, SchemaConfig::default()).unwrap_err();
    let diagnostic = &err.diagnostics()[0];

    assert_eq!(diagnostic.code(), Some(ErrorCode::E202));
    assert!(diagnostic.message().contains("`A`, `B`"));
    assert_eq!(diagnostic.labels().len(), 2);
}

#[test]
fn test_empty_delegate_policies() {
    let source = "model Asset {\n  id Int\n  kind String\n  @@delegate(kind)\n}\n";

    let model = parse_schema(source, SchemaConfig::default()).expect("skip policy accepts");
    assert_eq!(model.delegates().count(), 1);

    let err = parse_schema(source, SchemaConfig::new(EmptyDelegatePolicy::Reject)).unwrap_err();
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E203));
    assert_eq!(diagnostic.severity(), Severity::Error);
}

#[test]
fn test_skipped_delegate_is_returned_as_warning() {
    let source = "model Asset {\n  id Int\n  kind String\n  @@delegate(kind)\n}\nmodel Tag {\n  id Int\n}\n";

    let (model, warnings) =
        parse_schema_with_warnings(source, SchemaConfig::default()).expect("skip policy accepts");
    assert_eq!(model.entities().len(), 2);
    assert_eq!(warnings.len(), 1);

    let warning = &warnings[0];
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.code(), Some(ErrorCode::E203));
    assert!(warning.message().contains("`Asset`"));
    assert_eq!(warning.labels()[0].span().text(source), "Asset");
}

#[test]
fn test_clean_schema_has_no_warnings() {
    let source = "model Activity {\n  id Int\n  kind String\n  @@delegate(kind)\n}\nmodel Post extends Activity {\n}\n";
    let (_, warnings) = parse_schema_with_warnings(source, SchemaConfig::default()).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_lexer_errors_surface_through_schema() {
    let codes = codes("model A {\n  name String @default(\"x)\n}\n", SchemaConfig::default());
    assert_eq!(codes, vec![ErrorCode::E001]);
}

#[test]
fn test_declarations_entry_point() {
    let tree = parse_declarations(
        "export namespace Prisma {\n  export type $PostPayload<ExtArgs> = { name: \"Post\" }\n}\n",
    )
    .expect("Failed to parse declarations");

    let Statement::Namespace(prisma) = &tree.statements()[0] else {
        panic!("Expected namespace");
    };
    let Statement::TypeAlias(alias) = &prisma.statements()[0] else {
        panic!("Expected type alias");
    };
    assert_eq!(alias.name(), "$PostPayload");
    assert_eq!(alias.type_params()[0].name(), "ExtArgs");
}

#[test]
fn test_declarations_error_has_location() {
    let err = parse_declarations("type A = { b: string )").unwrap_err();
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E102));
    assert!(!diagnostic.labels().is_empty());
}
