//! Integration tests for the Rewriter API
//!
//! These tests run the rewrite pass over the demo schema and declaration
//! file and over small hand-written fragments.

use std::{fs, path::Path};

use polymorph::{PolymorphError, Rewriter, config::AppConfig};

const SCHEMA: &str = include_str!("../../../demos/schema.zmodel");
const DECLARATIONS: &str = include_str!("../../../demos/index.d.ts");

fn rewrite(schema: &str, declarations: &str) -> String {
    let rewriter = Rewriter::default();
    let model = rewriter.load_model(schema).expect("schema should load");
    rewriter
        .rewrite_source(&model, declarations)
        .expect("declarations should rewrite")
        .text
}

/// Text of the block that starts at the first line containing `head`.
fn block<'a>(text: &'a str, head: &str) -> &'a str {
    let start = text.find(head).expect("block head should exist");
    let rest = &text[start..];
    let end = rest.find("\n  }\n").expect("block should be closed");
    &rest[..end]
}

#[test]
fn test_payload_becomes_subtype_union() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    assert!(output.contains(
        "export type $ActivityPayload<ExtArgs extends $Extensions.InternalArgs = $Extensions.DefaultArgs> = \
         ($PostPayload<ExtArgs> & { scalars: { delegatedType: 'Post' } }) | \
         ($CommentPayload<ExtArgs> & { scalars: { delegatedType: 'Comment' } })\n"
    ));
}

#[test]
fn test_aux_members_are_removed_everywhere() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    assert!(!output.contains("poly_aux_"));
    assert!(output.contains("    name: \"Post\"\n    objects: {\n    }\n"));
}

#[test]
fn test_input_alias_loses_unsafe_nested_writes() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    let update = block(&output, "export type ActivityUncheckedUpdateInput");
    assert!(update.contains("owner?: {\n      connect?: UserWhereUniqueInput\n    }"));
    for name in ["create?", "connectOrCreate?", "upsert?", "update?"] {
        assert!(!update.contains(name), "{name} should be removed");
    }

    let create = block(&output, "export type ActivityCreateInput");
    assert!(create.contains("owner: UserCreateNestedOneWithoutActivitiesInput"));
}

#[test]
fn test_non_delegate_inputs_are_untouched() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    assert_eq!(
        block(&output, "export type PostCreateInput"),
        block(DECLARATIONS, "export type PostCreateInput")
    );
    assert_eq!(
        block(&output, "export type ActivityWhereInput"),
        block(DECLARATIONS, "export type ActivityWhereInput")
    );
}

#[test]
fn test_accessor_loses_create_and_upsert() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    let accessor = block(&output, "export interface ActivityDelegate");
    assert!(accessor.contains("findUnique<T extends ActivityFindUniqueArgs>"));
    assert!(accessor.contains("update<T extends ActivityUpdateArgs>"));
    assert!(accessor.contains("readonly fields: ActivityFieldRefs;"));
    assert!(!accessor.contains("create<T"));
    assert!(!accessor.contains("upsert<T"));
    assert!(!accessor.contains("Create a Activity."));

    let post = block(&output, "export interface PostDelegate");
    assert!(post.contains("create<T extends PostCreateArgs>"));
    assert!(post.contains("upsert<T extends PostUpsertArgs>"));
}

#[test]
fn test_client_accessors_are_preserved() {
    let output = rewrite(SCHEMA, DECLARATIONS);
    assert!(output.contains("get activity(): Prisma.ActivityDelegate<ExtArgs, ClientOptions>;"));
    assert!(output.contains("get post(): Prisma.PostDelegate<ExtArgs, ClientOptions>;"));
}

#[test]
fn test_rewrite_is_idempotent() {
    let once = rewrite(SCHEMA, DECLARATIONS);
    let twice = rewrite(SCHEMA, &once);
    assert_eq!(once, twice);
}

#[test]
fn test_summary_counts() {
    let rewriter = Rewriter::default();
    let model = rewriter.load_model(SCHEMA).unwrap();
    let summary = rewriter.rewrite_source(&model, DECLARATIONS).unwrap().summary;

    assert_eq!(summary.payloads_replaced, 1);
    assert_eq!(summary.input_aliases, 2);
    assert_eq!(summary.accessor_methods_removed, 2);
    assert_eq!(summary.nested_writes_removed, 4);
    // poly_aux_post inside $ActivityPayload is also matched; the payload
    // replacement subsumes it.
    assert_eq!(summary.aux_members_removed, 4);
}

#[test]
fn test_zero_delegates_only_removes_aux_members() {
    let schema = "model User {\n  id Int @id\n}\n";
    let declarations = "export type UserCreateInput = {\n  id?: number\n  poly_aux_x?: string\n  posts?: {\n    create?: PostCreateInput\n  }\n}\n";
    let output = rewrite(schema, declarations);
    assert_eq!(
        output,
        "export type UserCreateInput = {\n  id?: number\n  posts?: {\n    create?: PostCreateInput\n  }\n}\n"
    );
}

#[test]
fn test_anchored_input_alias_detection() {
    let schema = "model Asset {\n  id Int\n  kind String\n  @@delegate(kind)\n}\nmodel Image extends Asset {\n}\n";
    let declarations = "type ImageAssetCreateInput = {\n  create?: X\n}\ntype AssetCreateInput = {\n  create?: X\n}\n";
    let output = rewrite(schema, declarations);
    assert_eq!(
        output,
        "type ImageAssetCreateInput = {\n  create?: X\n}\ntype AssetCreateInput = {\n}\n"
    );
}

#[test]
fn test_empty_delegate_is_skipped_by_default() {
    let schema = "model Asset {\n  id Int\n  kind String\n  @@delegate(kind)\n}\n";
    let declarations = "export type $AssetPayload<E> = { name: \"Asset\" }\n";
    assert_eq!(rewrite(schema, declarations), declarations);
}

#[test]
fn test_empty_delegate_is_rejected_when_configured() {
    let config: AppConfig = toml::from_str("[rewrite]\nempty_delegate = \"reject\"\n").unwrap();
    let rewriter = Rewriter::new(config);
    let schema = "model Asset {\n  id Int\n  kind String\n  @@delegate(kind)\n}\n";
    let err = rewriter.load_model(schema).unwrap_err();
    assert!(matches!(err, PolymorphError::Parse { .. }));
}

#[test]
fn test_malformed_declarations_are_reported() {
    let rewriter = Rewriter::default();
    let model = rewriter.load_model(SCHEMA).unwrap();
    let err = rewriter
        .rewrite_source(&model, "export interface Broken {\n  a: string\n")
        .unwrap_err();
    match err {
        PolymorphError::Parse { err, src } => {
            assert!(!err.diagnostics().is_empty());
            assert!(src.starts_with("export interface Broken"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_run_rewrites_artifact_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let prisma = dir.path().join(".prisma");
    fs::create_dir(&prisma).unwrap();
    fs::write(prisma.join("index.d.ts"), DECLARATIONS).unwrap();

    let rewriter = Rewriter::default();
    let model = rewriter.load_model(SCHEMA).unwrap();

    let preview = rewriter.preview(&model, dir.path()).unwrap();
    assert_eq!(
        fs::read_to_string(prisma.join("index.d.ts")).unwrap(),
        DECLARATIONS
    );

    let summary = rewriter.run(&model, dir.path()).unwrap();
    assert_eq!(summary, preview.summary);
    assert_eq!(
        fs::read_to_string(prisma.join("index.d.ts")).unwrap(),
        preview.text
    );
}

#[test]
fn test_run_requires_output_dir() {
    let rewriter = Rewriter::default();
    let model = rewriter.load_model(SCHEMA).unwrap();
    let err = rewriter
        .run(&model, Path::new("/definitely/not/here"))
        .unwrap_err();
    assert!(matches!(err, PolymorphError::MissingOutputDir(_)));
}

#[test]
fn test_run_failure_leaves_artifact_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let prisma = dir.path().join(".prisma");
    fs::create_dir(&prisma).unwrap();
    let artifact = prisma.join("index.d.ts");
    let broken = "export type $ActivityPayload<E> = { poly_aux_x: 1 }\nexport interface Broken {\n  a: string\n";
    fs::write(&artifact, broken).unwrap();

    let rewriter = Rewriter::default();
    let model = rewriter.load_model(SCHEMA).unwrap();
    let err = rewriter.run(&model, dir.path()).unwrap_err();
    assert!(matches!(err, PolymorphError::Parse { .. }));

    assert_eq!(fs::read(&artifact).unwrap(), broken.as_bytes());
    let entries: Vec<_> = fs::read_dir(&prisma)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["index.d.ts"]);
}

#[test]
fn test_quoted_member_names_match_like_identifiers() {
    let schema = "model User {\n  id Int @id\n}\n";
    let declarations = "export type UserSelect = {\n  id?: boolean\n  \"poly_aux_q\"?: boolean\n  'poly_aux_r': string\n}\n";
    assert_eq!(
        rewrite(schema, declarations),
        "export type UserSelect = {\n  id?: boolean\n}\n"
    );
}
