//! Snapshot tests for the AST dump visitors, grounded in the teacher's own
//! `insta::assert_yaml_snapshot!(document)` usage over a parsed AST
//! (`tests/integration/ensemble_documents_example.rs`). This crate's `insta`
//! dependency only enables the `json` feature, so JSON-dump output is
//! snapshotted here instead of YAML.

use std::io::Write;

use helix_front::ast::to_json;
use helix_front::parse_file;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn let_decl_json_dump_snapshot() {
    let f = write_temp("let a: int = 5;\n");
    let (program, sink) = parse_file(f.path());
    assert!(sink.is_empty());
    let root: helix_front::ast::Node = program.into();
    insta::assert_json_snapshot!(to_json(&root));
}

#[test]
fn struct_decl_json_dump_snapshot() {
    let f = write_temp("struct F { n: int, d: int }\n");
    let (program, sink) = parse_file(f.path());
    assert!(sink.is_empty());
    let root: helix_front::ast::Node = program.into();
    insta::assert_json_snapshot!(to_json(&root));
}

#[test]
fn if_else_pretty_dump_snapshot() {
    let f = write_temp("if x > 1 { return x; } else { return 0; }\n");
    let (program, sink) = parse_file(f.path());
    assert!(sink.is_empty());
    let root: helix_front::ast::Node = program.into();
    insta::assert_snapshot!(root.to_string(0));
}
