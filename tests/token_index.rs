//! Building the token index from declaration files on disk.

use csstoken::{build_mapping, load_variables, DeclarationSources, VariableMapping};
use std::fs;

const TOKENS: &str = "\
@primary: #1890ff;
@space-md: 10px;
--accent: #ff0000;
@theme: {
  light: #ffffff;
  // dark: #000000;
}
:root {
  --gutter: 16px;
  // --muted: #999;
}
";

fn index(text: &str) -> VariableMapping {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.less");
    fs::write(&path, text).unwrap();
    build_mapping(&[path]).unwrap()
}

#[test]
fn object_and_root_declarations() {
    let mapping = index(TOKENS);
    insta::assert_debug_snapshot!(mapping.entries());
}

#[test]
fn commented_members_are_not_offered() {
    let mapping = index(TOKENS);
    assert!(!mapping.contains("#000000ff"));
    assert!(!mapping.contains("#999999ff"));
    assert_eq!(mapping.first_name("#ffffffff"), Some("@theme[light]"));
}

#[test]
fn commented_object_member_with_same_value_is_removed() {
    let mapping = index("@colors: {\n  primary: #fff;\n  // primary: #fff;\n}\n");
    assert!(!mapping.contains("#ffffffff"));
}

#[test]
fn later_files_extend_the_same_index() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.less"), "@red: #f00;\n").unwrap();
    fs::write(dir.path().join("b.scss"), "$danger: rgb(255, 0, 0);\n").unwrap();
    let mapping = build_mapping(&[dir.path().join("a.less"), dir.path().join("b.scss")]).unwrap();
    let names: Vec<&String> = mapping.get("#ff0000ff").unwrap().iter().collect();
    assert_eq!(names, vec!["$danger", "@red"]);
}

#[test]
fn unreadable_file_yields_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.less"), "@red: #f00;\n").unwrap();
    let paths = [dir.path().join("a.less"), dir.path().join("missing.less")];
    assert!(build_mapping(&paths).is_err());
    assert!(load_variables(&paths).is_empty());
}

#[test]
fn directory_sources_are_walked_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("styles").join("tokens");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("colors.css"), ":root {\n  --brand: #123456;\n}\n").unwrap();
    fs::write(nested.join("notes.md"), "--ignored: #ffffff;\n").unwrap();

    let sources = DeclarationSources::new(
        Some(dir.path().to_path_buf()),
        Some("styles".into()),
        Vec::new(),
    );
    let mapping = load_variables(&sources.resolve());
    assert_eq!(mapping.first_name("#123456ff"), Some("var(--brand)"));
    assert!(!mapping.contains("#ffffffff"));
    assert!(sources.covers(&nested.join("colors.css")));
    assert!(!sources.covers(&dir.path().join("app.css")));
}
