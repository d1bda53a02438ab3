//! End-to-end scanning: diagnostics, auto-replace and quick fixes over one index.

use csstoken::{
    apply_edits, auto_replace_edits, quick_fixes, scan_literals, DocumentKind, SuggestionOptions,
    VariableMapping,
};
use rstest::{fixture, rstest};

#[fixture]
fn mapping() -> VariableMapping {
    let mut mapping = VariableMapping::new();
    mapping.insert("#ff0000ff", "@red");
    mapping.insert("#ff0000ff", "@danger");
    mapping.insert("#ffffffff", "@white");
    mapping.insert("10px", "@space-md");
    mapping
}

fn options() -> SuggestionOptions {
    SuggestionOptions {
        px_templates: vec!["<%= _REM_RESULT_ %>".into(), "<%= _VAR_NAME_ %>".into()],
        color_templates: vec!["<%= _VAR_NAME_ %>".into()],
        root_font_size: 16.0,
        colors_enabled: true,
    }
}

const COMPONENT: &str = "\
<template>
  <div style=\"color: #ff0000\">hi</div>
</template>
<style lang=\"less\">
.title {
  color: #ff0000;
  background: rgb(255, 255, 255);
}
</style>
";

#[rstest]
fn embedded_styles_only_scan_the_style_block(mapping: VariableMapping) {
    let report = scan_literals(COMPONENT, DocumentKind::EmbeddedStyle, &mapping);
    let raws: Vec<&str> = report.matches.iter().map(|found| found.raw.as_str()).collect();
    assert_eq!(raws, vec!["#ff0000", "rgb(255, 255, 255)"]);
    for found in &report.matches {
        assert!(found.span.start > COMPONENT.find("<style").unwrap());
        assert_eq!(&COMPONENT[found.span.clone()], found.raw);
    }
}

#[rstest]
fn markup_without_style_block_has_no_matches(mapping: VariableMapping) {
    let text = "<div style=\"color: #ff0000\"></div>\n";
    let report = scan_literals(text, DocumentKind::EmbeddedStyle, &mapping);
    assert!(report.matches.is_empty());
}

#[rstest]
fn auto_replace_uses_first_token_name(mapping: VariableMapping) {
    let edits = auto_replace_edits(COMPONENT, DocumentKind::EmbeddedStyle, &mapping);
    let fixed = apply_edits(COMPONENT, &edits);
    assert!(fixed.contains("  color: @danger;\n"));
    assert!(fixed.contains("  background: @white;\n"));
    assert!(fixed.contains("style=\"color: #ff0000\""));
    assert!(scan_literals(&fixed, DocumentKind::EmbeddedStyle, &mapping)
        .matches
        .is_empty());
}

#[rstest]
fn declaration_blocks_are_never_flagged(mapping: VariableMapping) {
    let text = "@palette: {\n  accent: #ff0000;\n}\n.a {\n  color: #ff0000;\n}\n";
    let report = scan_literals(text, DocumentKind::Stylesheet, &mapping);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].span.start, text.rfind("#ff0000").unwrap());
}

#[rstest]
fn unparsable_color_halts_the_scan(mapping: VariableMapping) {
    let text = ".a {\n  color: #ff0000;\n  border: 1px solid #zzz;\n  background: #ffffff;\n}\n";
    let report = scan_literals(text, DocumentKind::Stylesheet, &mapping);
    assert_eq!(report.matches.len(), 1);
    let halt = report.halted.expect("scan to halt");
    assert_eq!(halt.line, 2);
    assert_eq!(halt.value, "1px solid #zzz");
}

#[rstest]
#[case("padding: 10px;", 10, vec!["0.625rem", "@space-md"])]
#[case("color: #ff0000;", 9, vec!["@danger", "@red"])]
#[case("margin: 3px;", 9, vec!["0.1875rem"])]
#[case("width: calc(100% - 10px);", 21, vec![])]
fn quick_fix_targets(
    mapping: VariableMapping,
    #[case] text: &str,
    #[case] cursor: usize,
    #[case] expected: Vec<&str>,
) {
    let fixes = quick_fixes(text, cursor..cursor, &mapping, &options());
    let targets: Vec<&str> = fixes.iter().map(|fix| fix.replacement.as_str()).collect();
    assert_eq!(targets, expected);
    if let Some(first) = fixes.first() {
        assert!(first.preferred);
        assert!(fixes.iter().skip(1).all(|fix| !fix.preferred));
    }
}
