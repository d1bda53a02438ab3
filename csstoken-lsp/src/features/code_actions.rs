//! Quick-fix code actions for size and color literals.

use std::collections::HashMap;

use csstoken::range::SourceLocation;
use csstoken::QuickFix;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, TextEdit, Url, WorkspaceEdit,
};

use super::diagnostics::to_lsp_range;

/// Wrap each fix in a quick-fix action editing `uri`.
pub fn to_code_actions(uri: &Url, text: &str, fixes: Vec<QuickFix>) -> Vec<CodeActionOrCommand> {
    let locator = SourceLocation::new(text);
    fixes
        .into_iter()
        .map(|fix| {
            let edit = TextEdit {
                range: to_lsp_range(&locator, &fix.span),
                new_text: fix.replacement,
            };
            let changes = HashMap::from([(uri.clone(), vec![edit])]);
            CodeActionOrCommand::CodeAction(CodeAction {
                title: fix.title,
                kind: Some(CodeActionKind::QUICKFIX),
                edit: Some(WorkspaceEdit {
                    changes: Some(changes),
                    ..WorkspaceEdit::default()
                }),
                is_preferred: Some(fix.preferred),
                ..CodeAction::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{red_mapping, SAMPLE_STYLESHEET};
    use csstoken::{quick_fixes, SuggestionOptions};
    use tower_lsp::lsp_types::{Position, Range};

    fn options() -> SuggestionOptions {
        SuggestionOptions {
            px_templates: vec!["<%= _VAR_NAME_ %>".into(), "<%= _REM_RESULT_ %>".into()],
            color_templates: vec!["<%= _VAR_NAME_ %>".into()],
            root_font_size: 16.0,
            colors_enabled: true,
        }
    }

    fn actions_at(needle: &str) -> Vec<CodeAction> {
        let uri = Url::parse("file:///button.css").unwrap();
        let offset = SAMPLE_STYLESHEET.find(needle).unwrap();
        let mapping = red_mapping();
        let fixes = quick_fixes(SAMPLE_STYLESHEET, offset..offset, &mapping, &options());
        to_code_actions(&uri, SAMPLE_STYLESHEET, fixes)
            .into_iter()
            .map(|action| match action {
                CodeActionOrCommand::CodeAction(action) => action,
                CodeActionOrCommand::Command(_) => panic!("expected a code action"),
            })
            .collect()
    }

    #[test]
    fn color_actions_offer_every_token() {
        let actions = actions_at("#ff0000");
        let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Replace [ #ff0000 ] with @red",
                "Replace [ #ff0000 ] with var(--danger)"
            ]
        );
        assert_eq!(actions[0].is_preferred, Some(true));
        assert_eq!(actions[1].is_preferred, Some(false));
        assert_eq!(actions[0].kind, Some(CodeActionKind::QUICKFIX));
    }

    #[test]
    fn size_action_edits_the_literal_range() {
        let actions = actions_at("10px");
        assert_eq!(actions.len(), 2);
        let uri = Url::parse("file:///button.css").unwrap();
        let edits = actions[1]
            .edit
            .as_ref()
            .and_then(|edit| edit.changes.as_ref())
            .and_then(|changes| changes.get(&uri))
            .unwrap();
        assert_eq!(edits[0].new_text, "0.625rem");
        assert_eq!(
            edits[0].range,
            Range::new(Position::new(2, 11), Position::new(2, 15))
        );
    }
}
