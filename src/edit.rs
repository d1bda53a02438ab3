/// Text edit expressed as byte offsets over the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSpan {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEditSpan {
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }
}

/// Apply non-overlapping edits to `source`. Edits overlapping an earlier one are dropped.
pub fn apply_edits(source: &str, edits: &[TextEditSpan]) -> String {
    let mut ordered: Vec<&TextEditSpan> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.start, edit.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        if edit.start < cursor || edit.end > source.len() || edit.start > edit.end {
            continue;
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(&edit.new_text);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);
    output
}
