use csstoken::VariableMapping;

pub(crate) const SAMPLE_STYLESHEET: &str = ".button {\n  color: #ff0000;\n  padding: 10px;\n}\n";

pub(crate) fn red_mapping() -> VariableMapping {
    let mut mapping = VariableMapping::new();
    mapping.insert("#ff0000ff", "@red");
    mapping.insert("#ff0000ff", "var(--danger)");
    mapping.insert("10px", "@space-md");
    mapping
}
