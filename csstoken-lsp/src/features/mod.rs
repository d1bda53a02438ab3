pub mod code_actions;
pub mod commands;
pub mod diagnostics;

#[cfg(test)]
pub(crate) mod test_support;
