//! Project-name placeholder substitution.

/// Literal marker the template files carry wherever the project name goes.
pub const PLACEHOLDER_TOKEN: &str = "<project_name>";

/// Result of patching one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content: String,
    pub replacements: usize,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Replace every occurrence of [`PLACEHOLDER_TOKEN`] with `project_name`.
///
/// A text with no placeholder left comes back unchanged, so patching is
/// idempotent as long as the project name does not itself contain the token
/// (project names are identifiers, so it cannot).
pub fn replace_placeholder(text: &str, project_name: &str) -> PatchOutcome {
    let replacements = text.matches(PLACEHOLDER_TOKEN).count();
    let content = if replacements == 0 {
        text.to_owned()
    } else {
        text.replace(PLACEHOLDER_TOKEN, project_name)
    };
    PatchOutcome {
        content,
        replacements,
    }
}
