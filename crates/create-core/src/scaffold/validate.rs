//! Package naming rules for project names
//!
//! The destination directory's base name becomes the project's package name,
//! so it has to satisfy registry naming restrictions. Validation reports
//! every violated rule, not just the first.

const MAX_NAME_LENGTH: usize = 214;

/// Characters a package name may contain beyond ASCII alphanumerics.
/// `~'!()*` survive URL encoding but are banned separately below.
fn is_url_friendly(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c)
}

/// Validate a project name against package naming rules.
/// Returns the complete list of violated rules; an empty `Ok` means valid.
pub fn validate_project_name(name: &str) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        problems.push(format!(
            "name cannot contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("name cannot contain capital letters".to_string());
    }
    if name.chars().any(|c| "~'!()*".contains(c)) {
        problems.push("name cannot contain special characters (\"~'!()*\")".to_string());
    }
    if !name.chars().all(is_url_friendly) {
        problems.push("name can only contain URL-friendly characters".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
