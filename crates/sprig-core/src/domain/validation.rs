//! Project name rules.
//!
//! The project name becomes the manifest's `name`, so it has to satisfy the
//! npm registry's naming restrictions.

use std::path::Path;

use crate::domain::error::DomainError;

pub const MAX_NAME_LENGTH: usize = 214;

const RESERVED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Check `name` against the registry's rules, collecting every problem.
pub fn validate_package_name(name: &str) -> Result<(), DomainError> {
    let problems = name_problems(name);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidPackageName {
            name: name.into(),
            problems,
        })
    }
}

fn name_problems(name: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name length must be greater than zero".into());
        return problems;
    }
    if name.len() > MAX_NAME_LENGTH {
        problems.push(format!("name can no longer contain more than {MAX_NAME_LENGTH} characters"));
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".into());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".into());
    }
    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".into());
    }
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
        problems.push(format!("{name} is a blacklisted name"));
    }
    if name.chars().any(|c| c.is_uppercase()) {
        problems.push("name can no longer contain capital letters".into());
    }
    if name.chars().any(|c| matches!(c, '~' | '\'' | '!' | '(' | ')' | '*')) {
        problems.push("name can no longer contain special characters (\"~'!()*\")".into());
    }
    if !is_url_safe(name) {
        problems.push("name can only contain URL-friendly characters".into());
    }

    problems
}

/// URL-safe, allowing a single `@scope/` prefix.
fn is_url_safe(name: &str) -> bool {
    let unreserved = |s: &str| {
        !s.is_empty()
            && s.chars().all(|c| {
                c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
            })
    };

    match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((scope, pkg)) => unreserved(scope) && unreserved(pkg),
        None => unreserved(name),
    }
}

/// Project name implied by a destination path: its final component.
pub fn project_name_from_path(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .or_else(|| {
            std::path::absolute(path)
                .ok()?
                .file_name()?
                .to_str()
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn accepts_typical_names() {
        for name in ["my-app", "app2", "some.site", "@acme/web", "a_b"] {
            assert!(validate_package_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_with_reasons() {
        let cases = [
            ("", "greater than zero"),
            ("MyApp", "capital letters"),
            (".hidden", "start with a period"),
            ("_private", "start with an underscore"),
            (" padded", "leading or trailing spaces"),
            ("node_modules", "blacklisted"),
            ("hello world", "URL-friendly"),
            ("wow!", "special characters"),
        ];
        for (name, fragment) in cases {
            match validate_package_name(name) {
                Err(DomainError::InvalidPackageName { problems, .. }) => {
                    assert!(
                        problems.iter().any(|p| p.contains(fragment)),
                        "{name:?}: {problems:?}"
                    );
                }
                other => panic!("{name:?} unexpectedly gave {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_package_name(&name).is_err());
        assert!(validate_package_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn name_from_path_uses_last_component() {
        assert_eq!(
            project_name_from_path(&PathBuf::from("projects/my-app")).as_deref(),
            Some("my-app")
        );
        assert_eq!(
            project_name_from_path(&PathBuf::from("my-app/")).as_deref(),
            Some("my-app")
        );
    }
}
