//! Naming policy: the full name of a declaration is the dot-path
//! from workspace to leaf, mangled for the target language's identifier
//! rules.

/// Mangles a single dot-path segment (or a full already-joined path) into a
/// valid target-language identifier: `.` and spaces/parentheses become `_`,
/// `*` becomes `P`, and the bare root workspace name `core` is replaced with
/// `_` to avoid colliding with a host keyword.
pub fn mangle(path: &str) -> String {
    if path == "core" {
        return "_".to_string();
    }

    path.chars()
        .map(|ch| match ch {
            '.' | ' ' | '(' | ')' => '_',
            '*' => 'P',
            other => other,
        })
        .collect()
}

/// Joins already-mangled path segments the way a dot-path would be joined
/// before mangling, e.g. a struct name and one of its methods.
pub fn join(segments: &[&str]) -> String {
    mangle(&segments.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles_dots_and_parens_and_stars() {
        assert_eq!(mangle("a.b(c)"), "a_b_c_");
        assert_eq!(mangle("*T"), "PT");
    }

    #[test]
    fn mangles_root_core() {
        assert_eq!(mangle("core"), "_");
    }

    #[test]
    fn joins_segments() {
        assert_eq!(join(&["Point", "length"]), "Point_length");
    }
}
