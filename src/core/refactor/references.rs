//! `package:` reference rewriting.
//!
//! Matching is a plain substring search on `package:<name>`. There is no
//! word-boundary check, so renaming `app` also rewrites `package:app_utils`.

/// Outcome of rewriting one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Occurrences of the old marker before replacement.
    pub occurrences: usize,
    pub changed: bool,
}

/// Import marker for a package name.
pub fn reference_marker(name: &str) -> String {
    format!("package:{}", name)
}

/// Replace every `package:<old_name>` in `content` with `package:<new_name>`.
pub fn rewrite_references(content: &str, old_name: &str, new_name: &str) -> Rewrite {
    let old_marker = reference_marker(old_name);
    let occurrences = content.matches(&old_marker).count();

    if occurrences == 0 {
        return Rewrite {
            content: content.to_string(),
            occurrences: 0,
            changed: false,
        };
    }

    Rewrite {
        content: content.replace(&old_marker, &reference_marker(new_name)),
        occurrences,
        changed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "import 'package:old_app/x.dart';\n\
                          import 'package:flutter/material.dart';\n\
                          export 'package:old_app/src/y.dart';\n";

    #[test]
    fn rewrites_every_occurrence() {
        let result = rewrite_references(SOURCE, "old_app", "new_app");

        assert!(result.changed);
        assert_eq!(result.occurrences, 2);
        assert_eq!(
            result.content,
            "import 'package:new_app/x.dart';\n\
             import 'package:flutter/material.dart';\n\
             export 'package:new_app/src/y.dart';\n"
        );
    }

    #[test]
    fn untouched_when_no_marker() {
        let content = "import 'package:flutter/material.dart';\n// old_app mentioned here\n";
        let result = rewrite_references(content, "old_app", "new_app");

        assert!(!result.changed);
        assert_eq!(result.occurrences, 0);
        assert_eq!(result.content, content);
    }

    #[test]
    fn idempotent_once_renamed() {
        let first = rewrite_references(SOURCE, "old_app", "new_app");
        let second = rewrite_references(&first.content, "old_app", "new_app");

        assert!(!second.changed);
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn reverse_rename_restores_original() {
        let forward = rewrite_references(SOURCE, "old_app", "new_app");
        let back = rewrite_references(&forward.content, "new_app", "old_app");

        assert!(back.changed);
        assert_eq!(back.content, SOURCE);
    }

    #[test]
    fn prefix_names_are_rewritten_too() {
        let content = "import 'package:app_utils/a.dart';\n";
        let result = rewrite_references(content, "app", "shop");

        assert!(result.changed);
        assert_eq!(result.content, "import 'package:shop_utils/a.dart';\n");
    }

    #[test]
    fn bare_name_without_marker_is_ignored() {
        let content = "const name = 'old_app';\n";
        assert!(!rewrite_references(content, "old_app", "new_app").changed);
    }
}
