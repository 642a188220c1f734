//! Identifier validation and fresh names

use std::sync::LazyLock;
use regex::Regex;
use crate::{Error, Result};
use crate::scope::{ScopeId, ScopeTree};
use crate::conflict::check_introduce;
use crate::syntax::javascript::RESERVED_WORDS;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

/// Check that `name` can be bound by a declaration
pub fn validate_name(name: &str) -> Result<()> {
    if !IDENTIFIER_PATTERN.is_match(name) {
        return Err(Error::InvalidName(format!("`{}` is not an identifier", name)));
    }
    if RESERVED_WORDS.contains(&name) {
        return Err(Error::InvalidName(format!("`{}` is a reserved word", name)));
    }
    Ok(())
}

/// First of `base`, `base1`, `base2`, ... that can be introduced in `scope`
/// and referred to from `sites` without a conflict
pub fn unique_name(tree: &ScopeTree<'_>, scope: ScopeId, base: &str, sites: &[usize]) -> String {
    let mut suffix = 0u32;
    loop {
        let candidate = if suffix == 0 {
            base.to_string()
        } else {
            format!("{}{}", base, suffix)
        };
        if validate_name(&candidate).is_ok() && check_introduce(tree, scope, &candidate, sites).is_clear() {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("total").is_ok());
        assert!(validate_name("$el").is_ok());
        assert!(validate_name("_x1").is_ok());
        assert!(matches!(validate_name("1x"), Err(Error::InvalidName(_))));
        assert!(matches!(validate_name("a-b"), Err(Error::InvalidName(_))));
        assert!(matches!(validate_name(""), Err(Error::InvalidName(_))));
        assert!(matches!(validate_name("class"), Err(Error::InvalidName(_))));
    }

    #[test]
    fn test_unique_name_skips_taken() {
        let syntax = SyntaxTree::parse("let value = 1; let value1 = 2; use(value2);").unwrap();
        let tree = ScopeTree::build(&syntax);

        // value and value1 collide, value2 is a free name used in the scope
        assert_eq!(unique_name(&tree, tree.root(), "value", &[]), "value3");
        assert_eq!(unique_name(&tree, tree.root(), "other", &[]), "other");
    }
}
