//! JavaScript node roles
//!
//! The engine never branches on grammar details outside this module. Node
//! kinds are mapped onto a closed set of roles: identifiers (declaration or
//! reference sites), function-like nodes and statement lists (scope-opening),
//! and the expression helpers used by extract/inline.

use tree_sitter::Node;

/// Identifier-like leaves that can name a binding
pub const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

/// Check if a node is an identifier-like leaf
pub fn is_identifier(node: Node<'_>) -> bool {
    IDENTIFIER_KINDS.contains(&node.kind())
}

/// `{ x }` in an object literal or pattern: the name is both the property key
/// and the variable
pub fn is_shorthand(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "shorthand_property_identifier" | "shorthand_property_identifier_pattern"
    )
}

/// Functions, generators, arrows and methods
pub fn is_function_like(node: Node<'_>) -> bool {
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "function_expression"
        | "generator_function"
        | "arrow_function"
        | "method_definition" => true,
        // Older grammars name function expressions `function`; the keyword
        // token shares the kind but is anonymous.
        "function" => node.is_named(),
        _ => false,
    }
}

/// Nearest function-like node enclosing `node` (not `node` itself)
pub fn enclosing_function(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_function_like(parent) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Statements whose body may run more than once
pub fn is_loop(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement"
    )
}

/// Nodes whose named children are a sequence of statements
pub fn is_statement_list(node: Node<'_>) -> bool {
    matches!(node.kind(), "program" | "statement_block")
}

/// Nodes that can be extracted into a variable
pub fn is_expression(node: Node<'_>) -> bool {
    node.is_named() && matches!(
        node.kind(),
        "identifier"
            | "number"
            | "string"
            | "template_string"
            | "regex"
            | "true"
            | "false"
            | "null"
            | "undefined"
            | "this"
            | "array"
            | "object"
            | "binary_expression"
            | "unary_expression"
            | "ternary_expression"
            | "parenthesized_expression"
            | "member_expression"
            | "subscript_expression"
            | "call_expression"
            | "new_expression"
            | "await_expression"
            | "arrow_function"
            | "function_expression"
            | "class"
    )
}

/// Children that carry meaning (comments are extras)
pub fn significant_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Check if `child` is the node stored under `field` on `parent`
pub fn is_field<'tree>(parent: Node<'tree>, field: &str, child: Node<'tree>) -> bool {
    parent.child_by_field_name(field) == Some(child)
}

/// Names another module sees: `a` in `import { a as b }` and `c` in
/// `export { x as c }`. They never refer to a local binding.
pub fn is_module_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "import_specifier" => {
            is_field(parent, "name", node) && parent.child_by_field_name("alias").is_some()
        }
        "export_specifier" => is_field(parent, "alias", node),
        _ => false,
    }
}

/// Module specifier whose local name is also its public name:
/// `a` in `import { a }` or `export { a }`
pub fn is_unaliased_specifier(node: Node<'_>) -> bool {
    node.parent().is_some_and(|parent| {
        matches!(parent.kind(), "import_specifier" | "export_specifier")
            && is_field(parent, "name", node)
            && parent.child_by_field_name("alias").is_none()
    })
}

/// Visit every identifier-like node below `node` in source order
pub fn walk_identifiers<'tree>(node: Node<'tree>, visit: &mut impl FnMut(Node<'tree>)) {
    if is_identifier(node) {
        if !is_module_name(node) {
            visit(node);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_identifiers(child, visit);
    }
}

/// Climb from a node inside a destructuring pattern to the pattern root
fn pattern_root(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        let inside_pattern = match parent.kind() {
            "object_pattern" | "array_pattern" | "rest_pattern" => true,
            "pair_pattern" => is_field(parent, "value", current),
            "assignment_pattern" | "object_assignment_pattern" => is_field(parent, "left", current),
            _ => false,
        };
        if !inside_pattern {
            break;
        }
        current = parent;
    }
    current
}

/// How an identifier occurrence uses its binding
pub fn usage(node: Node<'_>) -> Usage {
    let target = pattern_root(node);
    let Some(parent) = target.parent() else {
        return Usage::Read;
    };
    match parent.kind() {
        "assignment_expression" if is_field(parent, "left", target) => Usage::Write,
        "for_in_statement" if is_field(parent, "left", target) => Usage::Write,
        "augmented_assignment_expression" if is_field(parent, "left", target) => Usage::Update,
        "update_expression" => Usage::Update,
        _ => Usage::Read,
    }
}

/// Coarse usage classification of an identifier occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Read,
    Write,
    Update,
}

/// Check if an expression is the target of an assignment or update
pub fn is_assignment_target(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "assignment_expression" | "augmented_assignment_expression" => {
            is_field(parent, "left", node)
        }
        "update_expression" => true,
        "for_in_statement" => is_field(parent, "left", node),
        _ => false,
    }
}

/// Check if evaluating an expression may have observable effects.
///
/// Function bodies are skipped: creating a closure runs none of its code.
pub fn has_side_effects(node: Node<'_>, source: &[u8]) -> bool {
    match node.kind() {
        "call_expression"
        | "new_expression"
        | "assignment_expression"
        | "augmented_assignment_expression"
        | "update_expression"
        | "await_expression"
        | "yield_expression" => return true,
        "unary_expression" => {
            let operator = node
                .child_by_field_name("operator")
                .and_then(|op| op.utf8_text(source).ok());
            if operator == Some("delete") {
                return true;
            }
        }
        _ if is_function_like(node) => return false,
        _ => {}
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().any(|child| has_side_effects(child, source))
}

/// Binding power of a binary operator (higher binds tighter)
pub fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "??" => 4,
        "||" => 5,
        "&&" => 6,
        "|" => 7,
        "^" => 8,
        "&" => 9,
        "==" | "!=" | "===" | "!==" => 10,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 11,
        "<<" | ">>" | ">>>" => 12,
        "+" | "-" => 13,
        "*" | "/" | "%" => 14,
        "**" => 15,
        _ => 0,
    }
}

const PRECEDENCE_SEQUENCE: u8 = 1;
const PRECEDENCE_ASSIGNMENT: u8 = 2;
const PRECEDENCE_TERNARY: u8 = 3;
const PRECEDENCE_UNARY: u8 = 16;
const PRECEDENCE_POSTFIX: u8 = 17;
const PRECEDENCE_MEMBER: u8 = 19;

fn operator_of<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.child_by_field_name("operator")
        .and_then(|op| op.utf8_text(source).ok())
        .unwrap_or("")
}

/// Binding power of an expression node
pub fn expression_precedence(node: Node<'_>, source: &[u8]) -> u8 {
    match node.kind() {
        "sequence_expression" => PRECEDENCE_SEQUENCE,
        "assignment_expression" | "augmented_assignment_expression" | "arrow_function"
        | "yield_expression" => PRECEDENCE_ASSIGNMENT,
        "ternary_expression" => PRECEDENCE_TERNARY,
        "binary_expression" => binary_precedence(operator_of(node, source)),
        "unary_expression" | "await_expression" => PRECEDENCE_UNARY,
        "update_expression" => PRECEDENCE_POSTFIX,
        _ => PRECEDENCE_MEMBER + 1,
    }
}

/// Check if `replacement` needs parentheses when it takes the place of
/// `site` in the tree.
pub fn needs_parentheses(replacement: Node<'_>, site: Node<'_>, source: &[u8]) -> bool {
    let inner = expression_precedence(replacement, source);
    let Some(parent) = site.parent() else {
        return false;
    };
    match parent.kind() {
        "binary_expression" => {
            let outer = binary_precedence(operator_of(parent, source));
            let right = is_field(parent, "right", site);
            // `**` is right-associative, everything else left-associative
            let exponent = operator_of(parent, source) == "**";
            inner < outer || (inner == outer && (right != exponent))
        }
        "unary_expression" | "await_expression" | "spread_element" => inner < PRECEDENCE_UNARY,
        "member_expression" | "subscript_expression" => {
            is_field(parent, "object", site) && inner < PRECEDENCE_MEMBER
        }
        "call_expression" => is_field(parent, "function", site) && inner < PRECEDENCE_MEMBER,
        "new_expression" => is_field(parent, "constructor", site) && inner < PRECEDENCE_MEMBER,
        "ternary_expression" => inner <= PRECEDENCE_TERNARY,
        "parenthesized_expression" => false,
        _ => inner <= PRECEDENCE_SEQUENCE,
    }
}

/// Names that can never be bound
pub const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxTree;

    fn find<'t>(tree: &'t SyntaxTree, text: &str, kind: &str) -> Node<'t> {
        let start = tree.source().find(text).unwrap();
        tree.root()
            .descendant_for_byte_range(start, start + text.len())
            .map(|mut node| {
                while node.kind() != kind {
                    node = node.parent().unwrap();
                }
                node
            })
            .unwrap()
    }

    #[test]
    fn test_usage_kinds() {
        let tree = SyntaxTree::parse("a = 1; b += 2; c++; f(d); ({ e } = o);").unwrap();
        assert_eq!(usage(find(&tree, "a", "identifier")), Usage::Write);
        assert_eq!(usage(find(&tree, "b", "identifier")), Usage::Update);
        assert_eq!(usage(find(&tree, "c", "identifier")), Usage::Update);
        assert_eq!(usage(find(&tree, "d", "identifier")), Usage::Read);
        assert_eq!(
            usage(find(&tree, "e", "shorthand_property_identifier_pattern")),
            Usage::Write
        );
    }

    #[test]
    fn test_side_effects() {
        let tree = SyntaxTree::parse("x = a * b + c; y = g(a); z = () => g(a);").unwrap();
        let source = tree.source().as_bytes();
        assert!(!has_side_effects(find(&tree, "a * b + c", "binary_expression"), source));
        assert!(has_side_effects(find(&tree, "g(a)", "call_expression"), source));
        assert!(!has_side_effects(find(&tree, "() => g(a)", "arrow_function"), source));
    }

    #[test]
    fn test_loops_and_enclosing_functions() {
        let tree = SyntaxTree::parse("while (a) { b(); }\nconst g = () => { c(); };").unwrap();
        assert!(is_loop(find(&tree, "while", "while_statement")));
        assert!(!is_loop(find(&tree, "b()", "call_expression")));

        let arrow = find(&tree, "() => { c(); }", "arrow_function");
        assert_eq!(enclosing_function(find(&tree, "c()", "call_expression")), Some(arrow));
        assert_eq!(enclosing_function(find(&tree, "b", "identifier")), None);
    }

    #[test]
    fn test_parentheses_follow_precedence() {
        let tree = SyntaxTree::parse("r = v - 10; s = 2 * w; t = 1 - u; q = m.k; x*y; x+y;").unwrap();
        let source = tree.source().as_bytes();
        let product = find(&tree, "x*y", "binary_expression");
        let sum = find(&tree, "x+y", "binary_expression");
        assert_eq!(expression_precedence(product, source), 14);
        assert_eq!(expression_precedence(sum, source), 13);

        // x*y in place of v in `v - 10` needs no parentheses
        assert!(!needs_parentheses(product, find(&tree, "v", "identifier"), source));
        // x+y in place of w in `2 * w` does
        assert!(needs_parentheses(sum, find(&tree, "w", "identifier"), source));
        // same precedence on the right of `-` does
        assert!(needs_parentheses(sum, find(&tree, "u", "identifier"), source));
        // member access needs a primary expression
        assert!(needs_parentheses(sum, find(&tree, "m", "identifier"), source));
    }
}
