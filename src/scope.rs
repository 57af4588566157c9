//! Scope resolution: map a function name to its lexically enclosing class.
//!
//! The whole tree is walked, parents threaded as a traversal parameter
//! (nodes never store a back-reference). Every name match overwrites the
//! result, so when a file defines the same function name twice the last
//! definition in traversal order wins — including a later module-level
//! definition overriding an earlier in-class one with `None`. Historical
//! callers depend on that, so it stays.

use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::error::NeartestError;

/// Parse Python source. A grammar-level error anywhere in the file is
/// fatal to the resolution request.
pub fn parse(source: &str, path: &Path) -> Result<Tree, NeartestError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| NeartestError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| NeartestError::ParseError {
            path: path.to_path_buf(),
            reason: "parser returned no tree".into(),
        })?;

    if tree.root_node().has_error() {
        return Err(NeartestError::ParseError {
            path: path.to_path_buf(),
            reason: first_error(tree.root_node())
                .map_or_else(|| "invalid syntax".into(), |row| {
                    format!("invalid syntax at line {}", row + 1)
                }),
        });
    }

    Ok(tree)
}

/// Row of the first ERROR or missing node, for the error message.
fn first_error(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error()
            && let Some(row) = first_error(child)
        {
            return Some(row);
        }
    }
    None
}

/// Name of the innermost class lexically enclosing the definition of
/// `function`, or `None` for a module-level or nested-function match.
pub fn enclosing_class(tree: &Tree, source: &str, function: &str) -> Option<String> {
    let mut result = None;
    walk(tree.root_node(), Enclosing::Other, source, function, &mut result);
    result
}

/// Convenience wrapper: parse then resolve in one call.
pub fn find_enclosing_class(
    source: &str,
    function: &str,
    path: &Path,
) -> Result<Option<String>, NeartestError> {
    let tree = parse(source, path)?;
    Ok(enclosing_class(&tree, source, function))
}

/// The immediate syntactic context of the node being visited, threaded
/// down the walk. Only a class context makes a matching function a method.
#[derive(Clone, Copy)]
enum Enclosing<'a> {
    Class(&'a str),
    Function,
    Other,
}

fn walk<'a>(
    node: Node<'a>,
    enclosing: Enclosing<'a>,
    source: &'a str,
    function: &str,
    result: &mut Option<String>,
) {
    let inner = match node.kind() {
        "class_definition" => {
            definition_name(node, source).map_or(Enclosing::Other, Enclosing::Class)
        }
        "function_definition" => {
            if definition_name(node, source) == Some(function) {
                // Last match wins, even when it demotes an earlier
                // in-class result back to None.
                *result = match enclosing {
                    Enclosing::Class(name) => Some(name.to_string()),
                    Enclosing::Function | Enclosing::Other => None,
                };
            }
            Enclosing::Function
        }
        // Transparent wrappers between a definition and its members.
        "block" | "decorated_definition" => enclosing,
        // Anything else (an `if` statement, a `for` body, …) breaks the
        // direct parent link, exactly as the syntax does.
        _ => Enclosing::Other,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, inner, source, function, result);
    }
}

fn definition_name<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    let name = node.child_by_field_name("name")?;
    source.get(name.byte_range())
}
