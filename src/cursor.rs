//! The editor surface: the ordered function-definition entities of one
//! parsed buffer, searchable backward from a cursor offset. This is what
//! a plugin host would hand us; here it comes from the same tree-sitter
//! parse the scope resolver uses.

use tree_sitter::{Node, Tree};

/// A function definition's name and where its definition starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntity {
    pub name: String,
    pub start_byte: usize,
}

/// All function definitions in the buffer, in source order, nested ones
/// included — methods are what we are usually looking for.
#[must_use]
pub fn function_entities(tree: &Tree, source: &str) -> Vec<FunctionEntity> {
    let mut entities = Vec::new();
    collect(tree.root_node(), source, &mut entities);
    entities
}

fn collect(node: Node, source: &str, out: &mut Vec<FunctionEntity>) {
    if node.kind() == "function_definition"
        && let Some(name) = node.child_by_field_name("name")
        && let Some(text) = source.get(name.byte_range())
    {
        out.push(FunctionEntity {
            name: text.to_string(),
            start_byte: node.start_byte(),
        });
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, out);
    }
}

/// The nearest function at or above the cursor: the last entity whose
/// definition starts at or before `offset`. The caller decides whether
/// its name qualifies as a test.
#[must_use]
pub fn nearest_function(entities: &[FunctionEntity], offset: usize) -> Option<&FunctionEntity> {
    entities.iter().rev().find(|e| e.start_byte <= offset)
}
