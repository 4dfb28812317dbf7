use super::tree::{NodeKind, SyntaxTree, NodeId};

/// Renders a subtree as an indented listing of node kinds and their
/// rendered text, one node per line. Used for diagnostics and as a stable
/// fixture format in tests.
pub fn print_tree(tree: &SyntaxTree, id: NodeId) -> String {
    let mut out = String::new();
    print_node(tree, id, 0, &mut out);
    out
}

fn print_node(tree: &SyntaxTree, id: NodeId, indent: usize, out: &mut String) {
    let node = tree.get(id);
    let padding = "  ".repeat(indent);

    match node.kind {
        NodeKind::Leaf => {
            let token = node.token.as_ref().unwrap();
            out.push_str(&format!("{}{}\n", padding, token.describe()));
        }
        _ => {
            out.push_str(&format!("{}{:?}  `{}`\n", padding, node.kind, tree.text(id)));
        }
    }

    for child in &node.children {
        print_node(tree, *child, indent + 1, out);
    }
}
