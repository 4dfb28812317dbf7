use crate::lexer::tokens::Token;

/// Index of a node inside a [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The grammar production (or leaf) a node stands for.
///
/// The set is closed on purpose: every production of the three grammars is
/// listed here, so a match over node kinds cannot silently miss one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    // Arithmetic productions
    Expression,
    Term,
    Factor,
    Value,
    UnsignedValue,
    Group,
    FunctionCall,
    QualifiedField,

    // Boolean productions
    BoolExpression,
    BoolTerm,
    BoolValue,
    Relation,

    // Text-template production
    TextExpression,

    // A single token
    Leaf,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub token: Option<Token>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Concrete nodes survive pruning even with a single child; they carry
    /// meaning of their own (a parenthesized group, a zero-argument call).
    pub concrete: bool,
}

/// An arena-backed syntax tree.
///
/// Parent/child relationships are stored as indices, so replacing a node
/// with its only child and destroying an abandoned speculative subtree are
/// both index-rewiring operations with no dangling references. Destroyed
/// nodes leave tombstones; `live_count` ignores them.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<Option<Node>>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> SyntaxTree {
        SyntaxTree {
            nodes: vec![],
            root: None,
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, concrete: bool) -> NodeId {
        self.nodes.push(Some(Node {
            kind,
            token: None,
            children: vec![],
            parent: None,
            concrete,
        }));
        NodeId(self.nodes.len() - 1)
    }

    pub fn leaf(&mut self, token: Token) -> NodeId {
        self.nodes.push(Some(Node {
            kind: NodeKind::Leaf,
            token: Some(token),
            children: vec![],
            parent: None,
            concrete: false,
        }));
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.nodes[id.0].as_ref().unwrap()
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.0].as_mut().unwrap()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    /// Swaps `old` for `new` in `parent`'s child list. The old subtree is
    /// destroyed; `new` is owned by `parent` afterwards.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let index = self
            .get(parent)
            .children
            .iter()
            .position(|c| *c == old)
            .unwrap();
        self.get_mut(parent).children[index] = new;
        self.get_mut(new).parent = Some(parent);
        self.destroy(old);
    }

    /// Recursively tombstones a subtree.
    pub fn destroy(&mut self, id: NodeId) {
        let children = self.get(id).children.clone();
        for child in children {
            self.destroy(child);
        }
        self.nodes[id.0] = None;
    }

    /// Removes every non-concrete node with exactly one child, promoting
    /// the child in its place, and returns the id standing where `id`
    /// stood. Idempotent: a second pass finds nothing to elide.
    pub fn prune(&mut self, id: NodeId) -> NodeId {
        let (single_child, concrete) = {
            let node = self.get(id);
            (
                if node.children.len() == 1 {
                    Some(node.children[0])
                } else {
                    None
                },
                node.concrete,
            )
        };

        if let Some(child) = single_child {
            if !concrete {
                let parent = self.get(id).parent;
                self.get_mut(child).parent = parent;
                if let Some(parent) = parent {
                    let index = self
                        .get(parent)
                        .children
                        .iter()
                        .position(|c| *c == id)
                        .unwrap();
                    self.get_mut(parent).children[index] = child;
                }
                // Only the elided node dies; the child was promoted.
                self.nodes[id.0] = None;
                if self.root == Some(id) {
                    self.root = Some(child);
                }
                return self.prune(child);
            }
        }

        let children = self.get(id).children.clone();
        for child in children {
            self.prune(child);
        }
        id
    }

    /// Deep-copies a subtree of another arena into this one, returning the
    /// id of the copied root. Used to commit a successful speculative
    /// parse into the real tree.
    pub fn adopt(&mut self, other: &SyntaxTree, id: NodeId) -> NodeId {
        let (kind, token, concrete, children) = {
            let node = other.get(id);
            (
                node.kind,
                node.token.clone(),
                node.concrete,
                node.children.clone(),
            )
        };

        let new_id = self.alloc(kind, concrete);
        self.get_mut(new_id).token = token;
        for child in children {
            let new_child = self.adopt(other, child);
            self.add_child(new_id, new_child);
        }
        new_id
    }

    /// Source rendering of a subtree.
    pub fn text(&self, id: NodeId) -> String {
        let node = self.get(id);
        match node.kind {
            NodeKind::Leaf => node
                .token
                .as_ref()
                .map(|t| t.source_text.clone())
                .unwrap_or_default(),
            NodeKind::Group => format!("({})", self.join_children(id, "")),
            NodeKind::FunctionCall => {
                let children = &node.children;
                let name = self.text(children[0]);
                let args: Vec<String> =
                    children[1..].iter().map(|c| self.text(*c)).collect();
                format!("{}({})", name, args.join(","))
            }
            NodeKind::QualifiedField => {
                let children = &node.children;
                let mut out = format!("{}[{}]", self.text(children[0]), self.text(children[1]));
                if let Some(field) = children.get(2) {
                    out.push_str(&self.text(*field));
                }
                out
            }
            _ => self.join_children(id, ""),
        }
    }

    fn join_children(&self, id: NodeId, separator: &str) -> String {
        self.get(id)
            .children
            .iter()
            .map(|c| self.text(*c))
            .collect::<Vec<String>>()
            .join(separator)
    }

    /// Source position of a subtree: the start of its leftmost leaf.
    pub fn position(&self, id: NodeId) -> u32 {
        let node = self.get(id);
        if let Some(token) = &node.token {
            token.start()
        } else if let Some(first) = node.children.first() {
            self.position(*first)
        } else {
            0
        }
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).children.clone()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.get(id).token.as_ref()
    }

    /// Number of nodes that are not tombstones.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        SyntaxTree::new()
    }
}
