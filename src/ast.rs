use crate::interpreter::{grammar::NTerm, lexer::Token};

/// An index into a [`ParseTree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a parse tree node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A matched terminal.
    Term(Token),
    /// An expanded non-terminal with its children in rule order.
    NTerm {
        /// The non-terminal that was expanded.
        name:     NTerm,
        /// The children, appended while the rule is being parsed.
        children: Vec<NodeId>,
    },
    /// An empty expansion.
    Epsilon,
}

/// A node of the parse tree.
///
/// Parents are plain indices, so the tree owns no cycles. The root has no
/// parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The enclosing non-terminal, if any.
    pub parent: Option<NodeId>,
    /// The node's payload.
    pub kind:   NodeKind,
}

/// A parse tree stored as an arena of nodes.
///
/// The first node pushed is the root. Nodes are only appended while parsing;
/// afterwards the tree is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    /// Returns the root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    /// Panics if `id` does not come from this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the parent of `id`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of `id`. Terminals and epsilons have none.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::NTerm { children, .. } => children,
            NodeKind::Term(_) | NodeKind::Epsilon => &[],
        }
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Tests whether the tree has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node under `parent` and returns its id.
    pub(crate) fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent, kind });

        if let Some(parent) = parent
           && let NodeKind::NTerm { children, .. } = &mut self.nodes[parent.0].kind
        {
            children.push(id);
        }

        id
    }

    /// Returns the terminal tokens in left-to-right order.
    ///
    /// # Example
    /// ```
    /// use wdte::interpreter::{lexer::Scanner, parser::parse_script};
    ///
    /// let source = "main => + 1 2;";
    /// let tree = parse_script(source).unwrap();
    /// let leaves: Vec<_> = tree.leaves().cloned().collect();
    ///
    /// assert_eq!(leaves, Scanner::new(source).collect::<Vec<_>>());
    /// ```
    pub fn leaves(&self) -> impl Iterator<Item = &Token> {
        let mut stack: Vec<NodeId> = self.root().into_iter().collect();

        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                match &self.node(id).kind {
                    NodeKind::Term(token) => return Some(token),
                    NodeKind::NTerm { children, .. } => stack.extend(children.iter().rev()),
                    NodeKind::Epsilon => {},
                }
            }
            None
        })
    }
}
