pub type Node = u32;

/// An edge between an A-side node (first) and a B-side node (second).
/// Both ids live in their own numbering, so `Edge(0, 0)` is a proper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub Node, pub Node);

impl Edge {
    pub fn a(&self) -> Node {
        self.0
    }

    pub fn b(&self) -> Node {
        self.1
    }
}

pub type NumNodes = Node;
pub type NumEdges = u64;
