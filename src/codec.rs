//! Dense per-side numbering of arbitrary node labels.
//!
//! The A-side and B-side are numbered independently starting at 0, in the order
//! in which labels first occur in the edge list. This keeps the ids (and hence
//! the files handed to the enumerator) reproducible between runs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::sbtest::graph::{Edge, Node, NumNodes};

/// Bijection between the labels of one side and `0..len`.
#[derive(Debug, Clone)]
struct SideCodec<L> {
    label_to_id: HashMap<L, Node>,
    id_to_label: Vec<L>,
}

impl<L: Eq + Hash + Clone> SideCodec<L> {
    fn new() -> Self {
        Self {
            label_to_id: HashMap::new(),
            id_to_label: Vec::new(),
        }
    }

    fn encode(&mut self, label: &L) -> Result<Node> {
        if let Some(&id) = self.label_to_id.get(label) {
            return Ok(id);
        }

        let id = Node::try_from(self.id_to_label.len())
            .map_err(|_| Error::InvalidInput("Too many distinct node labels".into()))?;
        self.label_to_id.insert(label.clone(), id);
        self.id_to_label.push(label.clone());
        Ok(id)
    }

    fn id(&self, label: &L) -> Option<Node> {
        self.label_to_id.get(label).copied()
    }

    fn label(&self, id: Node) -> Option<&L> {
        self.id_to_label.get(id as usize)
    }

    fn len(&self) -> NumNodes {
        self.id_to_label.len() as NumNodes
    }
}

/// Label codec for a bipartite edge list with A-labels of type `A` and
/// B-labels of type `B`.
#[derive(Debug, Clone)]
pub struct LabelCodec<A, B> {
    side_a: SideCodec<A>,
    side_b: SideCodec<B>,
    edges: Vec<Edge>,
}

impl<A, B> LabelCodec<A, B>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
{
    /// Numbers all labels and translates the edge list into id space.
    /// The resulting edge list is parallel to the input, duplicates included.
    pub fn from_edges(edge_list: &[(A, B)]) -> Result<Self> {
        if edge_list.is_empty() {
            return Err(Error::InvalidInput("The edge list is empty".into()));
        }

        let mut side_a = SideCodec::new();
        let mut side_b = SideCodec::new();

        let edges = edge_list
            .iter()
            .map(|(a, b)| -> Result<Edge> { Ok(Edge(side_a.encode(a)?, side_b.encode(b)?)) })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            side_a,
            side_b,
            edges,
        })
    }

    /// Number of distinct labels on the A-side and the B-side
    pub fn num_unique_nodes(&self) -> (NumNodes, NumNodes) {
        (self.side_a.len(), self.side_b.len())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn a_id(&self, label: &A) -> Option<Node> {
        self.side_a.id(label)
    }

    pub fn b_id(&self, label: &B) -> Option<Node> {
        self.side_b.id(label)
    }

    pub fn a_label(&self, id: Node) -> Option<&A> {
        self.side_a.label(id)
    }

    pub fn b_label(&self, id: Node) -> Option<&B> {
        self.side_b.label(id)
    }

    /// Translates A-side ids back into labels; an id without a label can only
    /// come from a corrupt enumerator output.
    pub fn decode_a(&self, ids: &[Node]) -> Result<Vec<A>> {
        decode(&self.side_a, ids, "A")
    }

    pub fn decode_b(&self, ids: &[Node]) -> Result<Vec<B>> {
        decode(&self.side_b, ids, "B")
    }
}

fn decode<L: Eq + Hash + Clone>(
    side: &SideCodec<L>,
    ids: &[Node],
    name: &'static str,
) -> Result<Vec<L>> {
    ids.iter()
        .map(|&id| {
            side.label(id).cloned().ok_or(Error::UnknownId {
                side: name,
                id,
                num_nodes: side.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn demo_edges() -> Vec<(String, String)> {
        [
            ("beef", "iron"),
            ("pork", "iron"),
            ("beef", "zinc"),
            ("lamb", "b12"),
            ("beef", "iron"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
    }

    #[test]
    fn first_occurrence_order() {
        let codec = LabelCodec::from_edges(&demo_edges()).unwrap();

        assert_eq!(codec.num_unique_nodes(), (3, 3));
        assert_eq!(codec.a_id(&"beef".to_string()), Some(0));
        assert_eq!(codec.a_id(&"pork".to_string()), Some(1));
        assert_eq!(codec.a_id(&"lamb".to_string()), Some(2));
        assert_eq!(codec.b_id(&"iron".to_string()), Some(0));
        assert_eq!(codec.b_id(&"zinc".to_string()), Some(1));
        assert_eq!(codec.b_id(&"b12".to_string()), Some(2));
        assert_eq!(codec.a_id(&"iron".to_string()), None);

        assert_eq!(
            codec.edges(),
            &[Edge(0, 0), Edge(1, 0), Edge(0, 1), Edge(2, 2), Edge(0, 0)]
        );
    }

    #[test]
    fn round_trip() {
        let edges = demo_edges();
        let codec = LabelCodec::from_edges(&edges).unwrap();

        assert_eq!(codec.edges().len(), edges.len());
        for ((a, b), &Edge(u, v)) in edges.iter().zip(codec.edges()) {
            assert_eq!(codec.a_label(u), Some(a));
            assert_eq!(codec.b_label(v), Some(b));
        }

        let again = LabelCodec::from_edges(&edges).unwrap();
        assert_eq!(codec.edges(), again.edges());
    }

    #[test]
    fn sides_are_independent() {
        // the same label on both sides gets an id in each numbering
        let codec = LabelCodec::from_edges(&[(7, 7), (8, 7)]).unwrap();
        assert_eq!(codec.num_unique_nodes(), (2, 1));
        assert_eq!(codec.a_id(&7), Some(0));
        assert_eq!(codec.b_id(&7), Some(0));
        assert_eq!(codec.a_id(&8), Some(1));
    }

    #[test]
    fn mixed_label_types() {
        let codec = LabelCodec::from_edges(&[("x", 10u64), ("y", 20u64)]).unwrap();
        assert_eq!(codec.decode_a(&[1, 0]).unwrap(), vec!["y", "x"]);
        assert_eq!(codec.decode_b(&[1]).unwrap(), vec![20u64]);
    }

    #[test]
    fn decode_out_of_range() {
        let codec = LabelCodec::from_edges(&demo_edges()).unwrap();
        assert!(matches!(codec.decode_a(&[0, 3]), Err(Error::UnknownId { .. })));
        assert!(matches!(codec.decode_b(&[5]), Err(Error::UnknownId { .. })));
    }

    #[test]
    fn empty_input() {
        let edges: Vec<(u32, u32)> = Vec::new();
        assert!(matches!(
            LabelCodec::from_edges(&edges),
            Err(Error::InvalidInput(_))
        ));
    }
}
