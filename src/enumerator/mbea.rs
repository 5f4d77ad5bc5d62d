//! In-process maximal biclique enumeration (MBEA, Zhang et al. 2014).
//!
//! The search grows the B-side of a biclique one candidate at a time. `P` holds
//! the candidates still to be tried, `Q` those already tried at this level; if
//! some node of `Q` is adjacent to the whole current A-side the branch can only
//! yield bicliques that were reported before, so it is pruned.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{debug, info};

use super::Enumerator;
use crate::error::{Error, Result};
use crate::sbtest::{edge_reader::EdgeReader, graph::*, Biclique, BicliqueList};

#[derive(Debug, Clone, Copy, Default)]
pub struct MbeaEnumerator;

impl MbeaEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Enumerator for MbeaEnumerator {
    fn name(&self) -> &str {
        "mbea"
    }

    fn enumerate(&self, input: &Path, output: &Path, sizes: &Path) -> Result<()> {
        let file = File::open(input).map_err(Error::io(input))?;
        let edges = EdgeReader::new(BufReader::new(file))
            .collect::<std::io::Result<Vec<Edge>>>()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => {
                    Error::InvalidInput(format!("{}: {e}", input.display()))
                }
                _ => Error::io(input)(e),
            })?;

        debug!("Read {} edges from {input:?}", edges.len());

        let bicliques = maximal_bicliques(&edges);
        info!("Found {} maximal bicliques", bicliques.len());

        let file = File::create(output).map_err(Error::io(output))?;
        bicliques
            .write(BufWriter::new(file))
            .map_err(Error::io(output))?;

        let file = File::create(sizes).map_err(Error::io(sizes))?;
        bicliques
            .write_sizes(BufWriter::new(file))
            .map_err(Error::io(sizes))?;

        Ok(())
    }
}

/// Enumerates all maximal bicliques with non-empty sides. Both sides of each
/// reported biclique are sorted; duplicate edges are ignored.
pub fn maximal_bicliques(edges: &[Edge]) -> BicliqueList {
    let Some(num_b) = edges.iter().map(|e| e.b() as usize + 1).max() else {
        return BicliqueList::default();
    };

    let mut neighbors: Vec<Vec<Node>> = vec![Vec::new(); num_b];
    for &Edge(a, b) in edges {
        neighbors[b as usize].push(a);
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }

    let mut left: Vec<Node> = edges.iter().map(|e| e.a()).collect();
    left.sort_unstable();
    left.dedup();

    // candidates are popped from the back, so low degree nodes go first
    let mut candidates: Vec<Node> = (0..num_b as Node)
        .filter(|&b| !neighbors[b as usize].is_empty())
        .collect();
    candidates.sort_by_key(|&b| std::cmp::Reverse(neighbors[b as usize].len()));

    let mut search = Search {
        neighbors: &neighbors,
        bicliques: Vec::new(),
    };
    search.expand(&left, &[], candidates, Vec::new());

    BicliqueList::from_vec(search.bicliques)
}

struct Search<'a> {
    neighbors: &'a [Vec<Node>],
    bicliques: Vec<Biclique>,
}

impl Search<'_> {
    fn common(&self, left: &[Node], b: Node) -> usize {
        intersection_size(left, &self.neighbors[b as usize])
    }

    fn expand(
        &mut self,
        left: &[Node],
        right: &[Node],
        mut candidates: Vec<Node>,
        mut former: Vec<Node>,
    ) {
        while let Some(x) = candidates.pop() {
            let new_left = intersection(left, &self.neighbors[x as usize]);
            let mut new_right = right.to_vec();
            new_right.push(x);

            let mut new_former = Vec::with_capacity(former.len());
            let mut is_maximal = true;
            for &v in &former {
                let n = self.common(&new_left, v);
                if n == new_left.len() {
                    is_maximal = false;
                    break;
                }
                if n > 0 {
                    new_former.push(v);
                }
            }

            if is_maximal {
                let mut new_candidates = Vec::with_capacity(candidates.len());
                for &v in &candidates {
                    let n = self.common(&new_left, v);
                    if n == new_left.len() {
                        new_right.push(v);
                    } else if n > 0 {
                        new_candidates.push(v);
                    }
                }

                let mut b_side = new_right.clone();
                b_side.sort_unstable();
                self.bicliques.push(Biclique::new(new_left.clone(), b_side));

                if !new_candidates.is_empty() {
                    self.expand(&new_left, &new_right, new_candidates, new_former);
                }
            }

            former.push(x);
        }
    }
}

fn intersection(a: &[Node], b: &[Node]) -> Vec<Node> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

fn intersection_size(a: &[Node], b: &[Node]) -> usize {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}
