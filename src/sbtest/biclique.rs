use itertools::Itertools;
use sha1::{digest::Output, Digest, Sha1};

use super::graph::*;
use crate::error::{Error, Result};
use std::io::{BufRead, Write};

/// A biclique in id space: every node of `a` is adjacent to every node of `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Biclique {
    pub a: Vec<Node>,
    pub b: Vec<Node>,
}

impl Biclique {
    pub fn new(a: Vec<Node>, b: Vec<Node>) -> Self {
        Self { a, b }
    }

    /// Sorts both sides so that equal bicliques compare equal
    pub fn canonicalize(&mut self) {
        self.a.sort_unstable();
        self.b.sort_unstable();
    }

    pub fn size(&self) -> (usize, usize) {
        (self.a.len(), self.b.len())
    }
}

/// The content of an `sbtest` output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BicliqueList {
    pub bicliques: Vec<Biclique>,
}

impl BicliqueList {
    pub fn from_vec(bicliques: Vec<Biclique>) -> Self {
        Self { bicliques }
    }

    /// Parses blocks of two lines (A-side ids, then B-side ids), each block
    /// terminated by a blank line. Runs of blank lines count as one separator.
    /// A block that is not terminated by a blank line is rejected.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut bicliques = Vec::new();
        let mut block: Vec<Vec<Node>> = Vec::with_capacity(2);
        let mut block_start = 0;
        let mut line_number = 0;

        for line in reader.lines() {
            line_number += 1;
            let line = line.map_err(|e| Error::parse(line_number, e.to_string()))?;

            if line.trim().is_empty() {
                if block.is_empty() {
                    continue;
                }

                if block.len() != 2 {
                    return Err(Error::parse(
                        block_start,
                        format!("Block has {} lines; expected exactly 2", block.len()),
                    ));
                }

                let b = block.pop().unwrap_or_default();
                let a = block.pop().unwrap_or_default();
                bicliques.push(Biclique { a, b });
                continue;
            }

            if block.is_empty() {
                block_start = line_number;
            }

            block.push(parse_id_line(&line, line_number)?);
        }

        if !block.is_empty() {
            return Err(Error::parse(
                block_start,
                "Block at end of output is not terminated by a blank line",
            ));
        }

        Ok(Self { bicliques })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for Biclique { a, b } in &self.bicliques {
            write_id_line(&mut writer, a)?;
            write_id_line(&mut writer, b)?;
            writeln!(writer)?;
        }

        writer.flush()
    }

    /// Writes one `|A|<TAB>|B|` line per biclique.
    pub fn write_sizes<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for biclique in &self.bicliques {
            let (a, b) = biclique.size();
            writeln!(writer, "{a}\t{b}")?;
        }

        writer.flush()
    }

    pub fn len(&self) -> usize {
        self.bicliques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bicliques.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Biclique> {
        self.bicliques.iter()
    }

    /// Sorts nodes within each biclique and then the bicliques themselves.
    pub fn canonicalize(&mut self) {
        for biclique in &mut self.bicliques {
            biclique.canonicalize();
        }
        self.bicliques.sort_unstable();
    }

    /// Digest of the canonical form; independent of the order the enumerator
    /// emitted the bicliques in.
    pub fn compute_digest(&self) -> Output<Sha1> {
        let mut canonical = self.clone();
        canonical.canonicalize();

        let mut hasher = Sha1::new();
        for Biclique { a, b } in &canonical.bicliques {
            for side in [a, b] {
                hasher.update((side.len() as u32).to_le_bytes());
                for &node in side {
                    hasher.update(node.to_le_bytes());
                }
            }
        }

        hasher.finalize()
    }
}

impl IntoIterator for BicliqueList {
    type Item = Biclique;
    type IntoIter = std::vec::IntoIter<Biclique>;

    fn into_iter(self) -> Self::IntoIter {
        self.bicliques.into_iter()
    }
}

fn parse_id_line(line: &str, line_number: usize) -> Result<Vec<Node>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<Node>().map_err(|_| {
                Error::parse(line_number, format!("Invalid node id '{token}'"))
            })
        })
        .collect()
}

fn write_id_line<W: Write>(writer: &mut W, ids: &[Node]) -> std::io::Result<()> {
    writeln!(writer, "{}", ids.iter().join(" "))
}
