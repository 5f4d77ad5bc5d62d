use super::graph::*;
use std::io::Write;

/// Writes one edge per line as `a<TAB>b`. Order and duplicates are kept as given,
/// since `sbtest` consumes the file as is.
pub fn edge_writer<W: Write>(
    mut writer: W,
    edges: impl Iterator<Item = Edge>,
) -> Result<NumEdges, std::io::Error> {
    let mut num_edges: NumEdges = 0;

    for Edge(a, b) in edges {
        writeln!(writer, "{a}\t{b}")?;
        num_edges += 1;
    }

    if num_edges == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "No edges to write",
        ));
    }

    writer.flush()?;
    Ok(num_edges)
}
