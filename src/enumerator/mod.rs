//! Procedures that turn an edge file into a biclique file and a size file.

use std::path::Path;

use crate::error::Result;

pub mod external;
pub mod mbea;

pub use external::ExternalEnumerator;
pub use mbea::MbeaEnumerator;

/// Something that enumerates the maximal bicliques of the graph stored in
/// `input` and writes them to `output` (blocks of two id lines, each followed
/// by a blank line) and their sizes to `sizes`.
///
/// Calls block until the enumeration is finished.
pub trait Enumerator {
    fn name(&self) -> &str;

    fn enumerate(&self, input: &Path, output: &Path, sizes: &Path) -> Result<()>;
}

impl<E: Enumerator + ?Sized> Enumerator for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn enumerate(&self, input: &Path, output: &Path, sizes: &Path) -> Result<()> {
        (**self).enumerate(input, output, sizes)
    }
}
