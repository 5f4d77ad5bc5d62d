pub mod codec;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod label_reader;
pub mod maximal_bicliques;
pub mod sbtest;
pub mod temp_files;

pub use codec::LabelCodec;
pub use config::Config;
pub use enumerator::{Enumerator, ExternalEnumerator, MbeaEnumerator};
pub use error::{Error, Result};
pub use maximal_bicliques::{LabeledBiclique, MaximalBicliques, Stage, Summary};
