use std::fs::File;
use std::hash::Hash;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use crate::codec::LabelCodec;
use crate::config::Config;
use crate::enumerator::{Enumerator, ExternalEnumerator, MbeaEnumerator};
use crate::error::{Error, Result};
use crate::sbtest::{edge_writer::edge_writer, graph::*, BicliqueList};
use crate::temp_files::TransientFiles;

pub type LabeledBiclique<A, B> = (Vec<A>, Vec<B>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum Stage {
    Idle,
    Serializing,
    Invoking,
    Parsing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub run_id: Option<Uuid>,
    pub enumerator: String,
    pub stage: Stage,
    pub num_unique_nodes: (NumNodes, NumNodes),
    pub num_edges: NumEdges,
    pub num_bicliques: usize,
    pub digest: Option<String>,
}

/// Computes the maximal bicliques of a bipartite graph given as a list of
/// label pairs. Labels are mapped to ids, handed to the enumerator through
/// files, and the result is mapped back.
///
/// The state of the last call to [`MaximalBicliques::calculate`] (counters,
/// label codec, result) is kept until the next call.
pub struct MaximalBicliques<A, B, E = ExternalEnumerator> {
    config: Config,
    enumerator: E,
    stage: Stage,

    run_id: Option<Uuid>,
    codec: Option<LabelCodec<A, B>>,
    num_unique_nodes: (NumNodes, NumNodes),
    num_edges: NumEdges,
    bicliques: Vec<LabeledBiclique<A, B>>,
    digest: Option<String>,
    stored_temps: Option<[PathBuf; 3]>,
}

impl<A, B> MaximalBicliques<A, B, ExternalEnumerator>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
{
    pub fn new(config: Config) -> Self {
        let enumerator = ExternalEnumerator::from_config(&config);
        Self::with_enumerator(config, enumerator)
    }
}

impl<A, B> MaximalBicliques<A, B, MbeaEnumerator>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
{
    /// Enumerates without leaving the process; only the file settings of
    /// `config` are used.
    pub fn in_process(config: Config) -> Self {
        Self::with_enumerator(config, MbeaEnumerator::new())
    }
}

impl<A, B, E> MaximalBicliques<A, B, E>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
    E: Enumerator,
{
    pub fn with_enumerator(config: Config, enumerator: E) -> Self {
        Self {
            config,
            enumerator,
            stage: Stage::Idle,
            run_id: None,
            codec: None,
            num_unique_nodes: (0, 0),
            num_edges: 0,
            bicliques: Vec::new(),
            digest: None,
            stored_temps: None,
        }
    }

    /// Runs the whole pipeline and blocks until the enumerator is done. Any
    /// failure is final for this call; transient files are removed on every
    /// path unless `store_temps` is set.
    pub fn calculate(&mut self, edge_list: &[(A, B)]) -> Result<&[LabeledBiclique<A, B>]> {
        let run_id = Uuid::new_v4();
        let span = info_span!("calculate", %run_id, enumerator = self.enumerator.name());
        let _guard = span.enter();

        self.reset(run_id);

        match self.run(edge_list, run_id) {
            Ok(()) => {
                self.transition(Stage::Done);
                info!(
                    "Found {} maximal bicliques on {:?} nodes and {} edges",
                    self.bicliques.len(),
                    self.num_unique_nodes,
                    self.num_edges
                );
                Ok(self.bicliques.as_slice())
            }
            Err(e) => {
                error!("Computation failed in stage {}: {e}", self.stage);
                self.transition(Stage::Failed);
                Err(e)
            }
        }
    }

    fn reset(&mut self, run_id: Uuid) {
        self.stage = Stage::Idle;
        self.run_id = Some(run_id);
        self.codec = None;
        self.num_unique_nodes = (0, 0);
        self.num_edges = 0;
        self.bicliques.clear();
        self.digest = None;
        self.stored_temps = None;
    }

    fn transition(&mut self, stage: Stage) {
        debug!("{} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn run(&mut self, edge_list: &[(A, B)], run_id: Uuid) -> Result<()> {
        self.transition(Stage::Serializing);
        self.num_edges = edge_list.len() as NumEdges;

        let codec = LabelCodec::from_edges(edge_list)?;
        self.num_unique_nodes = codec.num_unique_nodes();

        let files = TransientFiles::create(&self.config, run_id)?;
        {
            let file = File::create(files.input()).map_err(Error::io(files.input()))?;
            edge_writer(BufWriter::new(file), codec.edges().iter().copied())
                .map_err(Error::io(files.input()))?;
        }

        self.transition(Stage::Invoking);
        self.enumerator
            .enumerate(files.input(), files.output(), files.sizes())?;

        self.transition(Stage::Parsing);
        let list = {
            let file = File::open(files.output()).map_err(Error::io(files.output()))?;
            BicliqueList::read(BufReader::new(file))?
        };

        self.bicliques = list
            .iter()
            .map(|biclique| -> Result<LabeledBiclique<A, B>> {
                Ok((codec.decode_a(&biclique.a)?, codec.decode_b(&biclique.b)?))
            })
            .collect::<Result<_>>()?;
        self.digest = Some(format!("{:x}", list.compute_digest()));
        self.codec = Some(codec);

        if files.keeps_files() {
            info!(
                "Keeping transient files: input={:?} output={:?} sizes={:?}",
                files.input(),
                files.output(),
                files.sizes()
            );
            self.stored_temps = Some(files.into_paths());
        }

        Ok(())
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn num_unique_nodes(&self) -> (NumNodes, NumNodes) {
        self.num_unique_nodes
    }

    pub fn num_edges(&self) -> NumEdges {
        self.num_edges
    }

    pub fn num_bicliques(&self) -> usize {
        self.bicliques.len()
    }

    pub fn bicliques(&self) -> &[LabeledBiclique<A, B>] {
        &self.bicliques
    }

    pub fn codec(&self) -> Option<&LabelCodec<A, B>> {
        self.codec.as_ref()
    }

    /// Only set after a successful run with `store_temps`
    pub fn stored_temps(&self) -> Option<&[PathBuf; 3]> {
        self.stored_temps.as_ref()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            run_id: self.run_id,
            enumerator: self.enumerator.name().to_string(),
            stage: self.stage,
            num_unique_nodes: self.num_unique_nodes,
            num_edges: self.num_edges,
            num_bicliques: self.bicliques.len(),
            digest: self.digest.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            temp_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        }
    }

    fn count_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    fn strings(edges: &[(&str, &str)]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    /// Writes a fixed output regardless of the input
    struct CannedEnumerator(&'static str);

    impl Enumerator for CannedEnumerator {
        fn name(&self) -> &str {
            "canned"
        }

        fn enumerate(&self, _input: &Path, output: &Path, _sizes: &Path) -> Result<()> {
            std::fs::write(output, self.0).map_err(Error::io(output))
        }
    }

    struct FailingEnumerator;

    impl Enumerator for FailingEnumerator {
        fn name(&self) -> &str {
            "failing"
        }

        fn enumerate(&self, input: &Path, _output: &Path, _sizes: &Path) -> Result<()> {
            assert!(input.exists());
            Err(Error::ProcedureLaunch {
                program: "failing".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            })
        }
    }

    #[test]
    fn counters() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::in_process(config_in(&dir));
        assert_eq!(mb.stage(), Stage::Idle);

        let edges = strings(&[
            ("beef", "iron"),
            ("pork", "iron"),
            ("beef", "zinc"),
            ("pork", "zinc"),
            ("lamb", "iron"),
            ("beef", "iron"),
        ]);

        mb.calculate(&edges).unwrap();

        assert_eq!(mb.stage(), Stage::Done);
        assert_eq!(mb.num_unique_nodes(), (3, 2));
        assert_eq!(mb.num_edges(), 6);
        assert_eq!(mb.num_bicliques(), 2);

        let mut found: Vec<_> = mb
            .bicliques()
            .iter()
            .map(|(a, b)| {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                (a, b)
            })
            .collect();
        found.sort();

        assert_eq!(
            found,
            vec![
                (
                    vec!["beef".to_string(), "lamb".to_string(), "pork".to_string()],
                    vec!["iron".to_string()]
                ),
                (
                    vec!["beef".to_string(), "pork".to_string()],
                    vec!["iron".to_string(), "zinc".to_string()]
                ),
            ]
        );

        let codec = mb.codec().unwrap();
        assert_eq!(codec.a_id(&"lamb".to_string()), Some(2));
        assert_eq!(codec.b_label(1), Some(&"zinc".to_string()));

        assert_eq!(count_files(&dir), 0);
    }

    #[test]
    fn single_edge() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::in_process(config_in(&dir));

        let result = mb.calculate(&[("a", 1)]).unwrap();
        assert_eq!(result, &[(vec!["a"], vec![1])]);
        assert_eq!(mb.num_unique_nodes(), (1, 1));
        assert_eq!(mb.num_edges(), 1);
        assert_eq!(mb.num_bicliques(), 1);
    }

    #[test]
    fn idempotent_without_leftovers() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::in_process(config_in(&dir));
        let edges: Vec<(u32, u32)> = (0..8)
            .flat_map(|a| (0..6).map(move |b| (a, b)))
            .filter(|(a, b)| (a + 2 * b) % 3 != 0)
            .collect();

        mb.calculate(&edges).unwrap();
        let first = mb.summary();
        assert_eq!(count_files(&dir), 0);

        mb.calculate(&edges).unwrap();
        let second = mb.summary();
        assert_eq!(count_files(&dir), 0);

        assert_eq!(first.num_bicliques, second.num_bicliques);
        assert_eq!(first.digest, second.digest);
        assert_ne!(first.run_id, second.run_id);
    }

    #[test]
    fn store_temps() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::in_process(config_in(&dir).with_store_temps(true));

        mb.calculate(&[("a", "x"), ("b", "x")]).unwrap();
        assert_eq!(count_files(&dir), 3);

        let [input, output, sizes] = mb.stored_temps().unwrap().clone();
        assert_eq!(std::fs::read_to_string(input).unwrap(), "0\t0\n1\t0\n");
        assert_eq!(std::fs::read_to_string(output).unwrap(), "0 1\n0\n\n");
        assert_eq!(std::fs::read_to_string(sizes).unwrap(), "2\t1\n");
    }

    #[test]
    fn empty_input() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::<String, String, _>::in_process(config_in(&dir));

        assert!(matches!(mb.calculate(&[]), Err(Error::InvalidInput(_))));
        assert_eq!(mb.stage(), Stage::Failed);
        assert_eq!(count_files(&dir), 0);
    }

    #[test]
    #[traced_test]
    fn enumerator_failure_cleans_up() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::with_enumerator(config_in(&dir), FailingEnumerator);

        let err = mb.calculate(&[("a", "x")]).unwrap_err();
        assert!(matches!(err, Error::ProcedureLaunch { .. }));
        assert_eq!(mb.stage(), Stage::Failed);
        assert_eq!(mb.num_bicliques(), 0);
        assert_eq!(count_files(&dir), 0);
        assert!(logs_contain("Computation failed in stage Invoking"));
    }

    #[test]
    fn parse_failure_cleans_up() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb =
            MaximalBicliques::with_enumerator(config_in(&dir), CannedEnumerator("0\n0\n0\n\n"));

        let err = mb.calculate(&[("a", "x")]).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(mb.stage(), Stage::Failed);
        assert_eq!(count_files(&dir), 0);
    }

    #[test]
    fn unknown_id_in_output() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb =
            MaximalBicliques::with_enumerator(config_in(&dir), CannedEnumerator("0\n7\n\n"));

        let err = mb.calculate(&[("a", "x")]).unwrap_err();
        assert!(matches!(err, Error::UnknownId { side: "B", id: 7, .. }));
        assert_eq!(count_files(&dir), 0);
    }

    #[test]
    fn largest_id_in_output() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::with_enumerator(
            config_in(&dir),
            CannedEnumerator("4294967295\n0\n\n"),
        );

        let err = mb.calculate(&[("a", "x")]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownId {
                side: "A",
                id: u32::MAX,
                num_nodes: 1
            }
        ));
        assert_eq!(mb.stage(), Stage::Failed);
        assert_eq!(mb.summary().digest, None);
        assert!(mb.codec().is_none());
        assert_eq!(count_files(&dir), 0);
    }

    #[test]
    fn failure_keeps_files_when_requested() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::with_enumerator(
            config_in(&dir).with_store_temps(true),
            FailingEnumerator,
        );

        assert!(mb.calculate(&[("a", "x")]).is_err());
        assert_eq!(count_files(&dir), 3);
        assert!(mb.stored_temps().is_none());
    }

    #[test]
    fn summary_serializes() {
        let dir = TempDir::new().expect("create temp dir");
        let mut mb = MaximalBicliques::in_process(config_in(&dir));
        mb.calculate(&[(1, 2), (3, 2)]).unwrap();

        let json = serde_json::to_value(mb.summary()).unwrap();
        assert_eq!(json["enumerator"], "mbea");
        assert_eq!(json["stage"], "Done");
        assert_eq!(json["num_unique_nodes"], serde_json::json!([2, 1]));
        assert_eq!(json["num_edges"], 2);
        assert_eq!(json["num_bicliques"], 1);
        assert_eq!(json["digest"].as_str().unwrap().len(), 40);
    }
}
