use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use itertools::Itertools;
use maximal_bicliques::{
    label_reader::{read_label_edges, InputFormat},
    Config, Enumerator, ExternalEnumerator, MaximalBicliques, MbeaEnumerator,
};
use serde::Serialize;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    Text,
    Json,
}

/// Enumerates the maximal bicliques of a bipartite graph given as an edge list
/// of (A-label, B-label) pairs.
#[derive(StructOpt)]
struct Opts {
    /// Edge list to read; `-` reads from stdin
    #[structopt(parse(from_os_str))]
    edges: PathBuf,

    #[structopt(long, default_value = "text")]
    input_format: InputFormat,

    #[structopt(short, long, default_value = "text")]
    format: OutputFormat,

    /// Directory containing the sbtest executable [env: SBTEST_DIR]
    #[structopt(short, long)]
    sbtest_dir: Option<PathBuf>,

    /// Program to run inside the sbtest directory [env: SBTEST_EXECUTABLE]
    #[structopt(long)]
    executable: Option<String>,

    /// Enumerate within this process instead of running sbtest
    #[structopt(long)]
    in_process: bool,

    /// Keep the files exchanged with the enumerator [env: BICLIQUES_STORE_TEMPS]
    #[structopt(long)]
    store_temps: bool,

    #[structopt(long)]
    temp_dir: Option<PathBuf>,

    #[structopt(long)]
    input_path: Option<PathBuf>,

    #[structopt(long)]
    output_path: Option<PathBuf>,

    #[structopt(long)]
    sizes_path: Option<PathBuf>,
}

impl Opts {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env().context("Reading configuration from environment")?;

        if let Some(dir) = &self.sbtest_dir {
            config.sbtest_dir = dir.clone();
        }
        if let Some(executable) = &self.executable {
            config.executable = executable.clone();
        }
        if self.temp_dir.is_some() {
            config.temp_dir = self.temp_dir.clone();
        }
        if self.input_path.is_some() {
            config.input_path = self.input_path.clone();
        }
        if self.output_path.is_some() {
            config.output_path = self.output_path.clone();
        }
        if self.sizes_path.is_some() {
            config.sizes_path = self.sizes_path.clone();
        }
        config.store_temps |= self.store_temps;

        Ok(config)
    }
}

#[derive(Serialize)]
struct JsonBiclique<'a> {
    a: &'a [String],
    b: &'a [String],
}

fn read_edges(opts: &Opts) -> anyhow::Result<Vec<(String, String)>> {
    let reader: Box<dyn BufRead> = if opts.edges.as_os_str() == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = File::open(&opts.edges)
            .with_context(|| format!("Opening edge list {:?}", opts.edges))?;
        Box::new(BufReader::new(file))
    };

    Ok(read_label_edges(reader, opts.input_format)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maximal_bicliques=info,bicliques=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::from_args();
    let config = opts.config()?;

    let edges = read_edges(&opts)?;
    info!("Read {} edges from {:?}", edges.len(), opts.edges);

    let enumerator: Box<dyn Enumerator> = if opts.in_process {
        Box::new(MbeaEnumerator::new())
    } else {
        Box::new(ExternalEnumerator::from_config(&config))
    };

    let mut maxbi = MaximalBicliques::with_enumerator(config, enumerator);
    maxbi
        .calculate(&edges)
        .context("Computing maximal bicliques")?;

    let summary = maxbi.summary();
    info!(
        "unique nodes: {:?}, edges: {}, bicliques: {}",
        summary.num_unique_nodes, summary.num_edges, summary.num_bicliques
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match opts.format {
        OutputFormat::Text => {
            for (a, b) in maxbi.bicliques() {
                writeln!(out, "{}", a.iter().join(" "))?;
                writeln!(out, "{}", b.iter().join(" "))?;
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            let bicliques = maxbi
                .bicliques()
                .iter()
                .map(|(a, b)| JsonBiclique { a, b })
                .collect_vec();

            serde_json::to_writer_pretty(
                &mut out,
                &serde_json::json!({ "summary": summary, "bicliques": bicliques }),
            )?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
