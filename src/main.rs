use std::path::PathBuf;
use std::process;

use spmv_bench::{BenchConfig, BenchmarkHarness, MatrixMarketReader, Result, Strategy};
use structopt::StructOpt;

#[macro_use]
extern crate log;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "spmv-bench",
    about = "Times serial, static and nnz-balanced CSR SpMV and prints `threads,strategy,p90`"
)]
struct Opt {
    /// Matrix file in matrix market format
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Number of worker threads
    num_threads: usize,

    /// Execution strategy. Options are:
    /// serial, static, nnzbal
    strategy: Strategy,

    /// Number of timed trials
    #[structopt(long, default_value = "10")]
    trials: usize,

    /// Absolute tolerance against the serial reference
    #[structopt(long, default_value = "1e-6")]
    tolerance: f32,

    /// Seed for the random input vector (entropy when omitted)
    #[structopt(long)]
    seed: Option<u64>,

    /// Print a `# <matrix> <rows> <cols> <nnz>` line before the result
    #[structopt(long)]
    header: bool,
}

fn run(opt: &Opt) -> Result<()> {
    let mut config = BenchConfig::with_threads(opt.num_threads)
        .trials(opt.trials)
        .tolerance(opt.tolerance);
    config.seed = opt.seed;

    let matrix = MatrixMarketReader::read_csr(&opt.input)?;
    debug!("{:?}", matrix);

    if opt.header {
        let name = opt
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("# {} {} {} {}", name, matrix.n_rows, matrix.n_cols, matrix.nnz());
    }

    let harness = BenchmarkHarness::with_random_vector(&matrix, config)?;
    let summary = harness.run(opt.strategy)?;
    println!("{}", summary);

    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let opt = Opt::from_args();
    info!("{:?}", opt);

    if let Err(err) = run(&opt) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
