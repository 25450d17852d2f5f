//! CLI for scoring generated 3D point clouds against a reference set.

mod commands;
mod data;
mod utils;

use clap::Parser;

use commands::Commands;
use gen_metrics::EvalConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The random seed for subsampling points. A negative seed gives an
    /// unseeded run.
    #[arg(short('s'), long, default_value_t = 41, allow_negative_numbers = true)]
    seed: i64,

    /// The number of points each cloud is subsampled to.
    #[arg(short('n'), long, default_value_t = 2048)]
    n_points: usize,

    /// The number of clouds per batched distance computation.
    #[arg(short('b'), long, default_value_t = 50)]
    batch_size: usize,

    /// The distance backend: `auto`, `reference` or `parallel`.
    #[arg(long, default_value = "auto")]
    backend: String,

    /// Optional budget, in bytes, for the distance buffer of one batch.
    #[arg(long)]
    memory_limit: Option<usize>,

    /// Whether to also compute the Earth Mover's Distance.
    #[arg(short('e'), long, default_value_t = false)]
    emd: bool,

    /// The name of the log file, written under `./logs`.
    #[arg(long, default_value = "gen-metrics")]
    log_name: String,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

impl Args {
    /// The settings shared by every subcommand.
    fn config(&self) -> EvalConfig {
        EvalConfig {
            n_points: self.n_points,
            batch_size: self.batch_size,
            compute_emd: self.emd,
            seed: self.seed,
            memory_limit: self.memory_limit,
            backend: self.backend.clone(),
            ..EvalConfig::default()
        }
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    println!("Args: {args:?}");

    let (_guard, log_path) = utils::configure_logger(&args.log_name)?;
    println!("Log file: {}", log_path.display());
    ftlog::info!("{args:?}");

    let config = args.config();
    match args.command {
        Commands::Evaluate {
            ref_path,
            gen_path,
            category,
            method,
            k,
            sqrt,
            paired,
            out_path,
        } => {
            let config = EvalConfig {
                k,
                sqrt,
                paired,
                category,
                method,
                ..config
            };
            commands::evaluate::run(&config, &ref_path, &gen_path, out_path.as_deref())?;
        }
        Commands::Pairwise {
            inp_path,
            other_path,
            out_dir,
        } => commands::pairwise::run(&config, &inp_path, other_path.as_deref(), &out_dir)?,
    }

    Ok(())
}
