// scripts/explore.rs
use clap::{Args, Parser, Subcommand};
use lorenz_chaos::interactive::{lorenz63_surface, lorenz96_surface, SummaryRenderer};
use lorenz_chaos::output::CsvRenderer;
use lorenz_chaos::settings::Settings;
use lorenz_chaos::{logging, ChaosResult};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

/// Integrate Lorenz-63 ensembles or Lorenz-96 trajectories and write CSV output.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file layered under `LORENZ_*` environment variables
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Output directory (overrides the settings file)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Worker threads for ensemble integration (defaults to the CPU count)
    #[arg(long)]
    threads: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ensemble of perturbed Lorenz-63 trajectories
    L63(Lorenz63Args),
    /// Single Lorenz-96 trajectory started from a perturbed rest state
    L96(Lorenz96Args),
}

#[derive(Debug, Args)]
struct Lorenz63Args {
    #[arg(long)]
    sigma: Option<f64>,
    #[arg(long)]
    beta: Option<f64>,
    #[arg(long)]
    rho: Option<f64>,
    /// Ensemble size
    #[arg(short = 'n', long = "members")]
    members: Option<f64>,
    /// Perturbation scale
    #[arg(long)]
    eps: Option<f64>,
    /// Integration span
    #[arg(short = 't', long = "t-end")]
    t_end: Option<f64>,
}

#[derive(Debug, Args)]
struct Lorenz96Args {
    /// Number of variables on the ring
    #[arg(short = 'm', long)]
    m: Option<f64>,
    #[arg(long)]
    force: Option<f64>,
    #[arg(long)]
    eps: Option<f64>,
    #[arg(short = 't', long = "t-end")]
    t_end: Option<f64>,
}

fn collect<'a>(pairs: &[(&'a str, Option<f64>)]) -> Vec<(&'a str, f64)> {
    pairs
        .iter()
        .filter_map(|&(name, value)| value.map(|v| (name, v)))
        .collect()
}

fn run(cli: Cli) -> ChaosResult<()> {
    let settings = Settings::load(cli.settings.as_deref())?;
    let threads = cli.threads.unwrap_or_else(num_cpus::get);
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        warn!(%err, "could not size the rayon pool, using its defaults");
    }

    let dir = cli.out.unwrap_or_else(|| settings.output.dir.clone());
    let prefix = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let mut csv = CsvRenderer::new(&dir, prefix, settings.output.flags());
    csv.bins = settings.output.bins;
    let summary = SummaryRenderer {
        bins: settings.output.bins,
    };

    match cli.command {
        Command::L63(args) => {
            let changes = collect(&[
                ("sigma", args.sigma),
                ("beta", args.beta),
                ("rho", args.rho),
                ("N", args.members),
                ("eps", args.eps),
                ("T", args.t_end),
            ]);
            let mut surface = lorenz63_surface(settings.lorenz63.clone(), (csv, summary));
            if let Some(run) = surface.update(&changes)? {
                info!(
                    members = run.trajectory.members(),
                    samples = run.trajectory.steps(),
                    dir = %dir.display(),
                    "lorenz-63 output written"
                );
            }
        }
        Command::L96(args) => {
            let changes = collect(&[
                ("m", args.m),
                ("Force", args.force),
                ("eps", args.eps),
                ("T", args.t_end),
            ]);
            let mut surface = lorenz96_surface(settings.lorenz96.clone(), (csv, summary));
            if let Some(run) = surface.update(&changes)? {
                info!(
                    m = run.config.params.m,
                    samples = run.trajectory.steps(),
                    dir = %dir.display(),
                    "lorenz-96 output written"
                );
            }
        }
    }
    Ok(())
}

fn main() {
    logging::init(LevelFilter::INFO);
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(%err, "lorenz-explore failed");
        std::process::exit(1);
    }
}
