use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "layersplit", version)]
#[command(about = "Split an RGBA image into front and back 4-bit layers")]
struct Cli {
    /// Source RGBA image.
    source: PathBuf,

    /// Output path for the front layer.
    front: PathBuf,

    /// Output path for the back layer.
    back: PathBuf,

    /// JSON options file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-channel colour search.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Alpha pairs scored per pixel.
    #[arg(long, value_enum)]
    alpha_order: Option<AlphaOrderArg>,

    /// Only score alpha pairs within this many levels of the source alpha (1-15).
    #[arg(long)]
    alpha_tolerance: Option<u8>,

    /// Solve anti-diagonals in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Also write the composited reconstruction to this path.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Log more (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    HillClimb,
    Exhaustive,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlphaOrderArg {
    Full,
    BackAtLeastFront,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let opts = build_opts(&cli)?;
    let source = layersplit::load_source(&cli.source)?;
    let (layers, report) = layersplit::split(&source, &opts)?;
    layersplit::write_layers(&cli.front, &cli.back, &layers)?;

    if let Some(preview) = &cli.preview {
        let composite = layersplit::composite_layers(&layers)?;
        layersplit::write_rgba8(preview, &composite)
            .with_context(|| format!("write preview '{}'", preview.display()))?;
    }

    eprintln!(
        "wrote {} and {} ({}x{}, error {:.6})",
        cli.front.display(),
        cli.back.display(),
        report.width,
        report.height,
        report.total_error.to_f64()
    );
    Ok(())
}

fn build_opts(cli: &Cli) -> anyhow::Result<layersplit::SplitOpts> {
    let mut opts = match &cli.config {
        Some(path) => layersplit::SplitOpts::from_path(path)?,
        None => layersplit::SplitOpts::default(),
    };
    if let Some(strategy) = cli.strategy {
        opts.strategy = match strategy {
            StrategyArg::HillClimb => layersplit::SearchStrategy::HillClimb,
            StrategyArg::Exhaustive => layersplit::SearchStrategy::Exhaustive,
        };
    }
    if let Some(order) = cli.alpha_order {
        opts.alpha_order = match order {
            AlphaOrderArg::Full => layersplit::AlphaOrder::Full,
            AlphaOrderArg::BackAtLeastFront => layersplit::AlphaOrder::BackAtLeastFront,
        };
    }
    if cli.alpha_tolerance.is_some() {
        opts.alpha_tolerance = cli.alpha_tolerance;
    }
    if cli.parallel {
        opts.parallel = true;
    }
    if cli.threads.is_some() {
        opts.threads = cli.threads;
    }
    opts.validate()?;
    Ok(opts)
}
