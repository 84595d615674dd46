use anyhow::{Context, Result};
use clap::Parser;
use ivtscan::{clean, detect, ingest, plot, report, stats};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Traffic-quality CSV analyzer: cleaning, summaries, and IVT anomaly flagging"
)]
struct Args {
    /// Daily traffic-quality CSV export to analyze
    input: PathBuf,

    /// Directory the diagnostic charts are written to
    #[arg(long, default_value = "graphs")]
    graphs_dir: PathBuf,

    /// Days with IVT above this fraction are flagged outright
    #[arg(long, default_value_t = detect::HIGH_IVT_THRESHOLD)]
    ivt_threshold: f64,

    /// Standard deviations above the mean for the statistical outlier test
    #[arg(long, default_value_t = detect::OUTLIER_SIGMA)]
    outlier_sigma: f64,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    info!(input = %args.input.display(), "startup");

    // ─── 2) load + clean ─────────────────────────────────────────────
    let raw = ingest::load_csv(&args.input)?;
    let table = clean::clean(&raw).context("cleaning traffic export")?;
    report::print_overview(&table);

    // ─── 3) summaries ────────────────────────────────────────────────
    report::print_summary(&stats::describe(&table));
    report::print_correlations(&stats::correlation_matrix(&table));

    // ─── 4) diagnostic charts ────────────────────────────────────────
    plot::render_all(&table, &args.graphs_dir)?;

    // ─── 5) anomaly views ────────────────────────────────────────────
    let high = detect::high_ivt(&table, args.ivt_threshold);
    report::print_high_ivt(&high, args.ivt_threshold);

    let outliers = detect::statistical_outliers(&table, args.outlier_sigma)
        .context("flagging statistical outliers")?;
    report::print_outliers(&outliers);

    info!(
        high_ivt_days = high.len(),
        outlier_days = outliers.len(),
        "done"
    );
    Ok(())
}
