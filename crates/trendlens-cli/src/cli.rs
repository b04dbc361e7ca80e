//! CLI argument definitions for trendlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Full analysis of one entity |
//! | `batch` | Analyze many entities from a JSON file and rank them |
//! | `decompose` | Trend/seasonal/residual split of one series |
//! | `correlate` | Long- and short-term price/interest correlation |
//! | `format` | Render magnitudes and growth percentages |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--config` | none | JSON file with analysis settings |
//!
//! # Examples
//!
//! ```bash
//! trendlens analyze --entity AAPL --interest interest.txt --price prices.txt --pretty
//! trendlens decompose --input interest.txt --granularity weekly --period 7
//! trendlens format magnitude 7200000000
//! trendlens format growth none
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use trendlens_core::{Granularity, SourceKind, Window};

/// Keyword interest versus price analytics.
#[derive(Debug, Parser)]
#[command(
    name = "trendlens",
    author,
    version,
    about = "Keyword interest versus price analytics",
    long_about = "trendlens compares a keyword or hashtag interest series against a daily \
price series. It decomposes the interest series into trend, seasonal and residual \
components, aligns both calendars, and reports long- and short-term correlation.\n\
\n\
Series files contain comma-separated 'MM/DD/YYYY: value' tokens.\n\
\n\
Use 'trendlens <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// JSON file with analysis settings (short window, alignment, STL spans).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse, decompose, align and correlate one entity.
    ///
    /// # Examples
    ///
    ///   trendlens analyze --entity AAPL --interest interest.txt --price prices.txt
    ///   trendlens analyze --entity "#stanley" --kind social-views --granularity weekly \
    ///     --interest views.txt --price prices.txt
    Analyze(AnalyzeArgs),

    /// Analyze every request in a JSON array and rank the summaries.
    Batch(BatchArgs),

    /// Decompose one interest series.
    Decompose(DecomposeArgs),

    /// Correlate price against interest without decomposing.
    Correlate(CorrelateArgs),

    /// Formatting helpers.
    Format(FormatArgs),
}

/// Inputs shared by `analyze` and `correlate`.
#[derive(Debug, Args)]
pub struct SeriesPairArgs {
    /// Ticker, keyword or hashtag the series belong to.
    #[arg(long)]
    pub entity: String,

    /// File holding the interest series.
    #[arg(long)]
    pub interest: PathBuf,

    /// File holding the daily price series.
    #[arg(long)]
    pub price: PathBuf,

    /// Cadence of the interest series.
    #[arg(long, default_value_t = Granularity::Monthly)]
    pub granularity: Granularity,

    /// Source of the interest series.
    #[arg(long, default_value_t = SourceKind::SearchVolume)]
    pub kind: SourceKind,

    /// Trailing window for the short-term correlation, e.g. 2m, 6w, 30d.
    #[arg(long)]
    pub short_window: Option<Window>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub series: SeriesPairArgs,

    /// File holding an externally forecast continuation of the interest series.
    #[arg(long)]
    pub projected: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON array of analysis requests.
    #[arg(long)]
    pub input: PathBuf,

    /// Ordering of the summaries, e.g. yoy-growth-desc or alphabetical-asc.
    #[arg(long, default_value = "yoy-growth-desc")]
    pub sort: String,
}

#[derive(Debug, Args)]
pub struct DecomposeArgs {
    /// File holding the series to decompose.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value_t = Granularity::Monthly)]
    pub granularity: Granularity,

    #[arg(long, default_value_t = SourceKind::SearchVolume)]
    pub kind: SourceKind,

    /// Observations per seasonal cycle; defaults by granularity.
    #[arg(long)]
    pub period: Option<usize>,

    /// Keep unrounded components.
    #[arg(long, default_value_t = false)]
    pub exact: bool,
}

#[derive(Debug, Args)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub series: SeriesPairArgs,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    #[command(subcommand)]
    pub command: FormatCommand,
}

#[derive(Debug, Subcommand)]
pub enum FormatCommand {
    /// Render an integer with a K/M/B suffix.
    Magnitude {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Render a growth percentage; `none` means unbounded growth.
    Growth {
        #[arg(allow_negative_numbers = true)]
        pct: String,
    },
}
