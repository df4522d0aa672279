mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forumlens_core::Granularity;

#[derive(Debug, Parser)]
#[command(name = "forumlens")]
#[command(about = "Forum engagement and sentiment analytics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every stage and write all reports
    Run {
        /// Time bucket for activity and sentiment series (day, week, month)
        #[arg(long)]
        period: Option<Granularity>,

        /// Trending window length in days
        #[arg(long)]
        window_days: Option<u32>,

        /// Number of trending topics to keep
        #[arg(long)]
        top_n: Option<usize>,

        /// Output directory, overriding FORUMLENS_OUTPUT_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score every post with the lexicon classifier and write the scores
    Score {
        /// Output directory, overriding FORUMLENS_OUTPUT_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print activity and trending topics without writing files
    Trends {
        #[arg(long)]
        period: Option<Granularity>,
    },
    /// Print the executive summary as JSON
    Insights,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("forumlens: no command given, try `forumlens --help`");
        return Ok(());
    };

    let mut app = forumlens_core::load_app_config()?;
    let _guard =
        logging::init_tracing(&app.log_level, app.env.json_logs(), app.log_dir.as_deref())?;
    let mut analytics = commands::load_analytics(&app)?;

    match command {
        Commands::Run {
            period,
            window_days,
            top_n,
            out,
        } => {
            commands::apply_overrides(&mut analytics, period, window_days, top_n)?;
            if let Some(out) = out {
                app.output_dir = out;
            }
            commands::run(&app, &analytics)
        }
        Commands::Score { out } => {
            if let Some(out) = out {
                app.output_dir = out;
            }
            commands::score(&app, &analytics)
        }
        Commands::Trends { period } => {
            commands::apply_overrides(&mut analytics, period, None, None)?;
            commands::trends(&app, &analytics)
        }
        Commands::Insights => commands::insights(&app, &analytics),
    }
}
