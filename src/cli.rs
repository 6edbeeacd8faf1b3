use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atspool", version)]
#[command(about = "Grade against-the-spread NFL pool picks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// More logging (-v debug, -vv trace). RUST_LOG also works.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Directory holding the {season}.json pick files
    #[arg(long, env = "ATSPOOL_PICKS_DIR", default_value = "picks", global = true)]
    pub picks_dir: PathBuf,

    /// Team alias table (JSON) to use instead of the built-in NFL table
    #[arg(long, env = "ATSPOOL_ALIASES", global = true)]
    pub aliases: Option<PathBuf>,

    /// Only search the pool week and its neighbours, never the whole season
    #[arg(long, env = "ATSPOOL_NO_SWEEP", global = true)]
    pub no_sweep: bool,

    /// Count |margin - spread| < EPS as a push instead of requiring equality
    #[arg(long, env = "ATSPOOL_PUSH_EPSILON", value_name = "EPS", global = true)]
    pub push_epsilon: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a pasted pick sheet and show what was understood
    Parse {
        /// File to read, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Print the slate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a pick sheet and save it as one week of the season file
    Import {
        #[arg(short, long)]
        season: Option<u16>,
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=22))]
        week: u8,
        /// File to read, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Grade a saved week against ESPN results
    Grade {
        /// Season year (default: ESPN's current season)
        #[arg(short, long)]
        season: Option<u16>,
        /// Pool week (default: latest week with saved picks)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=22))]
        week: Option<u8>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Re-grade every SECS seconds until interrupted
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(5..))]
        watch: Option<u64>,
    },
    /// List the weeks that have saved picks
    Weeks {
        #[arg(short, long)]
        season: Option<u16>,
    },
}
