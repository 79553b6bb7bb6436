//! retrofx CLI - Headless playback of particle scenarios

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{simulate, tables, validate};

#[derive(Parser)]
#[command(name = "retrofx")]
#[command(about = "Replay retro sprite, bullet and weather simulations without a renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and report what it drew
    Simulate {
        /// Path to scenario file
        scenario: String,

        /// Number of host frames to run
        #[arg(long, default_value = "300")]
        frames: u64,

        /// Host frame length in milliseconds
        #[arg(long, default_value = "16.666667")]
        delta_ms: f64,

        /// Output format (summary or json)
        #[arg(long, default_value = "summary", value_parser = parse_format)]
        format: String,

        /// Print every Nth frame in summary output
        #[arg(long, default_value = "30")]
        every: u64,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check that a scenario loads and all its references resolve
    Validate {
        /// Path to scenario file
        scenario: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_report_format)]
        format: String,
    },

    /// Print the builtin config tables
    Tables {
        /// Which table to print (bullets or flipbooks); both when omitted
        table: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_report_format)]
        format: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "summary" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: summary, json", s)),
    }
}

fn parse_report_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            scenario,
            frames,
            delta_ms,
            format,
            every,
            output,
        } => simulate::run(simulate::SimulateArgs {
            scenario,
            frames,
            delta_ms,
            format,
            every,
            output,
        }),
        Commands::Validate { scenario, format } => validate::run(&scenario, &format),
        Commands::Tables { table, format } => tables::run(table.as_deref(), &format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_commands_reject_unknown_format() {
        assert!(Cli::try_parse_from(["retrofx", "validate", "a.toml", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["retrofx", "tables", "--format", "xml"]).is_err());
        // simulate speaks summary, not text
        assert!(Cli::try_parse_from(["retrofx", "simulate", "a.toml", "--format", "text"]).is_err());
    }

    #[test]
    fn report_commands_accept_text_and_json() {
        let cli = Cli::try_parse_from(["retrofx", "tables", "bullets", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Tables { table, format } => {
                assert_eq!(table.as_deref(), Some("bullets"));
                assert_eq!(format, "json");
            }
            _ => panic!("expected tables"),
        }
        let cli = Cli::try_parse_from(["retrofx", "validate", "a.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { format, .. } if format == "text"));
    }
}
