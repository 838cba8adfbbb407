use clap::Parser;
use std::path::PathBuf;

use crate::Mode;

#[derive(Parser, Debug)]
#[command(name = "openclaw-deploy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deploy OpenClaw to Render, DigitalOcean, a custom VPS or local Docker")]
#[command(long_about = "Walks you through prerequisite checks, LLM provider setup, config generation, deployment and verification. With --mcp the same operations are served as MCP tools over stdio instead.")]
pub struct Cli {
    /// Serve the deployment tools over stdio (MCP) instead of running the wizard
    #[arg(long)]
    pub mcp: bool,

    /// Directory the generated files are written to (default: current directory)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.mcp {
            Mode::Mcp
        } else {
            Mode::Wizard
        }
    }

    /// Initialize logging based on verbosity level
    ///
    /// Records go to stderr, which keeps stdout clean for the MCP transport.
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_runs_wizard() {
        let cli = Cli::parse_from(["openclaw-deploy"]);
        assert_eq!(cli.mode(), Mode::Wizard);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_mcp_flag_and_verbosity() {
        let cli = Cli::parse_from(["openclaw-deploy", "--mcp", "-vv", "-o", "/tmp/out"]);
        assert_eq!(cli.mode(), Mode::Mcp);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out")));
    }
}
