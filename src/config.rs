//! Command line and resolved runtime configuration

use crate::tool::{AnalysisRequest, GrammarSource, ParserMode, ToolConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Step through LR grammar analysis in the terminal")]
pub struct Cli {
    /// File containing the grammar
    pub grammar: PathBuf,

    /// Parser family to build
    #[arg(short, long, value_enum, default_value_t = ParserMode::Lalr)]
    pub mode: ParserMode,

    /// Path to the lrparser executable
    #[arg(long, env = "LRSTEP_TOOL", default_value = "./build/lrparser")]
    pub tool: PathBuf,

    /// Directory for the tool's output (default: a per-process temp dir)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Name of the step script the tool writes
    #[arg(long, value_name = "NAME", default_value = "steps.py")]
    pub script_file: String,

    /// Seconds to wait for the tool
    #[arg(short, long, value_name = "SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Test input tokens, separated by spaces
    #[arg(short, long, value_name = "TOKENS")]
    pub input: Option<String>,

    /// Replay every phase to completion and print it instead of opening the UI
    #[arg(long)]
    pub headless: bool,
}

/// Everything the binary needs after argument parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tool: ToolConfig,
    pub request: AnalysisRequest,
    /// Test input, checked against the grammar once its symbols are known
    pub input: Option<String>,
    pub headless: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Config {
        let defaults = ToolConfig::default();
        let tool = ToolConfig {
            executable: cli.tool,
            out_dir: cli.out_dir.unwrap_or(defaults.out_dir),
            script_file: cli.script_file,
            timeout: Duration::from_secs(cli.timeout),
        };
        Config {
            tool,
            request: AnalysisRequest::new(GrammarSource::File(cli.grammar), cli.mode),
            input: cli.input,
            headless: cli.headless,
        }
    }

    /// How long the session waits for one tool invocation. Slightly longer
    /// than the tool's own kill timeout so the tool reports its own timeout.
    pub fn deadline(&self) -> Duration {
        self.tool.timeout + Duration::from_secs(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lrstep", "expr.txt"]).unwrap();
        let config = Config::from_cli(cli);
        assert_eq!(config.request.mode, ParserMode::Lalr);
        assert_eq!(
            config.request.grammar,
            GrammarSource::File(PathBuf::from("expr.txt"))
        );
        assert_eq!(config.tool.script_file, "steps.py");
        assert_eq!(config.tool.timeout, Duration::from_secs(10));
        assert!(!config.headless);
        assert_eq!(config.input, None);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "lrstep",
            "g.txt",
            "--mode",
            "lr1",
            "--tool",
            "/opt/lrparser",
            "--timeout",
            "3",
            "--input",
            "id + id",
            "--headless",
        ])
        .unwrap();
        let config = Config::from_cli(cli);
        assert_eq!(config.request.mode, ParserMode::Lr1);
        assert_eq!(config.tool.executable, PathBuf::from("/opt/lrparser"));
        assert_eq!(config.deadline(), Duration::from_secs(4));
        assert_eq!(config.input.as_deref(), Some("id + id"));
        assert!(config.headless);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["lrstep", "g.txt", "--mode", "ll1"]).is_err());
    }
}
