//! Command-line arguments.
//!
//! Every option can also come from the environment (or a `.env` file, which
//! `main` loads before parsing). Flags win over environment values.

use std::path::PathBuf;

use clap::Parser;

/// Launch the Bracket backend and open its UI.
#[derive(Debug, Parser)]
#[command(name = "bracket-desktop")]
#[command(about = "Run the Bracket Tournament System as a desktop application")]
#[command(version)]
pub struct Cli {
    /// Development mode: backend from the repository's dist/, UI from the dev server
    #[arg(long)]
    pub dev: bool,

    /// Port the backend listens on
    #[arg(long, env = "BRACKET_PORT")]
    pub port: Option<u16>,

    /// Backend executable to run instead of the bundled one
    #[arg(long = "backend-path", env = "BRACKET_BACKEND_PATH")]
    pub backend_path: Option<PathBuf>,

    /// Frontend dev server URL (development mode only)
    #[arg(long = "dev-url", env = "BRACKET_DEV_URL")]
    pub dev_url: Option<String>,

    /// Milliseconds between the graceful and the forced termination signal
    #[arg(long = "shutdown-grace-ms")]
    pub shutdown_grace_ms: Option<u64>,

    /// Do not open a browser; only log the URL
    #[arg(long)]
    pub headless: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "bracket-desktop",
            "--dev",
            "--port",
            "9100",
            "--backend-path",
            "/opt/bracket/bracket-backend",
            "--shutdown-grace-ms",
            "500",
            "-v",
        ]);
        assert!(cli.dev);
        assert_eq!(cli.port, Some(9100));
        assert_eq!(
            cli.backend_path,
            Some(PathBuf::from("/opt/bracket/bracket-backend"))
        );
        assert_eq!(cli.shutdown_grace_ms, Some(500));
        assert!(cli.verbose);
        assert!(!cli.headless);
    }

    #[test]
    fn test_rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["bracket-desktop", "--port", "70000"]).is_err());
    }
}
