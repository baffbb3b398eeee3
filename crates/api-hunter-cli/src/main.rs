// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! `apihunter` — find the hidden JSON APIs a web page calls while it loads.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use api_hunter::{
    persist, run_session, ChromiumDriver, Identifier, PersistError, PersistOutcome, SessionConfig,
    SessionError,
};
use tracing::info;

mod output;
mod prompt;

use output::{Report, Style};

#[derive(Parser)]
#[command(
    name = "apihunter",
    about = "API Hunter — find the hidden JSON APIs a web page calls while it loads",
    version,
    after_help = "Results are written to <NAME>_responses.json and <NAME>_urls.txt.\nNothing is written when no JSON responses are found."
)]
struct Cli {
    /// Page to analyze (e.g. "https://example.com")
    #[arg(required_unless_present = "completions")]
    url: Option<String>,

    /// Show how many responses were rejected, by reason
    #[arg(long)]
    verbose_response: bool,

    /// Print results without styling (good for notebooks and pipes)
    #[arg(long)]
    no_style: bool,

    /// Base name for the output files (letters, digits and _, at most 40).
    /// Prompted for when omitted.
    #[arg(long, short = 'f', value_name = "NAME")]
    file_name: Option<Identifier>,

    /// Directory to write the output files into
    #[arg(long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Seconds to keep listening after the page has loaded
    #[arg(long, default_value = "8", value_name = "SECS", value_parser = parse_seconds)]
    settle_delay: Duration,

    /// Seconds allowed for the browser to start
    #[arg(long, default_value = "240", value_name = "SECS", value_parser = parse_seconds)]
    launch_timeout: Duration,

    /// Seconds allowed for the page to load
    #[arg(long, default_value = "240", value_name = "SECS", value_parser = parse_seconds)]
    navigation_timeout: Duration,

    /// Seconds allowed for in-flight responses once listening stops
    #[arg(long, default_value = "10", value_name = "SECS", value_parser = parse_seconds)]
    drain_timeout: Duration,

    /// Path to a Chrome or Chromium binary (searched on PATH when omitted)
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {value:?}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "apihunter", &mut std::io::stdout());
        return Ok(());
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 0=success (including "nothing found"), 1=error
    if let Err(e) = hunt(cli).await {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn hunt(cli: Cli) -> Result<()> {
    let url = cli.url.context("a URL to analyze is required")?;
    let style = if cli.no_style {
        Style::Plain
    } else {
        Style::Styled
    };

    let name = match cli.file_name {
        Some(name) => name,
        None => prompt::file_name(style)?,
    };

    let config = SessionConfig::new(url.as_str())
        .with_launch_timeout(cli.launch_timeout)
        .with_navigation_timeout(cli.navigation_timeout)
        .with_settle_delay(cli.settle_delay)
        .with_drain_timeout(cli.drain_timeout);
    let driver = ChromiumDriver::new().with_executable(cli.chrome);

    let spinner = output::Spinner::start(style, &url);
    let session = run_session(&driver, &config).await;
    spinner.finish();

    let (result, failure) = match session {
        Ok(result) => (result, None),
        Err(failure) => (failure.partial, Some(failure.error)),
    };

    if let Some(error) = &failure {
        info!("capture session ended early, saving partial results: {error}");
    }
    let outcome = saved_outcome(
        &url,
        persist(&result, &name, &cli.output_dir),
        failure.as_ref(),
    )?;
    info!(
        records = result.records.len(),
        rejected = result.tally.total(),
        "capture finished for {url}"
    );

    let report = Report {
        url: &url,
        outcome: &outcome,
        tally: &result.tally,
    };
    print!("{}", report.render(style, cli.verbose_response));

    if let Some(error) = failure {
        return Err(anyhow::Error::new(error).context("capture session ended early"));
    }
    Ok(())
}

/// Attach the session failure, if any, to a persist error so neither is lost.
fn saved_outcome(
    url: &str,
    saved: Result<PersistOutcome, PersistError>,
    failure: Option<&SessionError>,
) -> Result<PersistOutcome> {
    saved.map_err(|e| {
        let error = anyhow::Error::new(e).context(format!("failed to save results for {url}"));
        match failure {
            Some(session) => error.context(format!("capture session ended early ({session})")),
            None => error,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_invalid_file_name_is_rejected_by_parser() {
        let parsed = Cli::try_parse_from(["apihunter", "https://example.com", "-f", "a b"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["apihunter", "https://example.com"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://example.com"));
        assert!(cli.file_name.is_none());
        assert!(!cli.no_style);
        assert!(!cli.verbose_response);
        assert_eq!(cli.settle_delay, Duration::from_secs(8));
        assert_eq!(cli.navigation_timeout, Duration::from_secs(240));
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_flags_and_fractional_seconds() {
        let cli = Cli::try_parse_from([
            "apihunter",
            "https://example.com",
            "--no-style",
            "--verbose-response",
            "--file-name",
            "shop_1",
            "--settle-delay",
            "0.5",
        ])
        .unwrap();
        assert!(cli.no_style);
        assert!(cli.verbose_response);
        assert_eq!(cli.file_name.unwrap().as_str(), "shop_1");
        assert_eq!(cli.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["apihunter"]).is_err());
    }

    fn write_error() -> PersistError {
        PersistError::Io {
            path: PathBuf::from("/ro/shop_responses.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }

    #[test]
    fn test_persist_failure_keeps_session_failure() {
        let session = SessionError::NavigationTimedOut {
            url: "https://example.com".into(),
            timeout: Duration::from_secs(3),
        };
        let err = saved_outcome("https://example.com", Err(write_error()), Some(&session))
            .unwrap_err();
        let message = format!("{err:#}");

        assert!(message.contains("timed out after 3s"), "{message}");
        assert!(message.contains("failed to save results"), "{message}");
        assert!(message.contains("read-only"), "{message}");
    }

    #[test]
    fn test_persist_failure_alone() {
        let err = saved_outcome("https://example.com", Err(write_error()), None).unwrap_err();
        let message = format!("{err:#}");

        assert!(message.starts_with("failed to save results for https://example.com"));
        assert!(!message.contains("ended early"));
    }

    #[test]
    fn test_saved_outcome_passes_success_through() {
        let outcome = saved_outcome(
            "https://example.com",
            Ok(PersistOutcome::NothingObserved),
            None,
        )
        .unwrap();
        assert_eq!(outcome, PersistOutcome::NothingObserved);
    }

    #[test]
    fn test_negative_seconds_rejected() {
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
        assert_eq!(parse_seconds("2").unwrap(), Duration::from_secs(2));
    }
}
