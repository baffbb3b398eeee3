// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Terminal rendering: progress spinner and result panels.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use api_hunter::{ErrorTally, PersistOutcome};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Colored panels and a spinner.
    Styled,
    /// Bare text lines, safe for pipes and notebooks.
    Plain,
}

/// Busy indicator shown while the browser session runs.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn start(style: Style, url: &str) -> Self {
        let message = format!("Searching for possible hidden apis in {url}...");
        match style {
            Style::Plain => {
                println!("\n{message}");
                Spinner(None)
            }
            Style::Styled => {
                let bar = ProgressBar::new_spinner();
                let template = ProgressStyle::with_template("{spinner:.yellow} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                bar.set_style(template.tick_strings(&[
                    "[    ]", "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]",
                    "[   =]", "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]", "[done]",
                ]));
                bar.set_message(message);
                bar.enable_steady_tick(Duration::from_millis(100));
                Spinner(Some(bar))
            }
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.0 {
            bar.finish_and_clear();
        }
    }
}

/// Everything needed to describe one finished run.
pub struct Report<'a> {
    pub url: &'a str,
    pub outcome: &'a PersistOutcome,
    pub tally: &'a ErrorTally,
}

impl Report<'_> {
    pub fn render(&self, style: Style, verbose: bool) -> String {
        match style {
            Style::Plain => self.render_plain(verbose),
            Style::Styled => self.render_styled(verbose),
        }
    }

    fn summary(&self) -> Vec<String> {
        match self.outcome {
            PersistOutcome::NothingObserved => vec![
                "No hidden apis have been found.".into(),
                "The page did not receive any responses.".into(),
            ],
            PersistOutcome::NoEndpoints { rejected } => vec![
                "No hidden apis have been found.".into(),
                format!("{rejected} responses were observed, but none of them was JSON."),
            ],
            PersistOutcome::Written {
                responses,
                urls,
                count,
            } => vec![
                format!(
                    "For {}, {count} possible hidden apis have been found.",
                    self.url
                ),
                String::new(),
                format!(
                    "You can find your responses at: {}",
                    display_path(responses).display()
                ),
                format!(
                    "and the requested hidden apis at: {}",
                    display_path(urls).display()
                ),
            ],
        }
    }

    fn render_plain(&self, verbose: bool) -> String {
        let mut out = String::from("\n");
        for line in self.summary() {
            out.push_str(&line);
            out.push('\n');
        }
        if verbose {
            out.push_str("\nAdditional info:\n");
            for (kind, count) in self.tally.iter() {
                let _ = writeln!(out, "{kind}: {count}");
            }
        }
        out
    }

    fn render_styled(&self, verbose: bool) -> String {
        let found = matches!(self.outcome, PersistOutcome::Written { .. });
        let (title, color) = if found {
            ("Hidden APIs", GREEN)
        } else {
            ("No Hidden APIs", YELLOW)
        };

        let lines: Vec<String> = self
            .summary()
            .into_iter()
            .map(|line| {
                if line.starts_with("You can find") || line.starts_with("and the requested") {
                    format!("{CYAN}{line}{RESET}")
                } else {
                    line
                }
            })
            .collect();

        let mut out = String::from("\n");
        out.push_str(&panel(title, color, &lines));

        if verbose {
            let width = self
                .tally
                .iter()
                .map(|(kind, _)| kind.label().len())
                .max()
                .unwrap_or(0)
                .max("Error".len());
            let mut table = vec![
                format!("{BOLD}{:<width$}  Count{RESET}", "Error"),
                format!("{DIM}{}{RESET}", "\u{2500}".repeat(width + 7)),
            ];
            for (kind, count) in self.tally.iter() {
                table.push(format!("{:<width$}  {count:>5}", kind.label()));
            }
            out.push('\n');
            out.push_str(&panel("Additional info", CYAN, &table));
        }
        out
    }
}

/// Prefer an absolute path so the user can copy it from any directory.
fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Draw `lines` inside a rounded box titled `title`.
fn panel(title: &str, color: &str, lines: &[String]) -> String {
    let inner = lines
        .iter()
        .map(|line| visible_width(line))
        .max()
        .unwrap_or(0)
        .max(title.chars().count() + 2);

    let mut out = String::new();
    let rule = "\u{2500}".repeat(inner - title.chars().count() - 1);
    let _ = writeln!(
        out,
        "{color}\u{256d}\u{2500} {BOLD}{title}{RESET}{color} {rule}\u{256e}{RESET}"
    );
    for line in lines {
        let pad = " ".repeat(inner - visible_width(line));
        let _ = writeln!(out, "{color}\u{2502}{RESET} {line}{pad} {color}\u{2502}{RESET}");
    }
    let _ = writeln!(
        out,
        "{color}\u{2570}{}\u{256f}{RESET}",
        "\u{2500}".repeat(inner + 2)
    );
    out
}

/// Character count of `text` with ANSI escape sequences removed.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
