// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Interactive prompt for the output file name.

use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use api_hunter::{ConfigError, Identifier};

use crate::output::Style;

/// Used in plain mode when the user just presses Enter.
pub const DEFAULT_FILE_NAME: &str = "results";

/// Ask for the base name of the output files.
///
/// Styled mode keeps asking until the answer is valid. Plain mode accepts an
/// empty answer as [`DEFAULT_FILE_NAME`] and fails on anything invalid.
pub fn file_name(style: Style) -> Result<Identifier> {
    let mut rl = DefaultEditor::new()?;

    match style {
        Style::Styled => loop {
            let prompt = " \x1b[33m?\x1b[0m Write a name for the file to save the responses of hidden apis (if any): ";
            let line = read(&mut rl, prompt)?;
            match Identifier::parse(line.trim()) {
                Ok(name) => return Ok(name),
                Err(_) => eprintln!(
                    "  \x1b[31mUse 1 to 40 letters, digits or underscores (e.g. shop_api).\x1b[0m"
                ),
            }
        },
        Style::Plain => {
            let prompt = format!(
                "Write a name for the file to save the responses of hidden apis (if any) [{DEFAULT_FILE_NAME}]: "
            );
            let line = read(&mut rl, &prompt)?;
            Ok(resolve_plain(&line)?)
        }
    }
}

fn read(rl: &mut DefaultEditor, prompt: &str) -> Result<String> {
    match rl.readline(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => bail!("cancelled"),
        Err(err) => Err(err.into()),
    }
}

fn resolve_plain(input: &str) -> Result<Identifier, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Identifier::parse(DEFAULT_FILE_NAME)
    } else {
        Identifier::parse(trimmed)
    }
}
