use std::io::{BufRead, Write};

use anyhow::bail;
use clap::error::ErrorKind;
use clap::Parser;

use crate::cli::{ReplAction, ReplLine};
use crate::context::AppContext;
use crate::output;

/// Splits a command line into words. Single quotes keep everything
/// literally, double quotes and bare words honour backslash escapes.
pub fn tokenize(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => bail!("unterminated single quote"),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => current.push(c),
                            None => bail!("unterminated double quote"),
                        },
                        Some(c) => current.push(c),
                        None => bail!("unterminated double quote"),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => bail!("trailing backslash"),
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Reads commands line by line until EOF or `exit`. Results go to `out`,
/// errors to `err`, one JSON envelope per line; a failed command never ends
/// the loop.
pub fn run<I, O, E>(
    ctx: &mut AppContext,
    input: I,
    out: &mut O,
    err: &mut E,
    interactive: bool,
) -> anyhow::Result<()>
where
    I: BufRead,
    O: Write,
    E: Write,
{
    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "{}", ctx.prompt())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let words = match tokenize(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                writeln!(err, "{}", output::error(&e.to_string())?)?;
                continue;
            }
        };

        let action = match ReplLine::try_parse_from(&words) {
            Ok(parsed) => parsed.action,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(out, "{}", e)?;
                continue;
            }
            Err(e) => {
                writeln!(err, "{}", output::error(e.to_string().trim_end())?)?;
                continue;
            }
        };

        let command = match action {
            ReplAction::Exit => break,
            ReplAction::Shell(action) => action.into(),
        };
        match ctx.execute(&command) {
            Ok(result) => writeln!(out, "{}", output::render(result)?)?,
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                writeln!(err, "{}", output::error(&e.to_string())?)?;
            }
        }
    }
    Ok(())
}
