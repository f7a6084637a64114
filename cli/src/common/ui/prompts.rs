//! # Cradle Interactive Prompts
//!
//! File: cli/src/common/ui/prompts.rs
//!
//! ## Overview
//!
//! Interactive confirmation for destructive operations. The lifecycle
//! controller never talks to the terminal directly: it receives a `Confirm`
//! capability, so production code prompts on the TTY while tests inject a
//! deterministic answer.
//!
//! ## Architecture
//!
//! - `Confirm`: the capability trait — one method, one question, one answer.
//! - `StdinConfirm`: production implementation reading a line from stdin.
//! - `parse_answer`: the default-deny interpretation of user input. Only an
//!   explicit "y"/"yes" (case-insensitive) confirms; empty input, EOF, or
//!   anything else declines. This default-deny behavior is safety-critical
//!   and must not be weakened.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::io::{self, BufRead, Write};

/// Capability for asking the user a yes/no question.
pub trait Confirm {
    /// Asks `question` and returns `true` only on an explicit affirmative.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Production `Confirm` implementation: prints `question [y/N]` to stdout and
/// reads one line from stdin.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{} [y/N] ", question);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut answer = String::new();
        let bytes_read = io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation from stdin")?;
        // EOF (e.g., stdin closed, interrupted pipe) declines.
        if bytes_read == 0 {
            println!();
            return Ok(false);
        }
        Ok(parse_answer(&answer))
    }
}

/// Non-interactive `Confirm` implementation that answers every question
/// affirmatively. Selected by the `--yes` flag on destructive verbs, where
/// the flag itself is the explicit consent.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        println!("{} [y/N] y (assumed by --yes)", question);
        Ok(true)
    }
}

/// Interprets user input for a `[y/N]` prompt. Anything that is not an
/// explicit affirmative declines.
pub fn parse_answer(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
