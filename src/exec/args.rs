// src/exec/args.rs

//! Command-line construction for the legacy build tool.
//!
//! The tool only understands one shape:
//!
//! ```text
//! "<project>" /MAKE "<base> - <platform> <configuration>" [/<ACTION>]
//! ```
//!
//! Paths are wrapped in double quotes; nothing else is escaped.

use crate::job::JobDescriptor;
use crate::types::BuildDefaults;

/// Build the argument string for `job`, falling back to `defaults` for every
/// empty per-job field.
pub fn build(job: &JobDescriptor, defaults: &BuildDefaults) -> String {
    let platform = pick(&job.platform, &defaults.platform);
    let configuration = pick(&job.configuration, &defaults.configuration);
    let action = pick(&job.action, &defaults.action).trim_start_matches('/');

    let mut args = format!(
        "\"{}\" /MAKE \"{} - {} {}\"",
        job.project.display(),
        job.base_name(),
        platform,
        configuration
    );

    if !action.is_empty() {
        args.push_str(" /");
        args.push_str(action);
    }

    args
}

fn pick<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Split an argument string into argv using the tool's grammar: whitespace
/// separates arguments, double quotes group and are removed, no escapes.
///
/// Used on hosts where the string cannot be handed to the child verbatim.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if has_token {
        args.push(current);
    }

    args
}
