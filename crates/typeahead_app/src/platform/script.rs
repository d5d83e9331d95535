//! Scripted input: each plain line replaces the query, as if typed.
//!
//! Directives start with `:`. `:sleep <ms>` pauses between edits, `:focus`
//! and `:blur` toggle focus, `:clear` empties the query and `:settle` waits
//! for the dropdown to stop changing. Blank lines and `#` comments are skipped.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Query(String),
    Sleep(Duration),
    Focus,
    Blur,
    Settle,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown directive :{directive}")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: expected milliseconds after :sleep, got {value:?}")]
    InvalidSleep { line: usize, value: String },
}

pub(crate) fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(directive) = trimmed.strip_prefix(':') else {
            steps.push(Step::Query(raw.trim_end_matches('\r').to_string()));
            continue;
        };

        let mut parts = directive.split_whitespace();
        let step = match parts.next().unwrap_or_default() {
            "sleep" => {
                let value = parts.next().unwrap_or_default();
                let millis = value.parse().map_err(|_| ScriptError::InvalidSleep {
                    line,
                    value: value.to_string(),
                })?;
                Step::Sleep(Duration::from_millis(millis))
            }
            "focus" => Step::Focus,
            "blur" => Step::Blur,
            "clear" => Step::Query(String::new()),
            "settle" => Step::Settle,
            other => {
                return Err(ScriptError::UnknownDirective {
                    line,
                    directive: other.to_string(),
                })
            }
        };
        steps.push(step);
    }
    Ok(steps)
}
