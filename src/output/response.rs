//! JSON envelope written to stdout once per invocation.

use pubrename::error::Hint;
use pubrename::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl From<Error> for ErrorBody {
    fn from(err: Error) -> Self {
        Self {
            code: err.code.as_str(),
            message: err.message,
            details: err.details,
            hints: err.hints,
        }
    }
}

impl Envelope {
    fn failure(err: Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.into()),
        }
    }
}

/// Build the envelope and exit code for a command result.
///
/// Failures, including a payload that cannot be serialized, exit with 1.
pub fn envelope<T: Serialize>(result: Result<(T, i32)>) -> (Envelope, i32) {
    let (data, exit_code) = match result {
        Ok(ok) => ok,
        Err(err) => return (Envelope::failure(err), 1),
    };

    match serde_json::to_value(data) {
        Ok(value) => (
            Envelope {
                success: true,
                data: Some(value),
                error: None,
            },
            exit_code,
        ),
        Err(e) => (
            Envelope::failure(Error::internal_json(
                e.to_string(),
                Some("serialize rename output".to_string()),
            )),
            1,
        ),
    }
}

/// Print the envelope for `result` and return the process exit code.
pub fn emit<T: Serialize>(result: Result<(T, i32)>) -> i32 {
    let (envelope, exit_code) = envelope(result);
    match write_stdout(&envelope) {
        Ok(()) => exit_code,
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}

fn write_stdout(envelope: &Envelope) -> Result<()> {
    use std::io::{self, Write};

    let payload = serde_json::to_string_pretty(envelope)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize envelope".to_string())))?;

    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{}", payload) {
        // Reader went away (e.g. `| head`).
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(e.to_string(), Some("write stdout".to_string()))),
        Ok(()) => Ok(()),
    }
}
