//! Interactive input for the rename command.
//!
//! The question goes to stderr so stdout stays a single JSON document.

use std::io::{self, BufRead, IsTerminal, Write};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

/// Ask for the new package name. A blank answer is `None`.
pub fn ask_package_name(current: &str) -> pubrename::Result<Option<String>> {
    eprint!("New package name (currently {}): ", current);
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| {
            pubrename::Error::internal_io(
                e.to_string(),
                Some("read package name from stdin".to_string()),
            )
        })?;

    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
