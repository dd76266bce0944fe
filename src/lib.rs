/// Prefixed progress line on stderr. Silent when stderr is not a terminal,
/// so piped runs only see the JSON result on stdout.
///
/// Usage:
/// ```ignore
/// log_status!("rename", "Updating pubspec.yaml: {} -> {}", old, new);
/// log_status!("cache", "Skipping unreadable {}", path);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod utils;

// `pubrename::refactor::rename_project`, `pubrename::validation`, ...
pub use core::*;
pub use utils::*;
