use clap::error::ErrorKind;
use clap::Parser;

mod commands;
mod output;
mod tty;

use commands::rename;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pubrename")]
#[command(version = VERSION)]
#[command(about = "Rename a Dart/Flutter package and rewrite its package: imports")]
struct Cli {
    #[command(flatten)]
    rename: rename::RenameArgs,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit();
        }
        Err(e) => {
            let _ = e.print();
            return std::process::ExitCode::from(1);
        }
    };

    let exit_code = output::emit(rename::run(cli.rename));
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
