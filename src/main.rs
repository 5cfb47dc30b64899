//! Pixelsprite - command-line sprite editor

use std::process::ExitCode;

use pixelsprite::cli;

fn main() -> ExitCode {
    cli::run()
}
