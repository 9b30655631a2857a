//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use rideshare_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports its single fatal error on stderr"
)]
fn main() {
    match rideshare_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("rideshare: {err}");
            std::process::exit(1);
        }
    }
}
