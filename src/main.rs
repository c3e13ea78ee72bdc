use std::process::ExitCode;

use snapline::ui::output;

fn main() -> ExitCode {
    match snapline::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
