use std::process::ExitCode;

fn main() -> ExitCode {
    match brrtwire::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            brrtwire::cli::report_error(&err);
            ExitCode::FAILURE
        }
    }
}
