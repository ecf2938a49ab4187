use std::process::ExitCode;

fn main() -> ExitCode {
    match crowdfund_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            crowdfund_cli::output::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
