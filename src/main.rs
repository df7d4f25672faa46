use std::process::ExitCode;

fn main() -> ExitCode {
    pie::cli::run()
}
