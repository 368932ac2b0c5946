use std::process::ExitCode;

fn main() -> ExitCode {
    confseek_cli::run()
}
