use std::process::ExitCode;

fn main() -> ExitCode {
    rewards_cli::run()
}
