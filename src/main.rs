use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    railenv_cli::run().await
}
