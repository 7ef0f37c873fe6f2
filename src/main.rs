use std::process::ExitCode;

use todo_api::{config::Config, run_server, telemetry, StartupError};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run server error");
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    run_server(config).await
}
