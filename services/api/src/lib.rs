mod cli;
mod infra;
mod recommend;
mod routes;
mod server;

use technician_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
