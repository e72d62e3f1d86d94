mod cli;
mod demo;
mod driver;
mod infra;
mod routes;
mod server;

use dispute_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
