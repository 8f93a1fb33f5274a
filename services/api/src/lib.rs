mod cli;
mod estimate;
mod infra;
mod routes;
mod server;

use salary_insights::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
