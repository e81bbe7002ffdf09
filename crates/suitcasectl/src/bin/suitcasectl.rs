#[tokio::main]
async fn main() -> std::process::ExitCode {
    match suitcasectl::run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
