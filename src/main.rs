#[tokio::main]
async fn main() -> std::process::ExitCode {
    worklog_lib::run().await
}
