use std::process;

#[tokio::main]
async fn main() {
    let code = loghold_cli::run().await;
    process::exit(code);
}
