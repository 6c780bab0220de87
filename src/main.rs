use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = hermes::cli::Cli::parse();
    if let Err(e) = hermes::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
