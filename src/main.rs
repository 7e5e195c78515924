use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = threadmail::cli::Cli::parse();

    if let Err(err) = threadmail::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
