use clap::Parser;

#[derive(Parser)]
#[command(name = "ytdigest", about = "YouTube video analysis API server")]
struct Cli {
    /// Listen port, overriding the PORT environment variable
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    ytdigest::run(cli.port).await
}
