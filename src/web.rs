#![cfg(not(tarpaulin_include))]

use clap::Parser;
use labview_xlsx::ConvertOptions;
use labview_xlsx::app;
use std::net::SocketAddr;

/// Upload service: POST a log to /upload, get the workbook back
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "LABVIEW_XLSX_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    app::run(args.bind, ConvertOptions::default()).await
}
