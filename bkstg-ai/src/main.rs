use bkstg_ai::cli;
use bkstg_ai::cli::Cli;

use clap::Parser;
use log;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("running {:?}", cli.command);

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = cli::run(cli, &mut stdout).await {
	log::error!("{}", err);
	std::process::exit(1);
    }
}
