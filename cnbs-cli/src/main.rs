//! CNBS CLI - Great Lakes net basin supply forecast toolkit.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cnbs-cli",
    version,
    about = "Great Lakes net basin supply forecast toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cnbs_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    let stdout = std::io::stdout();
    cnbs_cmd::run(cli.command, &mut stdout.lock())
}
