use clap::Parser;

use lbar_bridge::config::{BarConfig, Cli};
use lbar_bridge::{shell, util};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    util::init_tracing(cli.verbose);
    util::install_panic_hook();

    let config = match BarConfig::try_from(cli) {
        Ok(config) => config,
        Err(err) => {
            use clap::CommandFactory;
            Cli::command()
                .error(clap::error::ErrorKind::ValueValidation, err)
                .exit();
        }
    };
    tracing::debug!(?config, "configuration");

    shell::run(config)
}
