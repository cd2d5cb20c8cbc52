use geoshare::cli::Cli;
use geoshare::config::{config_path, Config};
use log::debug;
use simplelog::{TermLogger, TerminalMode};
use std::fs::File;
use structopt::StructOpt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();

    // fall back to the defaults when the user hasn't written a config file
    let path = config_path();
    let mut config = if path.exists() {
        let mut fp = File::open(&path)?;
        Config::load(&mut fp)?
    } else {
        Config::default()
    };
    if let Some(units) = opt.units() {
        config.set_units(units);
    }

    TermLogger::init(
        opt.verbosity(config.log_level()),
        simplelog::Config::default(),
        TerminalMode::Mixed,
    )?;
    debug!("using configuration from {:?}", path);

    // execute any subcommands
    opt.execute_subcommand(config)
}
