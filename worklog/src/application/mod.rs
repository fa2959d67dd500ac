pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use worklog_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = handlers::load_config(cli.config, cli.store, cli.admin_secret)?;
    match cli.command {
        Commands::Init => handlers::handle_init(&config),
        Commands::Submit { report } => handlers::handle_submit(&config, report),
        Commands::Edit {
            index,
            report,
            clear_done,
        } => handlers::handle_edit(&config, index, report, clear_done),
        Commands::Show { index } => handlers::handle_show(&config, index),
        Commands::List => handlers::handle_list(&config),
        Commands::Dashboard { secret, json } => handlers::handle_dashboard(&config, &secret, json),
    }
}
