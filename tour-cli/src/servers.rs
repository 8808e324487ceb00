//! `servers` command: list the known BRouter deployments.

use std::io::Write;

use clap::Args;
use tour_data::{find_server, known_servers};

use crate::CliError;
use crate::io::report;

/// CLI arguments for the `servers` subcommand.
#[derive(Debug, Clone, Args, Default)]
pub(crate) struct ServersArgs {
    /// List the profiles of this server instead of the servers.
    #[arg(value_name = "server")]
    pub(crate) server: Option<String>,
}

pub(crate) fn run_servers(args: &ServersArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_servers_with(args, &mut stdout)
}

pub(crate) fn run_servers_with(args: &ServersArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    match args.server.as_deref() {
        Some(name) => {
            let server = find_server(name)?;
            for profile in server.profiles {
                report(writer, profile)?;
            }
        }
        None => {
            for server in known_servers() {
                report(writer, &format!("{:<10} {}", server.name, server.base_url))?;
            }
        }
    }
    Ok(())
}
