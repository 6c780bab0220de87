//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`backend`] (register / deregister),
//! [`validate`], or [`health`]. Each handler lives in its own submodule.

pub mod backend;
pub mod health;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::control::frame::Op;
use crate::error::HermesError;

pub async fn dispatch(cli: Cli) -> Result<(), HermesError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Register(args)) => backend::execute(args, Op::Register).await,
        Some(Commands::Deregister(args)) => backend::execute(args, Op::Deregister).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  hermes v{version} \u{2014} round-robin request broker\n\n  \
         No command provided. To get started:\n\n    \
         hermes run                        Start the broker (auto-detects ./hermes.yaml)\n    \
         hermes run -c hermes.yaml         Start with a specific config file\n    \
         hermes register --port 8081       Announce a backend to a running broker\n    \
         hermes --help                     See all commands and options\n"
    );
}
