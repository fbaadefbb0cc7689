pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;
pub(crate) mod run;

use args::{Arguments, Subcommands};
use clap::Parser;
use error::Error;
use kiln_common::utils::bytecode::read_bytecode;
use kiln_config::{config, Configuration};
use kiln_vm::ext::selectors::find_selectors;
use output::emit;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _guard = args.logs.init_tracing();

    match args.sub {
        Subcommands::Run(cmd) => {
            let configuration = Configuration::load()
                .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;

            // execution is synchronous, keep it off the async workers
            let output = {
                let cmd = cmd.clone();
                tokio::task::spawn_blocking(move || run::run(&cmd, &configuration))
                    .await
                    .map_err(|e| Error::Generic(format!("execution task failed: {}", e)))??
            };

            emit(&cmd.output, &output)
                .map_err(|e| Error::Generic(format!("failed to write output: {}", e)))?;
        }

        Subcommands::Selectors(cmd) => {
            let code = read_bytecode(&cmd.code)
                .map_err(|e| Error::Generic(format!("failed to read bytecode: {}", e)))?;

            let selectors = find_selectors(&code);
            info!("found {} selectors", selectors.len());
            for selector in selectors {
                println!("{selector}");
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
