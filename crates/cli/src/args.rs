use clap::{Parser, Subcommand};
use kiln_config::ConfigArgs;

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "kiln", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "kiln is a deterministic interpreter for EVM bytecode.")]
#[allow(clippy::large_enum_variant)]
pub(crate) enum Subcommands {
    #[clap(name = "run", about = "Execute bytecode against an in-memory world state")]
    Run(RunArgs),

    #[clap(name = "selectors", about = "List the function selectors dispatched by bytecode")]
    Selectors(SelectorsArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

/// Arguments of the `run` command.
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Execute bytecode against an in-memory world state",
    override_usage = "kiln run <CODE> [OPTIONS]"
)]
pub(crate) struct RunArgs {
    /// The bytecode to execute, either as hex or as a path to a file containing hex.
    #[clap(required = true)]
    pub(crate) code: String,

    /// Calldata passed to the code, as hex.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub(crate) calldata: String,

    /// Value sent with the call, in wei.
    #[clap(long, default_value = "0")]
    pub(crate) value: String,

    /// The caller.
    #[clap(long, default_value = "", hide_default_value = true)]
    pub(crate) from: String,

    /// The address the code runs as.
    #[clap(long, default_value = "", hide_default_value = true)]
    pub(crate) to: String,

    /// The transaction origin. Defaults to the caller.
    #[clap(long, default_value = "", hide_default_value = true)]
    pub(crate) origin: String,

    /// Gas price reported by GASPRICE, in wei.
    #[clap(long = "gas-price", default_value = "0")]
    pub(crate) gas_price: String,

    /// Gas reported by GAS. Defaults to the configured gas limit.
    #[clap(long = "gas-limit")]
    pub(crate) gas_limit: Option<u64>,

    /// A JSON file describing the block.
    #[clap(long)]
    pub(crate) block: Option<String>,

    /// A JSON file describing the accounts before execution.
    #[clap(long)]
    pub(crate) state: Option<String>,

    /// A JSON file describing the storage before execution.
    #[clap(long)]
    pub(crate) storage: Option<String>,

    /// Include every executed instruction in the output.
    #[clap(long)]
    pub(crate) trace: bool,

    /// Maximum number of instructions to execute. Defaults to the configured step limit.
    #[clap(long = "step-limit")]
    pub(crate) step_limit: Option<u64>,

    /// 'print' to print to the console, or the path of a file to write the output to.
    #[clap(long = "output", short = 'o', default_value = "print")]
    pub(crate) output: String,
}

/// Arguments of the `selectors` command.
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "List the function selectors dispatched by bytecode",
    override_usage = "kiln selectors <CODE>"
)]
pub(crate) struct SelectorsArgs {
    /// The bytecode to analyze, either as hex or as a path to a file containing hex.
    #[clap(required = true)]
    pub(crate) code: String,
}
