//! The `run` command: builds [`ExecutionParams`] from command-line arguments and executes them.

use std::str::FromStr;

use alloy::primitives::Address;
use colored::Colorize;
use kiln_common::utils::{
    bytecode::read_bytecode,
    hex::ToLowerHex,
    io::file::read_file,
    strings::{decode_hex, parse_word},
};
use kiln_config::Configuration;
use kiln_vm::{
    BlockData, ExecutionParams, ExecutionResult, GlobalState, Interpreter, InterpreterConfig,
    StepSnapshot, Storage, TraceCollector, TxData,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::{args::RunArgs, error::Error};

/// The JSON document printed by `kiln run`.
#[derive(Debug, Serialize)]
struct RunOutput {
    #[serde(flatten)]
    result: ExecutionResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<StepSnapshot>>,
}

/// Parses an optional address argument, falling back to `default` when empty.
fn parse_address(name: &str, value: &str, default: Address) -> Result<Address, Error> {
    if value.is_empty() {
        return Ok(default);
    }

    Address::from_str(value)
        .map_err(|e| Error::Generic(format!("invalid address for --{name} '{value}': {e}")))
}

/// Reads and deserializes a JSON file argument.
fn read_json<T: DeserializeOwned>(name: &str, path: &str) -> Result<T, Error> {
    let contents = read_file(path)
        .map_err(|e| Error::Generic(format!("failed to read --{name} file '{path}': {e}")))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Builds the interpreter limits, letting command-line flags override the configuration.
pub(crate) fn interpreter_config(
    args: &RunArgs,
    configuration: &Configuration,
) -> InterpreterConfig {
    InterpreterConfig {
        step_limit: args.step_limit.unwrap_or(configuration.step_limit),
        max_call_depth: configuration.max_call_depth,
        memory_limit: configuration.memory_limit,
    }
}

/// Builds the execution parameters described by `args`.
pub(crate) fn build_params(
    args: &RunArgs,
    configuration: &Configuration,
) -> Result<ExecutionParams, Error> {
    let code = read_bytecode(&args.code)
        .map_err(|e| Error::Generic(format!("failed to read bytecode: {e}")))?;
    let data = decode_hex(&args.calldata)
        .map_err(|e| Error::Generic(format!("failed to decode calldata: {e}")))?;

    let from = parse_address("from", &args.from, Address::ZERO)?;
    let tx = TxData {
        to: parse_address("to", &args.to, Address::ZERO)?,
        from,
        origin: parse_address("origin", &args.origin, from)?,
        value: parse_word(&args.value)
            .map_err(|e| Error::Generic(format!("invalid --value: {e}")))?,
        gas_price: parse_word(&args.gas_price)
            .map_err(|e| Error::Generic(format!("invalid --gas-price: {e}")))?,
        gas_limit: args.gas_limit.unwrap_or(configuration.gas_limit),
        data: data.into(),
    };

    let block = match &args.block {
        Some(path) => read_json::<BlockData>("block", path)?,
        None => BlockData { chain_id: configuration.chain_id, ..Default::default() },
    };
    let global_state = match &args.state {
        Some(path) => read_json::<GlobalState>("state", path)?,
        None => GlobalState::default(),
    };
    let storage = match &args.storage {
        Some(path) => read_json::<Storage>("storage", path)?,
        None => Storage::default(),
    };

    Ok(ExecutionParams::new(code)
        .with_tx(tx)
        .with_block(block)
        .with_global_state(global_state)
        .with_storage(storage))
}

/// Executes the code described by `args`, returning the pretty-printed JSON result.
pub(crate) fn run(args: &RunArgs, configuration: &Configuration) -> Result<String, Error> {
    let params = build_params(args, configuration)?;
    let interpreter = Interpreter::new(interpreter_config(args, configuration));
    debug!("running with {:?}", interpreter.config());

    let (result, trace) = if args.trace {
        let mut collector = TraceCollector::new();
        let result = interpreter.start_with_observer(params, &mut collector);
        (result, Some(collector.into_steps()))
    } else {
        (interpreter.start(params), None)
    };

    let status = if result.success { "succeeded".green() } else { "failed".red() };
    info!("execution {} after {} steps", status, result.steps);
    if !result.return_data.is_empty() {
        info!("returned {}", result.return_data.to_lower_hex());
    }

    Ok(serde_json::to_string_pretty(&RunOutput { result, trace })?)
}
