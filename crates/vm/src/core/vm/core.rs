use std::{panic, thread};

use alloy::primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, dispatcher, warn, Span};

#[cfg(feature = "step-tracing")]
use tracing::trace;

use crate::{
    core::{
        constants::{BASE_STACK_SIZE, DEFAULT_MEMORY_LIMIT, FRAME_STACK_SIZE, MAX_CALL_DEPTH},
        env::{BlockData, TxData},
        opcodes::opcode_info,
        world::World,
    },
    error::Error,
    ext::selectors::find_selectors,
};

use super::{
    execution::{Control, ExecutionParams, ExecutionResult, FrameResult, Halt, Outcome},
    frame::{CallContext, Frame},
    observer::{NoopObserver, StepObserver},
    table::handler,
};

/// Limits applied to every execution an [`Interpreter`] runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum number of instructions executed across a whole call tree.
    pub step_limit: u64,

    /// Maximum nesting of CALL / CREATE frames.
    pub max_call_depth: usize,

    /// Maximum memory size of a single frame, in bytes.
    pub memory_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            step_limit: u64::MAX,
            max_call_depth: MAX_CALL_DEPTH,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

/// The [`Interpreter`] drives fetch-decode-execute over a frame, and re-enters itself for
/// CALL and CREATE.
///
/// It holds no per-execution state: call depth travels with each [`Frame`] and everything
/// mutable lives in the [`World`] of one execution. A single instance can therefore run any
/// number of executions at once from different threads.
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    /// Creates a new [`Interpreter`] with the given limits.
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// The limits this interpreter applies.
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Runs `params.code` to completion.
    ///
    /// ```
    /// use kiln_vm::{ExecutionParams, Interpreter};
    /// use alloy::primitives::U256;
    ///
    /// // PUSH1 0x02, PUSH1 0x03, ADD
    /// let code = vec![0x60, 0x02, 0x60, 0x03, 0x01];
    /// let result = Interpreter::default().start(ExecutionParams::new(code));
    ///
    /// assert!(result.success);
    /// assert_eq!(result.stack, vec![U256::from(5)]);
    /// ```
    pub fn start(&self, params: ExecutionParams) -> ExecutionResult {
        self.start_with_observer(params, &mut NoopObserver)
    }

    /// Runs `params.code` to completion, reporting every executed instruction to `observer`.
    ///
    /// The code is deployed at `params.tx.to` first unless that account already has code, so
    /// that the contract can call into itself. A top-level fault or revert rolls back every
    /// state change of the execution.
    ///
    /// Nested frames recurse on the native stack, so the execution runs on a dedicated thread
    /// whose stack is sized for [`InterpreterConfig::max_call_depth`].
    pub fn start_with_observer(
        &self,
        params: ExecutionParams,
        observer: &mut dyn StepObserver,
    ) -> ExecutionResult {
        let ExecutionParams { code, tx, block, global_state, storage } = params;
        let selectors = find_selectors(&code);

        let mut world = World::new(global_state, storage);
        let deployed =
            world.state().get_account(&tx.to).is_some_and(|account| !account.code().is_empty());
        if !deployed && !code.is_empty() {
            world.set_code(tx.to, code.clone());
        }

        debug!(address = %tx.to, caller = %tx.from, code_size = code.len(), "starting execution");

        let checkpoint = world.checkpoint();
        let stack_size = execution_stack_size(self.config.max_call_depth);

        // the execution thread keeps logging through the caller's subscriber and span
        let dispatch = dispatcher::get_default(|dispatch| dispatch.clone());
        let span = Span::current();
        let spawned = thread::scope(|scope| {
            thread::Builder::new()
                .name("kiln-execution".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, || {
                    dispatcher::with_default(&dispatch, || {
                        span.in_scope(|| {
                            self.run_root(&mut world, &block, &tx, code.clone(), observer)
                        })
                    })
                })
                .map(|handle| handle.join())
        });
        let (result, stack) = match spawned {
            Ok(Ok(output)) => output,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(err) => {
                warn!(stack_size, "failed to spawn execution thread, running inline: {}", err);
                self.run_root(&mut world, &block, &tx, code, observer)
            }
        };

        let error = match &result.outcome {
            Outcome::Success => {
                world.commit(checkpoint);
                None
            }
            Outcome::Revert => {
                debug!("execution reverted");
                world.revert(checkpoint);
                None
            }
            Outcome::Fault(err) => {
                warn!("execution failed: {}", err);
                world.revert(checkpoint);
                Some(err.clone())
            }
        };

        let steps = world.steps();
        let (state, storage, logs) = world.into_parts();
        debug!(success = result.is_success(), steps, "execution finished");

        ExecutionResult {
            success: result.is_success(),
            stack,
            return_data: result.output,
            logs,
            global_state: state.to_sorted(),
            storage: storage.to_sorted(),
            selectors,
            error,
            steps,
        }
    }

    /// Runs the outermost frame of an execution, returning its result and final stack.
    fn run_root(
        &self,
        world: &mut World,
        block: &BlockData,
        tx: &TxData,
        code: Bytes,
        observer: &mut dyn StepObserver,
    ) -> (FrameResult, Vec<U256>) {
        let mut frame = Frame::new(
            world,
            block,
            CallContext::from(tx),
            code,
            false,
            0,
            self.config.memory_limit,
        );
        let result = self.execute(&mut frame, observer);
        (result, frame.stack.to_vec())
    }

    /// Runs a frame until it halts or faults.
    ///
    /// Faults never escape: they become [`Outcome::Fault`]. Committing or reverting the frame's
    /// state changes is up to the caller.
    pub fn execute(&self, frame: &mut Frame<'_>, observer: &mut dyn StepObserver) -> FrameResult {
        if frame.depth > self.config.max_call_depth {
            return FrameResult::fault(Error::CallDepthExceeded(self.config.max_call_depth));
        }

        let result = loop {
            if frame.pc >= frame.code.len() {
                break FrameResult::success(Bytes::new());
            }

            match self.step(frame, observer) {
                Ok(None) => {}
                Ok(Some(halt)) => break FrameResult::from(halt),
                Err(err) => {
                    debug!(depth = frame.depth, pc = frame.pc, "frame faulted: {}", err);
                    break FrameResult::fault(err);
                }
            }
        };

        debug!(
            depth = frame.depth,
            address = %frame.context.address,
            outcome = ?result.outcome,
            "frame finished"
        );
        result
    }

    /// Executes the instruction at `frame.pc`, returning how the frame halted if it did.
    fn step(
        &self,
        frame: &mut Frame<'_>,
        observer: &mut dyn StepObserver,
    ) -> Result<Option<Halt>, Error> {
        frame.world.tick(self.config.step_limit)?;

        let pc = frame.pc;
        let opcode = *frame.code.get(pc).ok_or(Error::ProgramCounterOutOfBounds(pc))?;
        let info = opcode_info(opcode).ok_or(Error::OpcodeNotImplemented(opcode))?;
        let handler = handler(opcode).ok_or(Error::OpcodeNotImplemented(opcode))?;

        if frame.is_static && info.is_mutating() {
            return Err(Error::StaticStateChange(info.name()));
        }

        // if step-tracing feature is enabled, print the current operation
        #[cfg(feature = "step-tracing")]
        trace!(
            depth = frame.depth,
            pc,
            opcode = info.name(),
            inputs = ?frame.stack.peek_n(info.inputs() as usize),
            "executing opcode"
        );

        let checkpoint = frame.world.checkpoint();
        let halt = match handler.execute(frame, self, observer)? {
            Control::Continue => {
                frame.pc += 1;
                None
            }
            Control::Advance(n) => {
                frame.pc += n;
                None
            }
            Control::Jump(destination) => {
                frame.pc = destination;
                None
            }
            Control::Halt(halt) => Some(halt),
        };

        if observer.is_enabled() {
            observer.on_step(&frame.snapshot(pc, opcode, info.name(), checkpoint));
        }

        Ok(halt)
    }
}

/// Native stack needed to nest `max_call_depth` frames below the outermost one.
fn execution_stack_size(max_call_depth: usize) -> usize {
    max_call_depth
        .saturating_add(1)
        .saturating_mul(FRAME_STACK_SIZE)
        .saturating_add(BASE_STACK_SIZE)
}
