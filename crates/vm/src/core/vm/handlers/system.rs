use alloy::primitives::{Bytes, U256};
use tracing::trace;

use crate::{
    core::{
        journal::Checkpoint,
        memory::{region, slice_padded},
        state::Account,
        word::from_address,
    },
    error::Error,
};

use super::super::{
    core::Interpreter,
    execution::{Control, FrameResult, Halt},
    frame::{CallContext, Frame},
    observer::StepObserver,
};

/// The four ways of running another account's code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
}

/// Runs `code` in a child frame one level below `frame`, sharing its world.
fn run_child(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
    context: CallContext,
    code: Bytes,
    is_static: bool,
) -> Result<FrameResult, Error> {
    let depth = frame.world.enter_frame();
    debug_assert_eq!(depth, frame.depth + 1, "frame nesting out of sync");
    trace!(depth, address = %context.address, caller = %context.caller, "entering child frame");

    let result = {
        let mut child = Frame::new(
            &mut *frame.world,
            frame.block,
            context,
            code,
            frame.is_static || is_static,
            depth,
            interpreter.config().memory_limit,
        );
        interpreter.execute(&mut child, observer)
    };

    frame.world.leave_frame()?;
    Ok(result)
}

/// Pushes 0, clears the return-data buffer and moves on. Used when a call or create is
/// rejected before any code runs.
fn reject(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.return_data = Bytes::new();
    frame.stack.push(U256::ZERO)?;
    Ok(Control::Continue)
}

/// Applies the outcome of a call: keeps or discards its changes, copies its output into the
/// caller-specified memory range and pushes the success flag.
fn finish_call(
    frame: &mut Frame<'_>,
    checkpoint: Checkpoint,
    result: FrameResult,
    ret_offset: usize,
    ret_size: usize,
) -> Result<Control, Error> {
    if result.is_success() {
        frame.world.commit(checkpoint);
        let output = slice_padded(&result.output, 0, ret_size);
        frame.memory.store(ret_offset, &output, ret_size)?;
        frame.stack.push(U256::from(1))?;
    } else {
        frame.world.revert(checkpoint);
        frame.stack.push(U256::ZERO)?;
    }

    frame.return_data = result.output;
    Ok(Control::Continue)
}

fn call_family(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
    kind: CallKind,
) -> Result<Control, Error> {
    // gas is ignored; every call gets the frame's full allowance
    let _gas = frame.stack.pop()?;
    let target = frame.pop_address()?;
    let value = match kind {
        CallKind::Call | CallKind::CallCode => frame.stack.pop()?,
        CallKind::DelegateCall | CallKind::StaticCall => U256::ZERO,
    };
    let input = frame.pop_memory_range()?;
    let ret_offset = frame.stack.pop()?;
    let ret_size = frame.stack.pop()?;
    let (ret_offset, ret_size) = region(ret_offset, ret_size)?;
    frame.memory.ensure_writable(ret_offset, ret_size)?;

    if kind == CallKind::Call && frame.is_static && !value.is_zero() {
        return Err(Error::StaticStateChange("CALL"));
    }

    let (address, caller, value) = match kind {
        CallKind::Call | CallKind::StaticCall => (target, frame.context.address, value),
        CallKind::CallCode => (frame.context.address, frame.context.address, value),
        CallKind::DelegateCall => {
            (frame.context.address, frame.context.caller, frame.context.value)
        }
    };
    let context = CallContext {
        address,
        caller,
        origin: frame.context.origin,
        value,
        data: Bytes::from(input),
        gas_price: frame.context.gas_price,
        gas: frame.context.gas,
    };

    trace!(depth = frame.depth, kind = ?kind, target = %target, value = %value, "sub-call");

    let checkpoint = frame.world.checkpoint();
    let funded = match kind {
        CallKind::Call => frame.world.transfer(frame.context.address, target, value),
        // the value never leaves the caller, but it must still be covered
        CallKind::CallCode => frame.world.state().get_balance(&frame.context.address) >= value,
        CallKind::DelegateCall | CallKind::StaticCall => true,
    };
    if !funded {
        frame.world.revert(checkpoint);
        return reject(frame);
    }

    let code = frame.world.state().get_code(&target);
    let result = if code.is_empty() {
        FrameResult::success(Bytes::new())
    } else {
        run_child(frame, interpreter, observer, context, code, kind == CallKind::StaticCall)?
    };

    finish_call(frame, checkpoint, result, ret_offset, ret_size)
}

fn create_family(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
    with_salt: bool,
) -> Result<Control, Error> {
    let value = frame.stack.pop()?;
    let init_code = frame.pop_memory_range()?;
    let salt = if with_salt { Some(frame.stack.pop()?) } else { None };

    let creator = frame.context.address;
    if frame.world.state().get_balance(&creator) < value {
        return reject(frame);
    }

    let nonce = frame.world.increment_nonce(creator);
    let address = match salt {
        Some(salt) => creator.create2_from_code(salt.to_be_bytes::<32>(), &init_code),
        None => creator.create(nonce),
    };

    let collision = frame
        .world
        .state()
        .get_account(&address)
        .is_some_and(|account| account.nonce > 0 || !account.code().is_empty());
    if collision {
        trace!(address = %address, "create collision");
        return reject(frame);
    }

    trace!(depth = frame.depth, creator = %creator, address = %address, "create");

    let checkpoint = frame.world.checkpoint();
    let balance = frame.world.state().get_balance(&address);
    frame.world.set_account(address, Account { balance, code: None, nonce: 1 });
    frame.world.transfer(creator, address, value);

    let context = CallContext {
        address,
        caller: creator,
        origin: frame.context.origin,
        value,
        data: Bytes::new(),
        gas_price: frame.context.gas_price,
        gas: frame.context.gas,
    };
    let result = run_child(frame, interpreter, observer, context, Bytes::from(init_code), false)?;

    if result.is_success() {
        frame.world.set_code(address, result.output);
        frame.world.commit(checkpoint);
        frame.return_data = Bytes::new();
        frame.stack.push(from_address(address))?;
    } else {
        frame.world.revert(checkpoint);
        frame.return_data = result.output;
        frame.stack.push(U256::ZERO)?;
    }
    Ok(Control::Continue)
}

/// CREATE - Create a new account with associated code
pub fn create(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    create_family(frame, interpreter, observer, false)
}

/// CALL - Message-call into an account
pub fn call(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    call_family(frame, interpreter, observer, CallKind::Call)
}

/// CALLCODE - Message-call into this account with alternative account's code
pub fn callcode(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    call_family(frame, interpreter, observer, CallKind::CallCode)
}

/// RETURN - Halt execution returning output data
pub fn op_return(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let data = frame.pop_memory_range()?;
    frame.pc = frame.code.len();
    Ok(Control::Halt(Halt::Return(Bytes::from(data))))
}

/// DELEGATECALL - Message-call into this account with an alternative account's code
pub fn delegatecall(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    call_family(frame, interpreter, observer, CallKind::DelegateCall)
}

/// CREATE2 - Create a new account with associated code at a predictable address
pub fn create2(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    create_family(frame, interpreter, observer, true)
}

/// STATICCALL - Static message-call into an account
pub fn staticcall(
    frame: &mut Frame<'_>,
    interpreter: &Interpreter,
    observer: &mut dyn StepObserver,
) -> Result<Control, Error> {
    call_family(frame, interpreter, observer, CallKind::StaticCall)
}

/// REVERT - Halt execution reverting state changes
pub fn revert(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let data = frame.pop_memory_range()?;
    frame.pc = frame.code.len();
    Ok(Control::Halt(Halt::Revert(Bytes::from(data))))
}

/// INVALID - Designated invalid instruction
pub fn invalid(_frame: &mut Frame<'_>) -> Result<Control, Error> {
    Err(Error::InvalidOpcode)
}

/// SELFDESTRUCT - Halt execution and register account for later deletion
///
/// The balance moves to the beneficiary and the account is removed right away.
pub fn selfdestruct(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let beneficiary = frame.pop_address()?;
    frame.world.destroy(frame.context.address, beneficiary);
    Ok(Control::Halt(Halt::SelfDestruct))
}
