use std::str::FromStr;

use alloy::primitives::{address, keccak256, Address, B256, U256};
use kiln_common::utils::strings::{decode_hex, encode_hex};
use kiln_vm::{
    core::state::Account, BlockData, Error, ExecutionParams, ExecutionResult, GlobalState,
    Interpreter, InterpreterConfig, StepSnapshot, TraceCollector, TxData,
};

const CONTRACT: Address = address!("00000000000000000000000000000000c0dec0de");
const CALLER: Address = address!("00000000000000000000000000000000ca11e500");
const CALLEE: Address = address!("000000000000000000000000000000000000beef");

fn tx() -> TxData {
    TxData { to: CONTRACT, from: CALLER, origin: CALLER, ..Default::default() }
}

fn run_with(code: &str, global_state: GlobalState) -> ExecutionResult {
    let code = decode_hex(code).expect("invalid bytecode");
    Interpreter::default()
        .start(ExecutionParams::new(code).with_tx(tx()).with_global_state(global_state))
}

fn run(code: &str) -> ExecutionResult {
    run_with(code, GlobalState::new())
}

fn push32(value: U256) -> String {
    format!("7f{}", encode_hex(&value.to_be_bytes::<32>()))
}

fn push20(address: Address) -> String {
    format!("73{}", encode_hex(address.as_slice()))
}

fn word(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

/// A word whose leading bytes are `prefix` and the rest zero.
fn left_aligned(prefix: &[u8]) -> U256 {
    let mut bytes = [0u8; 32];
    bytes[..prefix.len()].copy_from_slice(prefix);
    U256::from_be_bytes(bytes)
}

fn with_callee(code: &str) -> GlobalState {
    let mut state = GlobalState::new();
    state.set_account(CALLEE, Account::with_code(decode_hex(code).expect("invalid bytecode")));
    state
}

#[test]
fn test_add_then_sub_is_identity() {
    let pairs = [
        (U256::ZERO, U256::ZERO),
        (U256::from(7), U256::from(3)),
        (U256::MAX, U256::from(1)),
        (U256::from(1), U256::MAX),
        (
            U256::from_str("0x8000000000000000000000000000000000000000000000000000000000000000")
                .expect("invalid word"),
            U256::from_str("0x8000000000000000000000000000000000000000000000000000000000000001")
                .expect("invalid word"),
        ),
    ];

    for (a, b) in pairs {
        // push b, push a, ADD, push b, SWAP1, SUB
        let code = format!("{}{}01{}9003", push32(b), push32(a), push32(b));
        let result = run(&code);

        assert!(result.success);
        assert_eq!(result.stack, vec![a]);
    }
}

#[test]
fn test_add_wraps_around() {
    let code = format!("6001{}01", push32(U256::MAX));
    let result = run(&code);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO]);
}

#[test]
fn test_division_by_zero_pushes_zero() {
    // 7 / 0, 7 % 0
    let result = run("60006007046000600706");

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO, U256::ZERO]);
}

#[test]
fn test_stack_overflow_faults() {
    let result = run(&"5f".repeat(1025));

    assert!(!result.success);
    assert_eq!(result.error, Some(Error::StackOverflow(1024)));
}

#[test]
fn test_stack_underflow_faults() {
    let result = run("600101");

    assert!(!result.success);
    assert!(matches!(result.error, Some(Error::StackUnderflow { .. })));
}

#[test]
fn test_sstore() {
    let result = run("6001600055");

    assert!(result.success);
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::from(1));
}

#[test]
fn test_return_after_mstore() {
    // MSTORE(0, 5) then RETURN(0, 0); the two trailing pushes stay on the stack
    let result = run("60056000526005600060006000f3");

    assert!(result.success);
    assert!(result.return_data.is_empty());
    assert_eq!(result.stack, vec![U256::from(5), U256::ZERO]);
}

#[test]
fn test_return_word() {
    // MSTORE(0, 0x2a), RETURN(0, 32)
    let result = run("602a60005260206000f3");

    assert!(result.success);
    assert_eq!(U256::from_be_slice(&result.return_data), U256::from(0x2a));
}

#[test]
fn test_revert_returns_requested_slice_and_rolls_back() {
    // SSTORE(0, 1), MSTORE(0, 0xdeadbeef), REVERT(28, 4)
    let result = run(concat!("6001600055", "63deadbeef600052", "6004601cfd"));

    assert!(!result.success);
    assert_eq!(&result.return_data[..], &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(result.error, None);
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::ZERO);
}

#[test]
fn test_jumpi_to_invalid_destination() {
    let result = run("600160055700");

    assert!(!result.success);
    assert_eq!(result.error, Some(Error::InvalidJumpDestination(5)));
}

#[test]
fn test_jumpi_with_zero_condition_skips_validation() {
    let result = run("600060ff576001");

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1)]);
}

#[test]
fn test_jumpi_taken() {
    // JUMPI over an INVALID to a JUMPDEST, then PUSH1 0x2a
    let result = run("6001600657fe5b602a");

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(0x2a)]);
}

#[test]
fn test_invalid_opcode_faults() {
    let result = run("fe");

    assert!(!result.success);
    assert_eq!(result.error, Some(Error::InvalidOpcode));

    let result = run("0c");
    assert_eq!(result.error, Some(Error::OpcodeNotImplemented(0x0c)));
}

#[test]
fn test_push_past_code_end_faults() {
    let result = run("61aa");

    assert!(!result.success);
    assert_eq!(result.error, Some(Error::ProgramCounterOutOfBounds(3)));
}

#[test]
fn test_call_to_codeless_account_transfers_value() {
    let mut state = GlobalState::new();
    state.set_account(CONTRACT, Account::with_balance(U256::from(100)));

    // CALL(gas, CALLEE, 10, 0, 0, 0, 0)
    let code = format!("6000600060006000600a{}5af1", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1)]);
    assert_eq!(result.global_state[&CALLEE].balance, U256::from(10));
    assert_eq!(result.global_state[&CONTRACT].balance, U256::from(90));
}

#[test]
fn test_call_with_insufficient_balance_pushes_zero() {
    let code = format!("6000600060006000600a{}5af1", push20(CALLEE));
    let result = run(&code);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO]);
    assert!(!result.global_state.contains_key(&CALLEE));
}

#[test]
fn test_call_copies_return_data() {
    // callee: SSTORE(0, 0x2a), MSTORE(0, 0x2a), RETURN(0, 32)
    let state = with_callee("602a600055602a60005260206000f3");

    // CALL(gas, CALLEE, 0, 0, 0, 0, 32), MLOAD(0), RETURNDATASIZE
    let code = format!("60206000600060006000{}5af16000513d", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1), U256::from(0x2a), U256::from(32)]);
    assert_eq!(result.storage_at(CALLEE, U256::ZERO), U256::from(0x2a));
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::ZERO);
}

#[test]
fn test_failed_call_rolls_back_callee_state() {
    // callee: SSTORE(0, 0x2a), LOG0(0, 0), REVERT(0, 0)
    let state = with_callee("602a60005560006000a060006000fd");
    let code = format!("60006000600060006000{}5af1", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO]);
    assert_eq!(result.storage_at(CALLEE, U256::ZERO), U256::ZERO);
    assert!(result.logs.is_empty());
}

#[test]
fn test_delegatecall_writes_caller_storage() {
    // library: SSTORE(0, 0x2a)
    let state = with_callee("602a600055");

    // DELEGATECALL(gas, CALLEE, 0, 0, 0, 0)
    let code = format!("6000600060006000{}5af4", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1)]);
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::from(0x2a));
    assert_eq!(result.storage_at(CALLEE, U256::ZERO), U256::ZERO);
}

#[test]
fn test_staticcall_rejects_state_changes() {
    let state = with_callee("602a600055");

    // STATICCALL(gas, CALLEE, 0, 0, 0, 0)
    let code = format!("6000600060006000{}5afa", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO]);
    assert_eq!(result.storage_at(CALLEE, U256::ZERO), U256::ZERO);
}

#[test]
fn test_staticcall_allows_reads() {
    // callee: CALLER, PUSH1 0, MSTORE, RETURN(0, 32)
    let state = with_callee("3360005260206000f3");

    let code = format!("6020600060006000{}5afa600051", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1), word(CONTRACT)]);
}

#[test]
fn test_create_deploys_runtime_code() {
    // init code: MSTORE(0, 0x602a), RETURN(30, 2), so the runtime code is PUSH1 0x2a
    let init = "61602a6000526002601ef3";

    // MSTORE(0, init) leaves it right-aligned at offset 21, then CREATE(0, 21, 11)
    let code = format!("6a{init}600052600b60156000f0");
    let result = run(&code);

    let created = CONTRACT.create(0);
    assert!(result.success);
    assert_eq!(result.stack, vec![word(created)]);
    assert_eq!(result.global_state[&created].code(), &[0x60, 0x2a]);
    assert_eq!(result.global_state[&created].nonce, 1);
    assert_eq!(result.global_state[&CONTRACT].nonce, 1);
}

#[test]
fn test_create2_address() {
    let init = "61602a6000526002601ef3";

    // CREATE2(0, 21, 11, salt = 0x11)
    let code = format!("6a{init}6000526011600b60156000f5");
    let result = run(&code);

    let init = decode_hex(init).expect("invalid bytecode");
    let created = CONTRACT.create2_from_code(B256::with_last_byte(0x11), &init);
    assert!(result.success);
    assert_eq!(result.stack, vec![word(created)]);
    assert_eq!(result.global_state[&created].code(), &[0x60, 0x2a]);
}

#[test]
fn test_create_with_reverting_init_code() {
    // init code: SSTORE(0, 1), REVERT(0, 0)
    let init = "600160005560006000fd";
    let code = format!("69{init}600052600a60166000f0");
    let result = run(&code);

    let created = CONTRACT.create(0);
    assert!(result.success);
    assert_eq!(result.stack, vec![U256::ZERO]);
    assert!(!result.global_state.contains_key(&created));
    assert_eq!(result.storage_at(created, U256::ZERO), U256::ZERO);
}

#[test]
fn test_call_depth_is_bounded() {
    let interpreter = Interpreter::new(InterpreterConfig { max_call_depth: 8, ..Default::default() });

    // CALL(gas, ADDRESS, 0, 0, 0, 0, 0) forever
    let code = decode_hex("60006000600060006000305af1").expect("invalid bytecode");
    let result = interpreter.start(ExecutionParams::new(code).with_tx(tx()));

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1)]);
}

#[test]
fn test_call_depth_default_limit() {
    // CALL(gas, ADDRESS, 0, 0, 0, 0, 0) until the default depth limit stops it
    let code = decode_hex("60006000600060006000305af1").expect("invalid bytecode");
    let result = Interpreter::default().start(ExecutionParams::new(code).with_tx(tx()));

    assert!(result.success);
    assert_eq!(result.error, None);
    assert_eq!(result.stack, vec![U256::from(1)]);
}

#[test]
fn test_copy_with_huge_size_faults() {
    // size 0x0fffffffffffffff, offset 0, destination 0
    let copies = [
        "670fffffffffffffff6000600037",
        "670fffffffffffffff6000600039",
        "670fffffffffffffff600060003e",
        "670fffffffffffffff6000600060003c",
    ];

    for code in copies {
        let result = run(code);

        assert!(!result.success);
        assert!(matches!(result.error, Some(Error::InvalidMemoryOffset(_))), "{code}");
    }
}

#[test]
fn test_call_with_huge_return_size_faults() {
    let state = with_callee("602a60005260206000f3");

    // CALL(gas, CALLEE, 0, 0, 0, 0, 0x0fffffffffffffff)
    let code = format!("670fffffffffffffff6000600060006000{}5af1", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(!result.success);
    assert!(matches!(result.error, Some(Error::InvalidMemoryOffset(_))));
}

#[test]
fn test_calldatacopy_pads_with_zeros() {
    let calldata = decode_hex("a9059cbb").expect("invalid calldata");

    // CALLDATACOPY(0, 2, 4), MLOAD(0)
    let code = decode_hex("60046002600037600051").expect("invalid bytecode");
    let result = Interpreter::default().start(
        ExecutionParams::new(code).with_tx(TxData { data: calldata.into(), ..tx() }),
    );

    assert!(result.success);
    assert_eq!(result.stack, vec![left_aligned(&[0x9c, 0xbb])]);
}

#[test]
fn test_codecopy_pads_with_zeros() {
    // CODECOPY(0, 4, 12), MLOAD(0)
    let result = run("600c6004600039600051");

    assert!(result.success);
    assert_eq!(result.stack, vec![left_aligned(&[0x60, 0x00, 0x39, 0x60, 0x00, 0x51])]);
}

#[test]
fn test_extcodecopy() {
    let state = with_callee("602a");

    // EXTCODECOPY(CALLEE, 0, 0, 4), MLOAD(0), EXTCODECOPY(missing, 32, 0, 32), MLOAD(32)
    let missing = address!("00000000000000000000000000000000c0dec0df");
    let code = format!(
        "600460006000{}3c600051602060006020{}3c602051",
        push20(CALLEE),
        push20(missing)
    );
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![left_aligned(&[0x60, 0x2a]), U256::ZERO]);
}

#[test]
fn test_returndatacopy_pads_with_zeros() {
    // callee: MSTORE(0, 0x2a), RETURN(0, 32)
    let state = with_callee("602a60005260206000f3");

    // CALL(gas, CALLEE, 0, 0, 0, 0, 0), RETURNDATACOPY(0, 30, 4), MLOAD(0)
    let code = format!("60006000600060006000{}5af16004601e60003e600051", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1), left_aligned(&[0x00, 0x2a])]);
}

#[test]
fn test_selfdestruct_moves_balance_and_halts() {
    let mut state = GlobalState::new();
    state.set_account(CONTRACT, Account::with_balance(U256::from(100)));

    // SELFDESTRUCT(CALLEE), then an SSTORE(0, 1) that must never run
    let code = format!("{}ff6001600055", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert!(result.stack.is_empty());
    assert!(!result.global_state.contains_key(&CONTRACT));
    assert_eq!(result.global_state[&CALLEE].balance, U256::from(100));
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::ZERO);
}

#[test]
fn test_blockhash() {
    let known = B256::repeat_byte(0xab);
    let mut state = GlobalState::new();
    state.set_block_hash(99, known);

    // BLOCKHASH(99), BLOCKHASH(100), BLOCKHASH(0)
    let code = decode_hex("606340606440600040").expect("invalid bytecode");
    let result = Interpreter::default().start(
        ExecutionParams::new(code)
            .with_tx(tx())
            .with_block(BlockData { number: 100, ..Default::default() })
            .with_global_state(state),
    );

    assert!(result.success);
    assert_eq!(
        result.stack,
        vec![
            U256::from_be_bytes(known.0),
            U256::ZERO,
            U256::from_be_bytes(keccak256(U256::ZERO.to_be_bytes::<32>()).0),
        ]
    );
}

#[test]
fn test_transient_storage() {
    // TSTORE(1, 0x2a), TLOAD(1), TLOAD(2)
    let result = run("602a60015d60015c60025c");

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(0x2a), U256::ZERO]);
    assert_eq!(result.storage_at(CONTRACT, U256::from(1)), U256::ZERO);
}

#[test]
fn test_mcopy() {
    // MSTORE(0, 0x0102030405), MCOPY(32, 0, 32), MLOAD(32), MSIZE
    let result = run("6401020304056000526020600060205e60205159");

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(0x0102030405u64), U256::from(64)]);
}

#[test]
fn test_callcode_writes_caller_storage() {
    // library: SSTORE(0, 0x2a)
    let state = with_callee("602a600055");

    // CALLCODE(gas, CALLEE, 0, 0, 0, 0, 0)
    let code = format!("60006000600060006000{}5af2", push20(CALLEE));
    let result = run_with(&code, state);

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(1)]);
    assert_eq!(result.storage_at(CONTRACT, U256::ZERO), U256::from(0x2a));
    assert_eq!(result.storage_at(CALLEE, U256::ZERO), U256::ZERO);
}

#[test]
fn test_step_limit() {
    let interpreter = Interpreter::new(InterpreterConfig { step_limit: 100, ..Default::default() });

    // JUMPDEST, PUSH1 0, JUMP
    let code = decode_hex("5b600056").expect("invalid bytecode");
    let result = interpreter.start(ExecutionParams::new(code));

    assert!(!result.success);
    assert_eq!(result.error, Some(Error::StepLimitExceeded(100)));
    assert_eq!(result.steps, 100);
}

#[test]
fn test_logs() {
    // MSTORE(0, 0xaa), LOG1(0, 32, 0x11)
    let result = run("60aa600052601160206000a1");

    assert!(result.success);
    assert_eq!(result.logs.len(), 1);
    assert_eq!(result.logs[0].address, CONTRACT);
    assert_eq!(result.logs[0].topics, vec![B256::with_last_byte(0x11)]);
    assert_eq!(result.logs[0].data.len(), 32);
    assert_eq!(result.logs[0].data[31], 0xaa);
}

#[test]
fn test_calldata() {
    let calldata = decode_hex("a9059cbb").expect("invalid calldata");
    let code = decode_hex("60003560e01c36").expect("invalid bytecode");
    let result = Interpreter::default().start(
        ExecutionParams::new(code).with_tx(TxData { data: calldata.into(), ..tx() }),
    );

    assert!(result.success);
    assert_eq!(result.stack, vec![U256::from(0xa9059cbbu64), U256::from(4)]);
}

#[test]
fn test_observer_sees_every_step() {
    let mut collector = TraceCollector::new();
    let code = decode_hex("6002600301").expect("invalid bytecode");
    let result = Interpreter::default().start_with_observer(ExecutionParams::new(code), &mut collector);

    assert!(result.success);
    let steps = collector.into_steps();
    let names = steps.iter().map(|step| step.name).collect::<Vec<_>>();
    assert_eq!(names, vec!["PUSH1", "PUSH1", "ADD"]);
    assert_eq!(steps.iter().map(|step| step.pc).collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(steps[2].stack, vec![U256::from(5)]);
}

#[test]
fn test_observer_sees_storage_changes_and_sub_calls() {
    let state = with_callee("602a600055");
    let code = format!("60006000600060006000{}5af1", push20(CALLEE));
    let code = decode_hex(&code).expect("invalid bytecode");

    let mut depths = Vec::new();
    let mut call_changes = 0;
    let mut observer = |step: &StepSnapshot| {
        depths.push(step.depth);
        if step.name == "CALL" {
            call_changes = step.storage_changes.len();
        }
    };
    let result = Interpreter::default().start_with_observer(
        ExecutionParams::new(code).with_tx(tx()).with_global_state(state),
        &mut observer,
    );

    assert!(result.success);
    assert!(depths.contains(&1));
    assert_eq!(call_changes, 1);
}

#[test]
fn test_selectors_are_reported() {
    let result = run("60003560e01c8063a9059cbb1461002057005b00");

    assert_eq!(result.selectors, vec!["0xa9059cbb"]);
}

#[test]
fn test_result_serialization() {
    let result = run("602a60005260206000f3");
    let json = serde_json::to_value(&result).expect("failed to serialize result");

    assert_eq!(json["success"], true);
    assert!(json.get("return").is_some());
    assert!(json.get("globalState").is_some());
    assert!(json.get("error").is_none());
}

#[test]
fn test_concurrent_executions() {
    let interpreter = Interpreter::default();
    let code = decode_hex(concat!(
        "6000600160",
        "5a",
        "5b8015601857600190039181019091600656",
        "5b50506000526020",
        "6000f3"
    ))
    .expect("invalid bytecode");

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| scope.spawn(|| interpreter.start(ExecutionParams::new(code.clone()))))
            .collect::<Vec<_>>();

        for handle in handles {
            let result = handle.join().expect("execution thread panicked");
            assert!(result.success);
            assert_eq!(
                U256::from_be_slice(&result.return_data),
                U256::from(2880067194370816120u64)
            );
        }
    });
}
