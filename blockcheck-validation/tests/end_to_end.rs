#![deny(unsafe_code)]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

//! End-to-end runs of the harness against the behavioral core.
//!
//! ## Test Categories
//!
//! 1. **Scenarios**: the single-session ECB and CTR walkthroughs
//! 2. **Embedded corpora**: every built-in vector under several core timings
//! 3. **Round trip**: device encrypt followed by device decrypt
//! 4. **Failure paths**: injected corruption, stuck readiness, fail-fast

use blockcheck_primitives::{
    Block, ChainingParams, CipherKey, CounterBlock, Direction, Mode, Session, expected_output,
};
use blockcheck_validation::device::sim::{CoreTiming, Fault, PipelinedCore};
use blockcheck_validation::kat::vectors;
use blockcheck_validation::logging::init_test_tracing;
use blockcheck_validation::orchestrator::{run_cases, run_embedded, validate_session};
use blockcheck_validation::{HarnessConfig, Port, TestHarness, Verdict};
use proptest::prelude::*;

const KEY: &str = "000102030405060708090a0b0c0d0e0f";
const PT0: &str = "6bc1bee22e409f96e93d7e117393172a";
const PT1: &str = "ae2d8a571e03ac9c9eb76fac45af8e51";

fn harness(timing: CoreTiming) -> TestHarness<PipelinedCore> {
    TestHarness::simulated(timing, HarnessConfig::default()).unwrap()
}

fn harness_with(core: PipelinedCore, config: HarnessConfig) -> TestHarness<PipelinedCore> {
    TestHarness::new(core, config).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_ecb_two_identical_blocks() {
    init_test_tracing();
    let mut h = harness(CoreTiming::default());
    let block = Block::from_hex(PT0).unwrap();
    let session = Session::new(
        Mode::Ecb,
        CipherKey::from_hex(KEY).unwrap(),
        Direction::Encrypt,
        ChainingParams::None,
        vec![block, block],
    )
    .unwrap();

    let out = h.run_session(session).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[0].to_hex(), "47c58d5e21caaf840d015b7d9b910981");
    assert_eq!(h.device().protocol_violations(), 0);
}

#[test]
fn test_ctr_counter_two() {
    init_test_tracing();
    let mut h = harness(CoreTiming::default());
    let nonce = [0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7];
    let session = Session::new(
        Mode::Ctr,
        CipherKey::from_hex(KEY).unwrap(),
        Direction::Encrypt,
        ChainingParams::Counter(CounterBlock::new(nonce, 2)),
        vec![Block::from_hex(PT0).unwrap(), Block::from_hex(PT1).unwrap()],
    )
    .unwrap();

    let expected = expected_output(&session).unwrap();
    let out = h.run_session(session).unwrap();
    assert_eq!(out, expected);
    assert_eq!(out[0].to_hex(), "c14b114ade3f4cba9093a78ac8c50ce7");
    assert_eq!(out[1].to_hex(), "55fc4f0fafc1115f819b1116aa0697ff");
}

// ============================================================================
// Embedded corpora
// ============================================================================

#[test]
fn test_embedded_corpora_pass_on_default_core() {
    init_test_tracing();
    let mut h = harness(CoreTiming::default());
    let summary = run_embedded(&mut h).unwrap();
    assert!(summary.all_passed(), "{}", summary.render());
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.passed, vectors::ALL.iter().map(|c| c.parse().cases.len()).sum::<usize>());
    assert_eq!(summary.by_mode().len(), 5);
    assert_eq!(h.device().protocol_violations(), 0);
}

#[test]
fn test_embedded_corpora_pass_under_other_timings() {
    let timings = [
        CoreTiming::default().with_latency(1).with_fifo_depth(1).with_hold_last_block(false),
        CoreTiming::default().with_latency(30).with_fifo_depth(4),
        CoreTiming::default().with_latency(2).with_fifo_depth(2).with_hold_last_block(false),
    ];
    for timing in timings {
        let mut h = harness(timing);
        let summary = run_embedded(&mut h).unwrap();
        assert!(summary.all_passed(), "{timing:?}\n{}", summary.render());
        assert_eq!(h.device().protocol_violations(), 0, "{timing:?}");
    }
}

// ============================================================================
// Round trip
// ============================================================================

fn params_for(mode: Mode, iv: u128) -> ChainingParams {
    match mode {
        Mode::Ecb => ChainingParams::None,
        Mode::Ctr => ChainingParams::Counter(CounterBlock::from_block(Block::from_u128(iv))),
        _ => ChainingParams::Iv(Block::from_u128(iv)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_device_round_trip(
        mode_index in 0usize..5,
        key in prop::sample::select(vec![16usize, 24, 32])
            .prop_flat_map(|n| prop::collection::vec(any::<u8>(), n)),
        iv in any::<u128>(),
        data in prop::collection::vec(any::<u128>(), 1..7),
    ) {
        let mode = Mode::ALL[mode_index];
        let key = CipherKey::new(&key).unwrap();
        let plaintext: Vec<Block> = data.into_iter().map(Block::from_u128).collect();
        let mut h = harness(CoreTiming::default().with_latency(3));

        let params = params_for(mode, iv);
        let encrypt =
            Session::new(mode, key.clone(), Direction::Encrypt, params, plaintext.clone()).unwrap();
        let ciphertext = h.run_session(encrypt).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len());

        let decrypt = Session::new(mode, key, Direction::Decrypt, params, ciphertext).unwrap();
        let recovered = h.run_session(decrypt).unwrap();
        prop_assert_eq!(recovered, plaintext);
        prop_assert_eq!(h.device().protocol_violations(), 0);
    }
}

// ============================================================================
// Failure paths
// ============================================================================

#[test]
fn test_corrupted_block_reports_three_way_mismatch() {
    init_test_tracing();
    let mask = Block::from_u128(1);
    let core = PipelinedCore::new(CoreTiming::default())
        .unwrap()
        .with_fault(Fault::CorruptOutput { index: 1, mask });
    let mut h = harness_with(core, HarnessConfig::default());

    let parsed = vectors::SP800_38A_CBC.parse();
    let summary = run_cases(&mut h, "cbc", Mode::Cbc, &parsed.cases).unwrap();
    assert_eq!(summary.failed, parsed.cases.len());

    let first = &summary.outcomes[0];
    match &first.verdict {
        Verdict::Mismatch(m) => {
            assert_eq!(m.index, 1);
            assert_eq!(m.actual, m.reference ^ mask);
            assert_eq!(m.published, Some(m.reference));
        }
        other => panic!("expected a mismatch, got {other}"),
    }
}

#[test]
fn test_single_block_cases_survive_late_corruption() {
    let core = PipelinedCore::new(CoreTiming::default())
        .unwrap()
        .with_fault(Fault::CorruptOutput { index: 1, mask: Block::from_u128(0xff) });
    let mut h = harness_with(core, HarnessConfig::default());
    let parsed = vectors::AESAVS_ECBGFSBOX128.parse();
    let summary = run_cases(&mut h, "gfsbox", Mode::Ecb, &parsed.cases).unwrap();
    assert!(summary.all_passed(), "{}", summary.render());
}

#[test]
fn test_stuck_get_times_out_every_case_and_run_continues() {
    init_test_tracing();
    let core = PipelinedCore::new(CoreTiming::default())
        .unwrap()
        .with_fault(Fault::StuckNotReady(Port::Get));
    let mut h = harness_with(core, HarnessConfig::new().with_max_wait_cycles(100));

    let parsed = vectors::SP800_38A_OFB.parse();
    let summary = run_cases(&mut h, "ofb", Mode::Ofb, &parsed.cases).unwrap();
    assert_eq!(summary.failed, parsed.cases.len());
    for outcome in &summary.outcomes {
        assert!(
            matches!(
                outcome.verdict,
                Verdict::Timeout { operation: Port::Get, waited_cycles: 100 }
            ),
            "{}",
            outcome.verdict
        );
    }
    assert_eq!(h.sessions_run(), parsed.cases.len() as u64);
}

#[test]
fn test_fail_fast_stops_after_first_failure() {
    let core = PipelinedCore::new(CoreTiming::default())
        .unwrap()
        .with_fault(Fault::StuckNotReady(Port::EndOfText));
    let config = HarnessConfig::new().with_max_wait_cycles(50).with_fail_fast(true);
    let mut h = harness_with(core, config);
    let summary = run_embedded(&mut h).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.outcomes.len(), 1);
}

#[test]
fn test_published_check_can_be_disabled() {
    let key = CipherKey::from_hex(KEY).unwrap();
    let session = Session::new(
        Mode::Ecb,
        key,
        Direction::Encrypt,
        ChainingParams::None,
        vec![Block::from_hex(PT0).unwrap()],
    )
    .unwrap();
    let wrong = [Block::ZERO];

    let mut h = harness(CoreTiming::default());
    let verdict = validate_session(&mut h, session.clone(), Some(&wrong[..])).unwrap();
    assert!(matches!(verdict, Verdict::Mismatch(_)));
    let verdict = validate_session(&mut h, session, None).unwrap();
    assert_eq!(verdict, Verdict::Pass);
}
