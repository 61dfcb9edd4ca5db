// msgforge-core/tests/proptest_coerce.rs
// ============================================================================
// Module: Coercion Property-Based Tests
// Description: Property tests for scalar coercion stability and canonical output.
// Purpose: Detect panics and invariants across wide input ranges.
// ============================================================================

//! Property-based tests for coercion invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use msgforge_core::ScalarKind;
use msgforge_core::Value;
use msgforge_core::coerce_scalar;
use msgforge_core::format_duration;
use proptest::prelude::*;
use time::Duration;

proptest! {
    #[test]
    fn int_decimal_text_round_trips(n in any::<i64>()) {
        let coerced = coerce_scalar(ScalarKind::Int, "field", &n.to_string());
        prop_assert_eq!(coerced, Ok(Value::Int(n)));
    }

    #[test]
    fn uint_decimal_text_round_trips(n in any::<u64>()) {
        let coerced = coerce_scalar(ScalarKind::Uint, "field", &n.to_string());
        prop_assert_eq!(coerced, Ok(Value::Uint(n)));
    }

    #[test]
    fn string_coercion_is_verbatim(text in ".*") {
        let coerced = coerce_scalar(ScalarKind::String, "field", &text);
        prop_assert_eq!(coerced, Ok(Value::Str(text)));
    }

    #[test]
    fn bytes_accept_any_standard_base64(payload in prop::collection::vec(any::<u8>(), 0 .. 256)) {
        let encoded = BASE64.encode(&payload);
        let coerced = coerce_scalar(ScalarKind::Bytes, "field", &encoded);
        prop_assert_eq!(coerced, Ok(Value::Bytes(payload)));
    }

    #[test]
    fn suffixed_seconds_parse_to_whole_seconds(seconds in -1_000_000_i64 .. 1_000_000) {
        let coerced = coerce_scalar(ScalarKind::Duration, "field", &format!("{seconds}s"));
        prop_assert_eq!(coerced, Ok(Value::Duration(Duration::seconds(seconds))));
    }

    #[test]
    fn formatted_whole_durations_coerce_back(seconds in -1_000_000_i64 .. 1_000_000) {
        let formatted = format_duration(Duration::seconds(seconds));
        let coerced = coerce_scalar(ScalarKind::Duration, "field", &formatted);
        prop_assert_eq!(coerced, Ok(Value::Duration(Duration::seconds(seconds))));
    }

    #[test]
    fn unix_seconds_survive_timestamp_rendering(seconds in 0_i64 .. 4_000_000_000) {
        let coerced = coerce_scalar(ScalarKind::Timestamp, "field", &seconds.to_string());
        let Ok(Value::Timestamp(timestamp)) = coerced else {
            return Err(TestCaseError::fail("expected a timestamp value"));
        };
        prop_assert_eq!(timestamp.unix_timestamp(), seconds);
    }
}
