//! Property-based tests for chatarchive.
//!
//! These tests generate random inputs to find edge cases.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use chatarchive::parser::ExportParser;
use chatarchive::render::group_runs;

/// Generate a timestamp at minute granularity (what export headers carry).
fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (2015i32..2031, 1u32..13, 1u32..29, 0u32..24, 0u32..60).prop_map(
        |(year, month, day, hour, minute)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap()
        },
    )
}

/// Senders without colons or surrounding whitespace (the header separator
/// is a colon).
fn arb_sender() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,16}[A-Za-z0-9]"
}

/// Single-line bodies without trailing whitespace.
fn arb_body() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,!?'()-]{0,50}[A-Za-z0-9.!?)]"
}

/// Continuation lines: no digits, so they can never match a header pattern;
/// no trailing whitespace, so the right-trim on append is a no-op.
fn arb_continuation() -> impl Strategy<Value = String> {
    "[a-z ]{0,30}[a-z]"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // LINE PARSER PROPERTIES
    // ============================================

    /// Formatting (timestamp, sender, body) back into header syntax and
    /// re-parsing yields an equal triple.
    #[test]
    fn header_roundtrip(ts in arb_timestamp(), sender in arb_sender(), body in arb_body()) {
        let parser = ExportParser::new();
        let line = format!("{} - {}: {}", ts.format("%d.%m.%y, %H:%M"), sender, body);

        let msg = parser.parse_line(&line).expect("formatted header must parse");
        prop_assert_eq!(msg.timestamp, ts);
        prop_assert_eq!(msg.sender, sender);
        prop_assert_eq!(msg.body, body);
    }

    /// The bracketed header form parses to the same triple as the dash form.
    #[test]
    fn header_bracketed_equivalent(ts in arb_timestamp(), sender in arb_sender(), body in arb_body()) {
        let parser = ExportParser::new();
        let dashed = format!("{} - {}: {}", ts.format("%d.%m.%y, %H:%M"), sender, body);
        let bracketed = format!("[{}] {}: {}", ts.format("%d.%m.%y, %H:%M"), sender, body);

        let a = parser.parse_line(&dashed).expect("dash form must parse");
        let b = parser.parse_line(&bracketed).expect("bracketed form must parse");
        prop_assert_eq!(a, b);
    }

    // ============================================
    // MESSAGE ASSEMBLER PROPERTIES
    // ============================================

    /// N header lines, each followed by zero or more continuation lines,
    /// assemble into exactly N messages whose bodies are the header body
    /// plus the continuations joined by newlines.
    #[test]
    fn assembler_preserves_structure(
        specs in prop::collection::vec(
            (arb_sender(), arb_body(), prop::collection::vec(arb_continuation(), 0..4)),
            1..12,
        ),
    ) {
        let parser = ExportParser::new();
        let base = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();

        let mut lines = Vec::new();
        let mut expected = Vec::new();
        for (i, (sender, body, continuations)) in specs.iter().enumerate() {
            let ts = base.and_hms_opt(12, 0, 0).unwrap()
                + chrono::Duration::minutes(i as i64);
            lines.push(format!("{} - {}: {}", ts.format("%d.%m.%y, %H:%M"), sender, body));
            lines.extend(continuations.iter().cloned());

            let mut full = body.clone();
            for cont in continuations {
                full.push('\n');
                full.push_str(cont);
            }
            expected.push((ts, sender.clone(), full));
        }

        let messages = parser.parse_str(&lines.join("\n")).unwrap();
        prop_assert_eq!(messages.len(), specs.len());
        for (msg, (ts, sender, body)) in messages.iter().zip(&expected) {
            prop_assert_eq!(msg.timestamp, *ts);
            prop_assert_eq!(&msg.sender, sender);
            prop_assert_eq!(&msg.body, body);
        }
    }

    // ============================================
    // GROUPING PROPERTIES
    // ============================================

    /// Grouping never loses or reorders messages.
    #[test]
    fn grouping_preserves_messages(
        senders in prop::collection::vec(prop::sample::select(vec!["Alice", "Bob", "Charlie"]), 0..20),
    ) {
        let base = NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let messages: Vec<_> = senders
            .iter()
            .enumerate()
            .map(|(i, sender)| {
                chatarchive::Message::new(
                    base + chrono::Duration::minutes(i as i64),
                    *sender,
                    format!("msg {}", i),
                )
            })
            .collect();

        let runs = group_runs(messages.clone());

        // Flattening the runs restores the original sequence.
        let flattened: Vec<_> = runs.iter().flat_map(|r| r.messages.clone()).collect();
        prop_assert_eq!(flattened, messages);

        // No two adjacent runs share a sender.
        for pair in runs.windows(2) {
            prop_assert_ne!(&pair[0].sender, &pair[1].sender);
        }
    }
}
