mod common;

use common::{TestDir, match_lines};
use proptest::prelude::*;

// Property-based test strategies
prop_compose! {
    // A log line: filler text, optionally with the marker spliced in
    fn arb_line()(
        prefix in "[a-z ]{0,12}",
        suffix in "[a-z ]{0,12}",
        marked in any::<bool>(),
    ) -> (String, bool) {
        if marked {
            (format!("{prefix}ERROR{suffix}"), true)
        } else {
            (format!("{prefix}{suffix}"), false)
        }
    }
}

prop_compose! {
    // Content split into chunks at arbitrary byte positions
    fn arb_chunked_log()(
        lines in prop::collection::vec(arb_line(), 1..30),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) -> (String, Vec<u64>, Vec<String>) {
        let content: String = lines.iter().map(|(text, _)| format!("{text}\n")).collect();
        let expected: Vec<u64> = lines
            .iter()
            .enumerate()
            .filter(|(_, (_, marked))| *marked)
            .map(|(i, _)| i as u64 + 1)
            .collect();

        let mut positions: Vec<usize> = cuts.iter().map(|c| c.index(content.len() + 1)).collect();
        positions.push(0);
        positions.push(content.len());
        positions.sort_unstable();
        positions.dedup();

        let chunks = positions
            .windows(2)
            .map(|w| content[w[0]..w[1]].to_string())
            .collect();

        (content, expected, chunks)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_matches_independent_of_poll_boundaries(
        (_content, expected, chunks) in arb_chunked_log()
    ) {
        let dir = TestDir::new().unwrap();
        dir.write("a.log", "").unwrap();
        let mut cycle = dir.cycle("ERROR");

        let mut found = match_lines(&cycle.run());
        for chunk in &chunks {
            dir.append("a.log", chunk).unwrap();
            found.extend(match_lines(&cycle.run()));
        }
        found.extend(match_lines(&cycle.run()));

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn test_state_tracks_consumed_lines(
        (content, _expected, chunks) in arb_chunked_log()
    ) {
        let dir = TestDir::new().unwrap();
        let path = dir.write("a.log", "").unwrap();
        let mut cycle = dir.cycle("ERROR");
        cycle.run();

        let mut last_offset = 0;
        let mut written = String::new();
        for chunk in &chunks {
            dir.append("a.log", chunk).unwrap();
            written.push_str(chunk);
            cycle.run();

            let record = cycle.registry().get(&path).unwrap();
            prop_assert!(record.byte_offset >= last_offset);
            last_offset = record.byte_offset;

            // Offset sits right after the last complete line written so far
            let complete = written.rfind('\n').map_or(0, |i| i + 1);
            prop_assert_eq!(record.byte_offset, complete as u64);
            prop_assert_eq!(record.line_count, written.matches('\n').count() as u64);
        }

        prop_assert_eq!(last_offset, content.len() as u64);
    }
}
