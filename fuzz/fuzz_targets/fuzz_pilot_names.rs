// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use angle_renamer::pilot::{split_batches, PilotMatcher};
use angle_renamer::AppConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let matcher = PilotMatcher::new(&AppConfig::default().image_extensions).unwrap();

    let mut names: Vec<String> = text.lines().map(String::from).collect();
    names.sort();
    let split = split_batches(&names, &matcher);

    let total: usize = split.orphans.len()
        + split.batches.iter().map(|b| b.members.len() + 1).sum::<usize>();
    assert_eq!(total, names.len());
    for batch in &split.batches {
        assert_eq!(batch.batch_id.chars().count(), 2);
        assert!(batch.members.iter().all(|m| matcher.batch_id(m).is_none()));
    }
});
