// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;

#[test]
fn fake_clock_advances_by_given_duration() {
    let start = "2026-01-01T00:00:00Z".parse().unwrap();
    let clock = FakeClock::new(start);
    clock.advance(Duration::hours(6));
    assert_eq!(clock.now(), start + Duration::hours(6));
}

#[test]
fn fake_clock_set_overrides_current_time() {
    let clock = FakeClock::new("2026-01-01T00:00:00Z".parse().unwrap());
    let later = "2026-06-01T00:00:00Z".parse().unwrap();
    clock.set(later);
    assert_eq!(clock.now(), later);
}
