// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Monotonic system clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::interval::TimePoint;

use super::Clock;

/// Wall-clock backed [`Clock`] with a monotonicity guard.
///
/// Reads the system clock but never moves backwards: if the OS clock steps
/// back (NTP correction, VM migration), successive calls still return
/// strictly increasing instants by advancing one nanosecond past the last
/// value handed out. Safe under concurrent access.
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    fn physical_time_nanos() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimePoint {
        loop {
            let physical = Self::physical_time_nanos();
            let last = self.last.load(Ordering::Acquire);
            let next = physical.max(last.saturating_add(1));

            match self
                .last
                .compare_exchange(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return TimePoint::from_nanos(next),
                Err(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic() {
        let clock = SystemClock::new();
        let mut last = clock.now();

        for _ in 0..1000 {
            let current = clock.now();
            assert!(
                current > last,
                "system clock must be strictly increasing: {} > {}",
                current,
                last
            );
            last = current;
        }
    }

    #[test]
    fn test_concurrent_monotonic() {
        use std::sync::Arc;
        use std::thread;

        let clock = Arc::new(SystemClock::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let clock = Arc::clone(&clock);
            handles.push(thread::spawn(move || {
                let mut last = clock.now();
                for _ in 0..1000 {
                    let current = clock.now();
                    assert!(current > last, "per-thread monotonicity");
                    last = current;
                }
            }));
        }

        for handle in handles {
            handle.join().expect("thread panicked");
        }
    }

    #[test]
    fn test_roughly_tracks_wall_clock() {
        let clock = SystemClock::new();
        let os_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64;
        let now = clock.now().nanos();
        // Within a second of the OS clock.
        assert!(now.abs_diff(os_nanos) < 1_000_000_000);
    }
}
