// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Clock abstraction behind the scenario's suspension points.
//!
//! The scenario only ever talks to a [`Clock`], so `--no-sleeps` is a
//! swappable implementation rather than a conditional sprinkled through the
//! step sequence. [`SkipClock`] still advances a virtual elapsed counter, so
//! the transcript shows the simulated timeline deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Time source for the scenario's delays and transcript timestamps.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
	/// Suspends the scenario for the given duration.
	async fn sleep(&self, duration: Duration);

	/// Time elapsed since the clock was created.
	fn elapsed(&self) -> Duration;
}

/// Real clock: delays actually suspend the scenario.
pub struct WallClock {
	started: Instant,
}

impl WallClock {
	/// Starts a wall clock at now.
	pub fn new() -> Self {
		Self {
			started: Instant::now(),
		}
	}
}

impl Default for WallClock {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait::async_trait]
impl Clock for WallClock {
	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}

	fn elapsed(&self) -> Duration {
		self.started.elapsed()
	}
}

/// No-sleep clock: delays resolve immediately but still advance virtual time.
#[derive(Default)]
pub struct SkipClock {
	virtual_elapsed_ms: AtomicU64,
}

impl SkipClock {
	/// Starts a skip clock at zero virtual elapsed time.
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait::async_trait]
impl Clock for SkipClock {
	async fn sleep(&self, duration: Duration) {
		self
			.virtual_elapsed_ms
			.fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
	}

	fn elapsed(&self) -> Duration {
		Duration::from_millis(self.virtual_elapsed_ms.load(Ordering::SeqCst))
	}
}

/// Picks the clock implementation for the run mode.
pub fn select_clock(no_sleeps: bool) -> Arc<dyn Clock> {
	if no_sleeps {
		Arc::new(SkipClock::new())
	} else {
		Arc::new(WallClock::new())
	}
}

/// Formats a relative elapsed time for the transcript, e.g. `+1.96s`.
pub fn format_elapsed(elapsed: Duration) -> String {
	format!("+{:.2}s", elapsed.as_secs_f64())
}
