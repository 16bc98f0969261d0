//! A single deadline shared by the setup phase.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Default budget for discovery plus connect.
pub const DEFAULT_SETUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed point in time after which setup gives up.
///
/// Every step run through the same `Deadline` draws from one budget, so a
/// slow discovery leaves less time to connect.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
	at: Instant,
	budget: Duration,
}

/// The deadline passed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired(pub Duration);

impl Deadline {
	/// Starts the clock now.
	pub fn after(budget: Duration) -> Self {
		Self {
			at: Instant::now() + budget,
			budget,
		}
	}

	/// Time left before expiry, zero once passed.
	pub fn remaining(&self) -> Duration {
		self.at.saturating_duration_since(Instant::now())
	}

	/// Runs `fut`, cancelling it if the deadline passes first.
	pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Expired> {
		tokio::time::timeout_at(self.at, fut).await.map_err(|_| Expired(self.budget))
	}
}

impl Default for Deadline {
	fn default() -> Self {
		Self::after(DEFAULT_SETUP_TIMEOUT)
	}
}
