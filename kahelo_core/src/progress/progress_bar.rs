//! Lightweight terminal progress bar for tile loops.
//!
//! Shows the operation name, a bar, `pos/len`, the percentage, the tile rate and
//! an ETA on stderr. A hidden bar keeps counting without drawing, which is used
//! when per-tile traces are printed or output is quiet.

use std::{
	env,
	fmt::Write as _,
	io::{self, Write},
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	time::{Duration, Instant},
};

struct Inner {
	message: String,
	len: u64,
	pos: u64,
	start: Instant,
	last_draw: Option<Instant>,
	visible: bool,
}

impl Inner {
	fn redraw(&mut self, force: bool) {
		if !self.visible {
			return;
		}
		let now = Instant::now();
		if !force
			&& let Some(last) = self.last_draw
			&& now.duration_since(last) < Duration::from_millis(100)
		{
			return;
		}
		self.last_draw = Some(now);

		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let elapsed = self.start.elapsed().as_secs_f64();
		let per_sec = if elapsed > 0.0 { pos as f64 / elapsed } else { 0.0 };
		let eta_secs = if per_sec > 0.0 { (len - pos) as f64 / per_sec } else { 0.0 };

		let right = format!(
			"▏{}/{} ({:>3}%) {:>7} {:>5}",
			self.pos,
			self.len,
			pos * 100 / len,
			format_rate(per_sec),
			format_eta(Duration::from_secs_f64(eta_secs))
		);
		let taken = self.message.chars().count() + right.chars().count() + 1;
		let width = terminal_width().saturating_sub(taken).max(10);

		let mut line = String::new();
		let _ = write!(&mut line, "{}▕{}{}", self.message, make_bar(pos, len, width), right);

		let mut stderr = io::stderr();
		let _ = write!(stderr, "\r\x1b[2K{line}");
		let _ = stderr.flush();
	}
}

/// A terminal progress bar handle, cloneable and thread-safe.
#[derive(Clone)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	/// Initialize a visible bar with a message and maximum value.
	#[must_use]
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		Self::create(message, max_value, true)
	}

	/// A bar that counts without drawing.
	#[must_use]
	pub fn hidden(message: &str, max_value: u64) -> ProgressBar {
		Self::create(message, max_value, false)
	}

	fn create(message: &str, max_value: u64, visible: bool) -> ProgressBar {
		let progress = ProgressBar {
			inner: Arc::new(Mutex::new(Inner {
				message: message.to_string(),
				len: max_value,
				pos: 0,
				start: Instant::now(),
				last_draw: None,
				visible,
			})),
		};
		progress.lock().redraw(true);
		progress
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Increment by `value`.
	pub fn inc(&self, value: u64) {
		let mut inner = self.lock();
		inner.pos = inner.pos.saturating_add(value).min(inner.len);
		inner.redraw(false);
	}

	/// Current position.
	#[must_use]
	pub fn position(&self) -> u64 {
		self.lock().pos
	}

	/// Finish the bar at its current position and end the line.
	pub fn finish(&self) {
		let mut inner = self.lock();
		inner.redraw(true);
		if inner.visible {
			let _ = io::stderr().write_all(b"\n");
			let _ = io::stderr().flush();
		}
	}
}

// prefer $COLUMNS, fall back to 80
fn terminal_width() -> usize {
	if let Ok(cols) = env::var("COLUMNS")
		&& let Ok(v) = cols.parse::<usize>()
	{
		return v.max(10);
	}
	80
}

fn make_bar(pos: u64, len: u64, width: usize) -> String {
	let frac = (pos as f64 / len.max(1) as f64).clamp(0.0, 1.0);
	let exact = frac * width as f64;
	let whole = (exact.floor() as usize).min(width);
	let partials = [" ", "▏", "▎", "▍", "▌", "▋", "▊", "▉"];

	let mut s = "█".repeat(whole);
	if whole < width {
		let idx = ((exact - whole as f64) * 8.0).floor() as usize;
		s.push_str(partials[idx.min(7)]);
		s.push_str(&" ".repeat(width - whole - 1));
	}
	s
}

fn format_rate(per_sec: f64) -> String {
	if per_sec >= 1_000.0 {
		format!("{:.1}k/s", per_sec / 1_000.0)
	} else {
		format!("{per_sec:.0}/s")
	}
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
	if h > 0 {
		format!("{h:02}:{m:02}:{s:02}")
	} else {
		format!("{m:02}:{s:02}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_and_clamps() {
		let progress = ProgressBar::hidden("Test", 10);
		progress.inc(4);
		assert_eq!(progress.position(), 4);
		progress.inc(20);
		assert_eq!(progress.position(), 10);
		progress.finish();
	}

	#[test]
	fn visible_bar_does_not_panic() {
		let progress = ProgressBar::new("Visible", 0);
		progress.inc(1);
		progress.finish();
	}

	#[test]
	fn bar_has_requested_width() {
		assert_eq!(make_bar(0, 10, 20).chars().count(), 20);
		assert_eq!(make_bar(5, 10, 20).chars().count(), 20);
		assert_eq!(make_bar(10, 10, 20), "█".repeat(20));
	}

	#[test]
	fn formatting() {
		assert_eq!(format_rate(12.4), "12/s");
		assert_eq!(format_rate(2500.0), "2.5k/s");
		assert_eq!(format_eta(Duration::from_secs(75)), "01:15");
		assert_eq!(format_eta(Duration::from_secs(3725)), "01:02:05");
	}
}
