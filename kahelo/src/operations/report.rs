use itertools::Itertools;
use std::{iter::once, time::Duration};

/// Counters an operation reports, in display order.
pub trait Report {
	fn entries(&self) -> Vec<(&'static str, u64)>;
}

/// Result of `count`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountSummary {
	pub size: u64,
	pub up_to_date: u64,
	pub expired: u64,
	pub missing: u64,
}

impl Report for CountSummary {
	fn entries(&self) -> Vec<(&'static str, u64)> {
		vec![
			("Tiles in set", self.size),
			("Up to date", self.up_to_date),
			("Expired", self.expired),
			("Missing", self.missing),
		]
	}
}

/// Result of `insert`, `import` and `export`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferSummary {
	pub size: u64,
	pub already_present: u64,
	pub inserted: u64,
	pub missing: u64,
}

impl Report for TransferSummary {
	fn entries(&self) -> Vec<(&'static str, u64)> {
		vec![
			("Tiles in set", self.size),
			("Already present", self.already_present),
			("Inserted", self.inserted),
			("Missing", self.missing),
		]
	}
}

/// Result of `delete`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteSummary {
	pub size: u64,
	pub deleted: u64,
	pub failure: u64,
	pub missing: u64,
}

impl Report for DeleteSummary {
	fn entries(&self) -> Vec<(&'static str, u64)> {
		vec![
			("Tiles in set", self.size),
			("Deleted", self.deleted),
			("Failure", self.failure),
			("Missing", self.missing),
		]
	}
}

/// Result of `view`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewSummary {
	pub size: u64,
	pub displayed: u64,
	pub expired: u64,
	pub missing: u64,
}

impl Report for ViewSummary {
	fn entries(&self) -> Vec<(&'static str, u64)> {
		vec![
			("Tiles in set", self.size),
			("Displayed", self.displayed),
			("Expired", self.expired),
			("Missing", self.missing),
		]
	}
}

/// The report block: a rule, one aligned line per counter and the elapsed time.
pub fn display_report(report: &dyn Report, elapsed: Duration) -> String {
	let counters = report
		.entries()
		.into_iter()
		.map(|(caption, value)| format!("{caption:<16} {:>12}", format_integer(value)));
	once("-".repeat(29))
		.chain(counters)
		.chain(once(format!("{:<16} {:>12}", "Elapsed time", format_duration(elapsed))))
		.join("\n")
}

/// Digits grouped by three with commas.
pub fn format_integer(value: u64) -> String {
	let digits = value.to_string();
	let mut result = String::with_capacity(digits.len() + digits.len() / 3);
	for (index, digit) in digits.chars().enumerate() {
		if index > 0 && (digits.len() - index) % 3 == 0 {
			result.push(',');
		}
		result.push(digit);
	}
	result
}

fn format_duration(duration: Duration) -> String {
	let mut t = duration.as_secs();
	let seconds = t % 60;
	t /= 60;
	let minutes = t % 60;
	let hours = t / 60;
	format!("{hours:02}:{minutes:02}:{seconds:02}")
}
