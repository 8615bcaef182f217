pub mod count;
pub mod delete;
pub mod describe;
pub mod insert;
pub mod serve;
pub mod stat;
pub mod transfer;
pub mod view;

use kahelo::{
	config::Config,
	operations::{Report, RunContext, display_report},
};
use std::time::Instant;

/// Settings of one invocation, shared by the subcommands.
#[derive(Debug)]
pub struct Session {
	config: Config,
	show_progress: bool,
	start: Instant,
}

impl Session {
	pub fn new(config: Config, show_progress: bool) -> Session {
		Session {
			config,
			show_progress,
			start: Instant::now(),
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// A fresh operation context; Ctrl-C stops its tile loops.
	pub fn context(&self) -> RunContext {
		let context = RunContext::new(self.config.clone()).with_progress(self.show_progress);
		context.cancel_on_ctrl_c();
		context
	}

	pub fn print_report(&self, report: &dyn Report) {
		println!("{}", display_report(report, self.start.elapsed()));
	}
}
