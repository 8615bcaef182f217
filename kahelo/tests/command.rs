mod test_utilities;
use assert_cmd::{Command, cargo};
use predicates::str;
use rstest::rstest;
use test_utilities::*;

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	let mut cmd = Command::new(cargo::cargo_bin!());
	cmd.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("count", "[OPTIONS] <STORE>")]
#[case("describe", "[OPTIONS] <STORE>")]
#[case("export", "[OPTIONS]")]
#[case("import", "[OPTIONS]")]
#[case("serve", "[OPTIONS] <STORE>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	Command::new(cargo::cargo_bin!())
		.args(sub_command.split(" "))
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
	Ok(())
}

#[rstest]
#[case::missing_selector(&["count", "x.db", "--zoom", "3"], "source is missing")]
#[case::missing_properties(&["count", "x.db", "--records"], "is not declared")]
#[case::bad_zoom(&["count", "x.db", "--records", "--zoom", "3-25"], "zoom")]
#[case::bad_rectangle(&["count", "x.db", "--tiles", "1,2,3", "--zoom", "3"], "incorrect tile rectangle")]
fn configuration_errors(#[case] args: &[&str], #[case] message: &str) {
	let (dir, _) = get_temp_output("unused");
	kahelo_cmd(dir.path())
		.args(args)
		.assert()
		.failure()
		.stderr(str::contains(message));
}

#[test]
fn invalid_config_file() {
	let (dir, config) = get_temp_output("kahelo.yml");
	std::fs::write(&config, "database:\n  commit_period: 0\n").unwrap();
	kahelo_cmd(dir.path())
		.args(["count", "x.db", "--records"])
		.assert()
		.failure()
		.stderr(str::contains("commit_period"));
}
