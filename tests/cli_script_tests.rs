use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn script_command(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("billing_core_cli").unwrap();
    cmd.env("BILLING_CORE_CLI_SCRIPT", "1")
        .env("BILLING_CORE_DATA_DIR", data_dir)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_an_invoice_flow() {
    let dir = tempdir().unwrap();
    let input = "\
invoice new \"Acme Traders\" 2024-03-01
invoice line INV000001 \"Service visits\" 2 500 18
invoice line INV000001 \"Annual fee\" 1 1000 0
invoice line INV000001 \"Spare parts\" 3 100 5
invoice discount INV000001 50
invoice show INV000001
exit
";

    script_command(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Created invoice INV000001"))
        .stdout(contains("2445.00 USD"));
}

#[test]
fn script_mode_resolves_work_periods() {
    let dir = tempdir().unwrap();
    let input = "\
work add lawn-care weekly monday
work period lawn-care 2024-03-20
exit
";

    script_command(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("2024-03-18 .. 2024-03-24"));
}

#[test]
fn script_mode_issues_sequential_vouchers() {
    let dir = tempdir().unwrap();
    let input = "\
sequence define voucher V- --width 4 --suffix /24
sequence next voucher
sequence next voucher
sequence peek voucher
exit
";

    script_command(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("V-0001/24"))
        .stdout(contains("V-0002/24"))
        .stdout(contains("next V-0003/24"));
}

#[test]
fn unknown_commands_suggest_and_keep_the_shell_alive() {
    let dir = tempdir().unwrap();
    let input = "invoce list\nexit\n";

    script_command(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Did you mean `invoice`?"));
}

#[test]
fn validation_errors_are_reported_without_aborting() {
    let dir = tempdir().unwrap();
    let input = "\
work add broken monthly 32
work add fixed monthly 15
exit
";

    script_command(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added recurring work `fixed`"))
        .stderr(contains("outside 1..=31"));
}
