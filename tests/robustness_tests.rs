use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

const P1: &str = "33333333-3333-4333-8333-333333333333";

#[test]
fn test_malformed_csv_handling() {
    let output_path = std::path::PathBuf::from("robustness_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["command", "subject", "code", "value"])
        .unwrap();

    // Valid creation
    wtr.write_record(["create-payment", P1, "", "10.0"]).unwrap();
    // Unknown command
    wtr.write_record(["launch-rocket", P1, "", ""]).unwrap();
    // Valid update
    wtr.write_record(["update-payment", P1, "", "completed"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("ride-lifecycle"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stdout(predicate::str::contains(format!(
            "3,update-payment,{},ok,pending -> completed",
            P1
        )));

    std::fs::remove_file(output_path).ok();
}

#[test]
fn test_invalid_field_values() {
    let file = common::commands_file(&[
        "create-payment, not-a-uuid, , 10.0",
        &format!("create-payment, {}, , -4", P1),
        &format!("create-payment, {}, , ten", P1),
        &format!("create-payment, {}, , 5.0", P1),
        &format!("update-payment, {}, , settled", P1),
        "register, not-an-email, , pw",
        "register, rider@example.com, , ",
        "verify-account, rider@example.com, , ",
        "advance, , , yesterday",
    ]);

    let mut cmd = Command::new(cargo_bin!("ride-lifecycle"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,create-payment,not-a-uuid,rejected,Validation error: Invalid payment id",
        ))
        .stdout(predicate::str::contains(format!(
            "2,create-payment,{},rejected,Validation error: Amount must be positive",
            P1
        )))
        .stdout(predicate::str::contains(format!(
            "3,create-payment,{},rejected,Validation error: Invalid amount",
            P1
        )))
        .stdout(predicate::str::contains(format!(
            "4,create-payment,{},ok,pending",
            P1
        )))
        .stdout(predicate::str::contains(format!(
            "5,update-payment,{},rejected,Validation error: Unknown payment status",
            P1
        )))
        .stdout(predicate::str::contains(
            "6,register,not-an-email,rejected,Validation error: Invalid email address",
        ))
        .stdout(predicate::str::contains(
            "7,register,rider@example.com,rejected,Validation error: register requires a value (password)",
        ))
        .stdout(predicate::str::contains(
            "8,verify-account,rider@example.com,rejected,Validation error: verify-account requires a code",
        ))
        .stdout(predicate::str::contains(
            "9,advance,,rejected,Validation error: Invalid number of seconds",
        ));
}

#[test]
fn test_unknown_payment_rejected() {
    let file = common::commands_file(&[
        &format!("update-payment, {}, , processing", P1),
        &format!("delete-payment, {}, , ", P1),
    ]);

    let mut cmd = Command::new(cargo_bin!("ride-lifecycle"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "1,update-payment,{},rejected,payment not found: {}",
            P1, P1
        )))
        .stdout(predicate::str::contains(format!(
            "2,delete-payment,{},rejected,payment not found: {}",
            P1, P1
        )));
}

#[test]
fn test_oversized_advance_does_not_abort_replay() {
    let file = common::commands_file(&[
        "advance, , , 9223372036854775807",
        "advance, , , 9000000000000000",
        &format!("create-payment, {}, , 3.0", P1),
    ]);

    let mut cmd = Command::new(cargo_bin!("ride-lifecycle"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,advance,,rejected,Validation error: Number of seconds out of range",
        ))
        .stdout(predicate::str::contains(
            "2,advance,,rejected,Validation error: Cannot advance the clock",
        ))
        .stdout(predicate::str::contains(format!(
            "3,create-payment,{},ok,pending",
            P1
        )));
}
