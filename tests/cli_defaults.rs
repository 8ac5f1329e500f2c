use assert_cmd::prelude::*;
use color_eyre::Result;
use std::process::Command;

/// Build a command with a clean SIROCCO_* environment so no node is
/// configured and nothing touches the network.
fn sirocco() -> Result<Command> {
    let mut cmd = Command::cargo_bin("sirocco")?;
    for id in 1..=5 {
        cmd.env_remove(format!("SIROCCO_NODE{id}_HOST"));
    }
    cmd.env_remove("SIROCCO_BMC_USERNAME");
    cmd.env_remove("SIROCCO_BMC_PASSWORD");
    cmd.env_remove("SIROCCO_FAN_COUNT");
    cmd.env_remove("SIROCCO_TLS_VERIFY");
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_default_invocation_uses_all_nodes_and_completes() -> Result<()> {
    let output = sirocco()?.output().expect("Failed to execute sirocco");

    assert!(
        output.status.success(),
        "sirocco failed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: sirocco"), "Missing usage hint");
    assert!(
        stdout.contains("Setting fan rate to 20% for nodes: [1, 2, 3, 4, 5]"),
        "Missing default node/rate line. Stdout: {stdout}"
    );
    assert!(
        stdout.contains("All fan control operations completed"),
        "Missing completion line"
    );

    // With no hosts configured every node is skipped with a message
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found in configuration"),
        "Missing skip messages. Stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn test_out_of_range_node_is_skipped() -> Result<()> {
    let output = sirocco()?
        .args(["9", "30"])
        .output()
        .expect("Failed to execute sirocco");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Setting fan rate to 30% for nodes: []"),
        "Out-of-range id should leave no targets. Stdout: {stdout}"
    );
    assert!(stdout.contains("All fan control operations completed"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("out of range"),
        "Missing out-of-range warning. Stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn test_invalid_rate_falls_back_to_default() -> Result<()> {
    let output = sirocco()?
        .args(["2-4", "fast"])
        .output()
        .expect("Failed to execute sirocco");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Setting fan rate to 20% for nodes: [2, 3, 4]"),
        "Invalid rate should keep the default. Stdout: {stdout}"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid rate parameter"),
        "Missing rate warning. Stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn test_invalid_node_spec_falls_back_to_all_nodes() -> Result<()> {
    let output = sirocco()?
        .args(["first-three"])
        .output()
        .expect("Failed to execute sirocco");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("for nodes: [1, 2, 3, 4, 5]"),
        "Malformed spec should fall back to all nodes. Stdout: {stdout}"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid node specification"),
        "Missing node spec warning. Stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn test_unknown_mode_is_rejected_by_the_parser() -> Result<()> {
    let output = sirocco()?
        .args(["--mode", "sideways"])
        .output()
        .expect("Failed to execute sirocco");

    // Argument errors are the one non-zero path
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("sideways"),
        "Error should name the bad value. Stderr: {stderr}"
    );
    Ok(())
}
