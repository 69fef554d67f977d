use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Pull the number after `label` out of the logged statistics
fn logged_count(stderr: &str, label: &str) -> u32 {
    let line = stderr
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("Could not find '{}' line", label));

    // Handle log format with timestamp
    let parts: Vec<&str> = line.split(label).collect();
    parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| panic!("Could not parse count from line: {}", line))
}

/// Test that the simulation runs headless without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_sim(&["--ticks", "600", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Final State ==="));
    assert!(stdout.contains("Queued N/S:"));
}

/// Test that statistics are logged and vehicles are spawned
#[test]
fn test_simulation_statistics_logged() {
    let output = run_sim(&["--ticks", "1800", "--seed", "3", "--mode", "fixed"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Active vehicles:"));
    assert!(stderr.contains("Final green duration: 10s"));

    let spawned = logged_count(&stderr, "Total vehicles spawned:");
    assert!(spawned > 0, "No vehicles were spawned during simulation");
}

/// Test that emergency vehicles are injected on request
#[test]
fn test_emergency_injection() {
    let output = run_sim(&[
        "--ticks",
        "1200",
        "--seed",
        "5",
        "--emergency-every",
        "5",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let injected = logged_count(&stderr, "Emergency vehicles injected:");
    assert!(injected >= 3, "Expected several emergencies, got {}", injected);
    assert!(stderr.contains("Emergency preemption"));
}

/// Test that a bad time step is rejected
#[test]
fn test_invalid_delta_rejected() {
    let output = run_sim(&["--ticks", "10", "--delta", "0"]);
    assert!(!output.status.success());
}
