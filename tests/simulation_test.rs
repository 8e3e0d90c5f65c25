use std::process::Command;

fn run_headless(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_road_sensor_sim"))
        .args(args)
        .env("RUST_LOG", "warn,road_sensor_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--ticks", "200", "--seed", "1"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stdout: {}",
        stdout
    );
    assert!(stdout.contains("Ticks: 200"), "Missing final tick count");
}

/// Test that the summary lists every vehicle kind requested
#[test]
fn test_summary_reports_vehicles() {
    let output = run_headless(&[
        "--ticks", "50", "--seed", "5", "--agents", "2", "--traffic", "4", "--manual",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Vehicles: 3 controlled, 4 traffic"),
        "Unexpected vehicle summary. stdout: {}",
        stdout
    );
    assert!(stdout.contains("(Manual)"), "Missing manual vehicle line");
    assert!(stdout.contains("(Autonomous)"), "Missing autonomous vehicle line");
}

/// Test that invalid parameters fail fast with an error
#[test]
fn test_invalid_parameters_fail() {
    let output = run_headless(&["--ticks", "10", "--rays", "0"]);
    assert!(!output.status.success(), "Zero rays should be rejected");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("at least one ray"),
        "Missing error message. stderr: {}",
        stderr
    );
}

/// Test that lanes narrower than a vehicle are refused
#[test]
fn test_narrow_lanes_fail() {
    let output = run_headless(&["--ticks", "10", "--seed", "1", "--lane-width", "25"]);
    assert!(!output.status.success(), "Narrow lanes should be rejected");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("wide"),
        "Missing error message. stderr: {}",
        stderr
    );

    let output = run_headless(&["--ticks", "10", "--seed", "1", "--lanes", "8"]);
    assert!(
        output.status.success(),
        "Eight lanes at the default lane width should run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
