use std::process::Command;

fn snack_attack() -> Command {
    Command::new(env!("CARGO_BIN_EXE_snack-attack"))
}

#[test]
fn validate_accepts_the_demo_maze() {
    let output = snack_attack()
        .arg("validate")
        .output()
        .expect("failed to run snack-attack validate");

    assert!(output.status.success(), "validate should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("canvas 128x96 brush 6 spacing 2"), "{stdout}");
    assert!(stdout.contains("layout ok"), "{stdout}");
    assert!(!stdout.contains("refused"), "{stdout}");
}

#[test]
fn simulate_prints_a_summary() {
    let output = snack_attack()
        .args(["simulate", "--ticks", "120", "--seed", "5"])
        .output()
        .expect("failed to run snack-attack simulate");

    assert!(output.status.success(), "simulate should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ticks:          120"), "{stdout}");
    assert!(stdout.contains("enemies left:"), "{stdout}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = snack_attack()
        .args(["--config", "does-not-exist.toml", "validate"])
        .output()
        .expect("failed to run snack-attack");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read settings"), "{stderr}");
}
