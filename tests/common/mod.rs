// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Path of the binary built for this test run
pub fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_recipe-stats")
}

/// Helper function to run recipe-stats with given arguments and input via stdin
pub fn run_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path())
        .args(["-f", "-", "--no-output-file"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start recipe-stats");

    // Write input to stdin; the process may exit before reading it (usage errors)
    if let Some(mut stdin) = cmd.stdin.take() {
        let _ = stdin.write_all(input.as_bytes());
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Helper function to run recipe-stats on a temporary fixture file
pub fn run_with_file(args: &[&str], file_content: &str) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content.as_bytes())
        .expect("Failed to write to temp file");

    let output = Command::new(binary_path())
        .arg("-f")
        .arg(temp_file.path())
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute recipe-stats");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// A single fixture object as it appears in the input array
pub fn fixture_record(postcode: &str, recipe: &str, delivery: &str) -> String {
    format!(
        r#"{{"postcode":"{}","recipe":"{}","delivery":"{}"}}"#,
        postcode, recipe, delivery
    )
}

/// Deterministic fixture array with `n` records drawn from small pools
pub fn generated_fixture(n: usize) -> String {
    const POSTCODES: [&str; 5] = ["10120", "10224", "10208", "10155", "10186"];
    const RECIPES: [&str; 6] = [
        "Mushroom Pie",
        "Creamy Dill Chicken",
        "Speedy Steak Fajitas",
        "Cherry Balsamic Pork Chops",
        "Veggie Burger",
        "Hot Honey Barbecue Potato",
    ];
    const WINDOWS: [&str; 5] = [
        "Wednesday 9AM - 11AM",
        "Thursday 7AM - 5PM",
        "Saturday 10AM - 3PM",
        "Monday 11AM - 4PM",
        "Friday 8AM - 2PM",
    ];

    let items: Vec<String> = (0..n)
        .map(|i| {
            fixture_record(
                POSTCODES[(i * 7) % POSTCODES.len()],
                RECIPES[(i * 5 + i / 3) % RECIPES.len()],
                WINDOWS[(i * 3 + 1) % WINDOWS.len()],
            )
        })
        .collect();
    format!("[\n  {}\n]\n", items.join(",\n  "))
}
