use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run gramfacet with arguments and CSV input
fn run_gramfacet(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gramfacet"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    // Write CSV to stdin
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).expect("Output is not a decodable PNG");
    (img.width(), img.height())
}

#[test]
fn test_end_to_end_scatter_plot() {
    let csv = fs::read_to_string("test/iris.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(&["-x", "sepal_length", "-y", "sepal_width"], &csv);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png_bytes = result.unwrap();
    assert!(is_valid_png(&png_bytes), "Output is not a valid PNG");
    assert_eq!(png_size(&png_bytes), (800, 600));
}

#[test]
fn test_end_to_end_custom_size() {
    let csv = fs::read_to_string("test/iris.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(
        &["-x", "0", "-y", "1", "--width", "320", "--height", "200"],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert_eq!(png_size(&result.unwrap()), (320, 200));
}

#[test]
fn test_end_to_end_categorical_color_and_shape() {
    let csv = fs::read_to_string("test/iris.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(
        &[
            "-x",
            "petal_length",
            "-y",
            "petal_width",
            "--color",
            "species",
            "--shape",
            "species",
            "--size",
            "sepal_width",
        ],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_facet_grid() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(
        &[
            "-x",
            "month",
            "-y",
            "revenue",
            "--facet-col",
            "region",
            "--facet-row",
            "product",
            "--color",
            "units",
            "--line",
            "-t",
            "Revenue by region",
        ],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_free_scales() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(
        &[
            "-x", "month", "-y", "units", "--facet-col", "region", "--free-x", "--free-y",
        ],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_numeric_facet_is_partitioned() {
    let mut csv = String::from("x,y,w\n");
    for i in 0..20 {
        csv.push_str(&format!("{},{},{}\n", i, i * i, i));
    }
    let result = run_gramfacet(&["-x", "x", "-y", "y", "--facet-col", "w"], &csv);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_log_axis() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_gramfacet(&["-x", "units", "-y", "revenue", "--log-x", "--log-y"], &csv);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_log_axis_with_zero() {
    let csv = "x,y\n0,1\n10,2\n";
    let result = run_gramfacet(&["-x", "x", "-y", "y", "--log-x"], csv);
    let err = result.unwrap_err();
    assert!(err.contains("logarithmic"), "Unexpected error: {}", err);
}

#[test]
fn test_end_to_end_single_row_warns() {
    let csv = "x,y\n3,3\n";
    let mut child = Command::new(env!("CARGO_BIN_EXE_gramfacet"))
        .args(["-x", "x", "-y", "y", "--facet-col", "x", "--free-x"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn process");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(csv.as_bytes())
        .expect("Failed to write to stdin");
    let output = child.wait_with_output().expect("Failed to wait for process");

    assert!(output.status.success());
    assert!(is_valid_png(&output.stdout));
    // A single point has a zero-width X range.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning"), "stderr: {}", stderr);
}

#[test]
fn test_end_to_end_column_not_found() {
    let csv = "x,y\n1,2\n";
    let result = run_gramfacet(&["-x", "x", "-y", "nonexistent"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("not found"));
}

#[test]
fn test_end_to_end_empty_csv() {
    let csv = "x,y\n";
    let result = run_gramfacet(&["-x", "x", "-y", "y"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("at least one data row"));
}

#[test]
fn test_end_to_end_non_numeric_data() {
    let csv = "x,y\n1,2\nabc,3\n";
    let result = run_gramfacet(&["-x", "x", "-y", "y"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to parse"));
}

#[test]
fn test_end_to_end_missing_arguments() {
    let result = run_gramfacet(&["-x", "x"], "x,y\n1,2\n");
    assert!(result.is_err());
}
