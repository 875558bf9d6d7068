use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn psearch_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("psearch");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        root.join("products.json"),
        r#"[
  {"name": "Red Shoe", "description": "Comfortable", "brand": "Acme", "category": "Footwear", "price": 59.99, "stock_quantity": 3},
  {"name": "Trail Boot", "description": "Waterproof hiking boot", "brand": "Peak", "category": "Footwear", "price": 129.0},
  {"name": "Oxford Shirt", "description": "Slim fit", "brand": "Tailor & Co", "category": "Shirts", "price": 39.5},
  {"description": null}
]"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/products.sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        root.display()
    );

    let config_path = config_dir.join("psearch.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_psearch(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = psearch_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run psearch binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// Init the database and import the fixture catalog.
fn seeded_env() -> (TempDir, PathBuf) {
    let (tmp, config_path) = setup_test_env();
    let (_, stderr, ok) = run_psearch(&config_path, &["init"]);
    assert!(ok, "init failed: {}", stderr);

    let import = tmp.path().join("products.json");
    let (stdout, stderr, ok) = run_psearch(&config_path, &["import", import.to_str().unwrap()]);
    assert!(ok, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("imported products: 4"));
    (tmp, config_path)
}

fn search_json(config_path: &Path, keyword: &str) -> Vec<serde_json::Value> {
    let (stdout, stderr, ok) = run_psearch(config_path, &["search", keyword, "--json"]);
    assert!(ok, "search failed: {}", stderr);
    serde_json::from_str(&stdout).unwrap()
}

fn names(results: &[serde_json::Value]) -> Vec<String> {
    results
        .iter()
        .filter_map(|p| p["name"].as_str().map(String::from))
        .collect()
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_psearch(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_psearch(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_psearch(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_search_brand_case_insensitive() {
    let (_tmp, config_path) = seeded_env();

    assert_eq!(names(&search_json(&config_path, "ACME")), vec!["Red Shoe"]);

    let (stdout, _, ok) = run_psearch(&config_path, &["search", "acme"]);
    assert!(ok);
    assert!(stdout.contains("Red Shoe"));
    assert!(stdout.contains("1 result(s)."));
}

#[test]
fn test_search_shared_category() {
    let (_tmp, config_path) = seeded_env();
    assert_eq!(
        names(&search_json(&config_path, "footwear")),
        vec!["Red Shoe", "Trail Boot"]
    );
}

#[test]
fn test_search_no_results() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, ok) = run_psearch(&config_path, &["search", "shirtless-xyz"]);
    assert!(ok);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_search_empty_keyword_excludes_all_null_product() {
    let (_tmp, config_path) = seeded_env();

    let results = search_json(&config_path, "");
    assert_eq!(results.len(), 3, "got: {:?}", results);
}

#[test]
fn test_search_deterministic() {
    let (_tmp, config_path) = seeded_env();

    let first = search_json(&config_path, "o");
    let second = search_json(&config_path, "o");
    assert_eq!(first, second);
}

#[test]
fn test_search_without_init_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, ok) = run_psearch(&config_path, &["search", "acme"]);
    assert!(!ok, "search on an uninitialized database should fail");
    assert!(stderr.contains("data access failure"), "stderr: {}", stderr);
}

#[test]
fn test_add_get_delete() {
    let (_tmp, config_path) = setup_test_env();
    run_psearch(&config_path, &["init"]);

    let (stdout, stderr, ok) = run_psearch(
        &config_path,
        &[
            "add",
            "--name",
            "Desk Lamp",
            "--brand",
            "Lumen",
            "--category",
            "Lighting",
            "--price",
            "24.5",
            "--release-date",
            "2024-05-01",
        ],
    );
    assert!(ok, "add failed: {}", stderr);
    assert!(stdout.contains("added product 1"));

    let (stdout, _, ok) = run_psearch(&config_path, &["get", "1"]);
    assert!(ok);
    assert!(stdout.contains("Desk Lamp"));
    assert!(stdout.contains("2024-05-01"));

    let (stdout, _, ok) = run_psearch(&config_path, &["delete", "1"]);
    assert!(ok);
    assert!(stdout.contains("deleted product 1"));

    let (_, stderr, ok) = run_psearch(&config_path, &["get", "1"]);
    assert!(!ok);
    assert!(stderr.contains("product not found"));
}

#[test]
fn test_delete_missing_product() {
    let (_tmp, config_path) = setup_test_env();
    run_psearch(&config_path, &["init"]);

    let (_, stderr, ok) = run_psearch(&config_path, &["delete", "99"]);
    assert!(!ok);
    assert!(stderr.contains("product not found"));
}

#[test]
fn test_import_invalid_batch_inserts_nothing() {
    let (tmp, config_path) = setup_test_env();
    run_psearch(&config_path, &["init"]);

    let bad = tmp.path().join("bad.json");
    fs::write(
        &bad,
        r#"[{"name": "Good"}, {"name": "Bad", "price": -1}]"#,
    )
    .unwrap();

    let (_, stderr, ok) = run_psearch(&config_path, &["import", bad.to_str().unwrap()]);
    assert!(!ok);
    assert!(stderr.contains("price"), "stderr: {}", stderr);

    let (stdout, _, ok) = run_psearch(&config_path, &["list"]);
    assert!(ok);
    assert!(stdout.contains("No products."));
}

#[test]
fn test_export_writes_all_products() {
    let (tmp, config_path) = seeded_env();

    let out = tmp.path().join("out/catalog.json");
    let (_, stderr, ok) = run_psearch(&config_path, &["export", "--output", out.to_str().unwrap()]);
    assert!(ok, "export failed: {}", stderr);

    let exported: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported.len(), 4);
    assert_eq!(exported[0]["id"], 1);
    assert_eq!(exported[0]["brand"], "Acme");
}

#[test]
fn test_export_file_imports_as_is() {
    let (tmp, config_path) = seeded_env();

    let out = tmp.path().join("catalog.json");
    let (_, stderr, ok) = run_psearch(&config_path, &["export", "--output", out.to_str().unwrap()]);
    assert!(ok, "export failed: {}", stderr);

    let (stdout, stderr, ok) = run_psearch(&config_path, &["import", out.to_str().unwrap()]);
    assert!(ok, "re-import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("imported products: 4"));

    let acme = search_json(&config_path, "acme");
    let ids: Vec<i64> = acme.iter().filter_map(|p| p["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 5]);
    assert_eq!(names(&acme), vec!["Red Shoe", "Red Shoe"]);
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, ok) = run_psearch(&config_path, &["stats"]);
    assert!(ok);
    assert!(stdout.contains("Products:    4"));
    assert!(stdout.contains("Footwear"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");

    let (_, stderr, ok) = run_psearch(&missing, &["init"]);
    assert!(!ok);
    assert!(stderr.contains("Failed to read config file"));
}
