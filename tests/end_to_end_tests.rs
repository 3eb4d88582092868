// End-to-end tests driving the significar binary over real CSV tables

use predicates::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_table(dir: &Path, filename: &str, systems: &[&str], columns: &[Vec<f64>]) {
    let mut text = String::from("topic");
    for system in systems {
        text.push(',');
        text.push_str(system);
    }
    text.push('\n');
    let items = columns[0].len();
    for row in 0..items {
        text.push_str(&format!("q{}", row + 1));
        for column in columns {
            text.push_str(&format!(",{}", column[row]));
        }
        text.push('\n');
    }
    fs::write(dir.join(filename), text).unwrap();
}

fn write_default_tables(dir: &Path) {
    let a = vec![0.50, 0.42, 0.47, 0.39, 0.44, 0.41];
    let b = vec![0.62, 0.57, 0.55, 0.54, 0.53, 0.56];
    for filename in [
        "ndcg_10_table.csv",
        "average_precision_table.csv",
        "mean_reciprocal_rank_table.csv",
    ] {
        write_table(dir, filename, &["bm25", "dense"], &[a.clone(), b.clone()]);
    }
}

#[test]
fn test_full_batch_produces_all_outputs() {
    let tmp_dir = TempDir::new().unwrap();
    write_default_tables(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o").arg(tmp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Performing significance testing for NDCG@10...",
        ))
        .stdout(predicate::str::contains(
            "Performing significance testing for MAP...",
        ))
        .stdout(predicate::str::contains(
            "Performing significance testing for MRR...",
        ))
        .stdout(predicate::str::contains("SIGNIFICANCE TESTING SUMMARY"));

    for filename in [
        "significance_test_ndcg@10.csv",
        "significance_test_map.csv",
        "significance_test_mrr.csv",
        "significance_ndcg@10_boxplot.html",
        "significance_map_boxplot.html",
        "significance_mrr_boxplot.html",
        "significance_test_summary.csv",
    ] {
        assert!(
            tmp_dir.path().join(filename).exists(),
            "missing output {filename}"
        );
    }

    let summary = fs::read_to_string(tmp_dir.path().join("significance_test_summary.csv")).unwrap();
    assert!(summary.contains("# NDCG@10"));
    assert!(summary.contains("# MAP"));
    assert!(summary.contains("# MRR"));
}

#[test]
fn test_three_system_scenario() {
    // run_b is systematically higher than run_a on every topic; run_c
    // permutes run_a's scores (same mean, per-topic noise). Dyadic scores
    // keep the constant offset exact through the CSV round trip.
    let tmp_dir = TempDir::new().unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let a: Vec<f64> = (0..10)
        .map(|_| 0.25 + rng.gen_range(0..32) as f64 / 128.0)
        .collect();
    let b: Vec<f64> = a.iter().map(|x| x + 0.125).collect();
    let mut c = a.clone();
    for pair in c.chunks_mut(2) {
        pair.reverse();
    }

    write_table(
        tmp_dir.path(),
        "ndcg_10_table.csv",
        &["run_a", "run_b", "run_c"],
        &[a, b, c],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o")
        .arg(tmp_dir.path())
        .arg("-m")
        .arg("NDCG@10=ndcg_10");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run_a vs run_b"))
        .stdout(predicate::str::contains("run_a vs run_c").not());

    // The exact offset hits the documented zero-variance policy
    let results =
        fs::read_to_string(tmp_dir.path().join("significance_test_ndcg@10.csv")).unwrap();
    assert!(results.contains("run_a,run_b,-inf,0,true"));
}

#[test]
fn test_results_file_round_trips() {
    let tmp_dir = TempDir::new().unwrap();
    write_default_tables(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o")
        .arg(tmp_dir.path())
        .arg("-m")
        .arg("NDCG@10=ndcg_10");
    cmd.assert().success();

    let text = fs::read_to_string(tmp_dir.path().join("significance_test_ndcg@10.csv")).unwrap();
    let parsed = significar::csv_output::parse_results(&text).unwrap();
    assert!(parsed.has_significance);
    assert_eq!(parsed.rows.len(), 1);

    // Recompute from the same table and compare tuples exactly
    let table = significar::table::MetricTable::from_csv_path(
        &tmp_dir.path().join("ndcg_10_table.csv"),
    )
    .unwrap();
    let recomputed = significar::significance::analyze(
        &table,
        &significar::significance::SignificanceConfig::default(),
    )
    .unwrap();
    let row = &parsed.rows[0];
    let expected = &recomputed.results[0];
    assert_eq!(row.system_a, expected.system_a);
    assert_eq!(row.system_b, expected.system_b);
    assert_eq!(row.statistic, expected.statistic);
    assert_eq!(row.pvalue, expected.pvalue);
    assert_eq!(row.significant, Some(expected.significant));
}

#[test]
fn test_missing_input_reports_file_and_exits_gracefully() {
    let tmp_dir = TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o").arg(tmp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: Could not find required data files.",
        ))
        .stdout(predicate::str::contains("Missing file:"))
        .stdout(predicate::str::contains("ndcg_10_table.csv"));

    assert!(!tmp_dir.path().join("significance_test_summary.csv").exists());
}

#[test]
fn test_any_missing_table_halts_before_analysis() {
    // Only the first two tables exist; the batch must not write anything.
    let tmp_dir = TempDir::new().unwrap();
    let a = vec![0.5, 0.4, 0.45];
    let b = vec![0.6, 0.5, 0.55];
    write_table(
        tmp_dir.path(),
        "ndcg_10_table.csv",
        &["bm25", "dense"],
        &[a.clone(), b.clone()],
    );
    write_table(
        tmp_dir.path(),
        "average_precision_table.csv",
        &["bm25", "dense"],
        &[a, b],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o").arg(tmp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mean_reciprocal_rank_table.csv"));

    assert!(!tmp_dir.path().join("significance_test_ndcg@10.csv").exists());
}

#[test]
fn test_malformed_table_skips_metric_and_continues() {
    let tmp_dir = TempDir::new().unwrap();
    write_default_tables(tmp_dir.path());
    fs::write(
        tmp_dir.path().join("ndcg_10_table.csv"),
        "topic,bm25,dense\nq1,0.5,n/a\nq2,0.4,0.6\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o").arg(tmp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NDCG@10:\n  Analysis failed:"))
        .stdout(predicate::str::contains("non-numeric score"));

    assert!(!tmp_dir.path().join("significance_test_ndcg@10.csv").exists());
    let summary = fs::read_to_string(tmp_dir.path().join("significance_test_summary.csv")).unwrap();
    assert!(!summary.contains("# NDCG@10"));
    assert!(summary.contains("# MAP"));
    assert!(summary.contains("# MRR"));
}

#[test]
fn test_single_system_metric_reports_no_results() {
    let tmp_dir = TempDir::new().unwrap();
    write_table(
        tmp_dir.path(),
        "precision_5_table.csv",
        &["bm25"],
        &[vec![0.5, 0.4, 0.45]],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o")
        .arg(tmp_dir.path())
        .arg("-m")
        .arg("P@5=precision_5");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No results available for this metric."));

    let results = fs::read_to_string(tmp_dir.path().join("significance_test_p@5.csv")).unwrap();
    assert_eq!(results, "System 1,System 2,t-statistic,p-value,Significant\n");
}

#[test]
fn test_custom_metric_set_replaces_defaults() {
    let tmp_dir = TempDir::new().unwrap();
    write_table(
        tmp_dir.path(),
        "precision_5_table.csv",
        &["bm25", "dense"],
        &[vec![0.5, 0.4, 0.45, 0.42], vec![0.6, 0.5, 0.55, 0.52]],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o")
        .arg(tmp_dir.path())
        .arg("-m")
        .arg("P@5=precision_5");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Performing significance testing for P@5...",
        ))
        .stdout(predicate::str::contains("NDCG@10").not());
}

#[test]
fn test_json_digest_is_parseable() {
    let tmp_dir = TempDir::new().unwrap();
    write_default_tables(tmp_dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-o").arg(tmp_dir.path()).arg("--format").arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let json_start = stdout.find('{').expect("no JSON object in stdout");
    let value: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();

    assert_eq!(value["alpha"], 0.05);
    assert_eq!(value["metrics"].as_array().unwrap().len(), 3);
    assert_eq!(value["metrics"][0]["metric"], "NDCG@10");
    assert_eq!(value["metrics"][0]["pairs"], 1);
}

#[test]
fn test_invalid_alpha_is_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("--alpha").arg("1.5");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for --alpha"));
}

#[test]
fn test_invalid_metric_argument_is_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("significar");
    cmd.arg("-m").arg("NDCG10");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for --metric"));
}
