use std::path::Path;

use rosterqa_runner::{Config, Pipeline, RunOutcome, STATE_COUNTS_CHART};

const HEADER: &str = "Agent Id,Agency Phone Number,Agent Phone Number,Agency State,Agent State,\
Agent License State (active),Agent Email Address,Agent First Name,Agent Middle Name,\
Agent Last Name,Agent Writing Contract Start Date,Date when an agent became A2O";

fn valid_row(id: usize, state: &str) -> String {
    format!(
        "A{id},804.984.4561,804-984-4561,{state},{state},\"{state},DC\",agent{id}@example.com,\
first,,last{id},2020-01-15,2020-02-15"
    )
}

fn write_roster(dir: &Path, name: &str, rows: &[String]) {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    std::fs::write(dir.join(name), body).unwrap();
}

fn config_in(root: &Path) -> Config {
    let data_dir = root.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    let mut cfg = Config::default_for(data_dir.to_str().unwrap());
    cfg.report.out_dir = root.join("reports").to_str().unwrap().to_string();
    cfg.report.charts_dir = root.join("charts").to_str().unwrap().to_string();
    cfg.marker.path = root.join("processed.lst").to_str().unwrap().to_string();
    cfg
}

#[test]
fn clean_pair_reports_success_with_zero_findings() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    let data = cfg.data_dir();

    let old: Vec<String> = (0..5).map(|i| valid_row(i, "VA")).collect();
    let new: Vec<String> = (0..7).map(|i| valid_row(i, "NY")).collect();
    write_roster(&data, "roster_20210101.csv", &old);
    write_roster(&data, "roster_20210201.csv", &new);

    let report = Pipeline::new(cfg.clone()).run().unwrap();
    assert_eq!(report.outcome, RunOutcome::Success);
    assert_eq!(report.finding_count(), 0);
    assert_eq!(report.current_file.as_deref(), Some("roster_20210201.csv"));
    assert_eq!(report.previous_file.as_deref(), Some("roster_20210101.csv"));
    assert_eq!(report.row_count, Some(7));

    // Chart data and the report land on disk under known names.
    let chart_data = cfg.charts_dir().join(STATE_COUNTS_CHART).with_extension("csv");
    assert!(chart_data.exists());
    let report_dir = cfg.out_dir().join(report.run_id.as_str());
    assert!(report_dir.join("report.json").exists());
    assert!(report_dir.join("report.txt").exists());
}

#[test]
fn one_bad_state_fails_run_but_all_rules_still_complete() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    let data = cfg.data_dir();

    let old: Vec<String> = (0..3).map(|i| valid_row(i, "VA")).collect();
    let mut new: Vec<String> = (0..3).map(|i| valid_row(i, "VA")).collect();
    new.push(valid_row(99, "ZZ"));
    write_roster(&data, "roster_20210101.csv", &old);
    write_roster(&data, "roster_20210201.csv", &new);

    let report = Pipeline::new(cfg.clone()).run().unwrap();
    assert!(!report.outcome.is_success());
    // Exactly one diagnostic, from the jurisdiction rule, naming the record.
    assert_eq!(report.finding_count(), 1);
    assert_eq!(report.findings[0].rule_id, "jurisdiction_code");
    assert_eq!(report.findings[0].agent_id.as_deref(), Some("A99"));
    // No charts on a failed run.
    assert!(report.charts.is_empty());
    assert!(!cfg.charts_dir().join(STATE_COUNTS_CHART).with_extension("csv").exists());
}

#[test]
fn drift_beyond_tolerance_escalates_before_validation() {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = config_in(root.path());
    cfg.drift.tolerance = 2;
    let data = cfg.data_dir();

    let old: Vec<String> = (0..1).map(|i| valid_row(i, "VA")).collect();
    let new: Vec<String> = (0..9).map(|i| valid_row(i, "VA")).collect();
    write_roster(&data, "roster_20210101.csv", &old);
    write_roster(&data, "roster_20210201.csv", &new);

    let report = Pipeline::new(cfg.clone()).run().unwrap();
    match &report.outcome {
        RunOutcome::Failure { reason } => assert!(reason.contains("drift")),
        RunOutcome::Success => panic!("expected escalation"),
    }
    assert_eq!(report.finding_count(), 0);
    // The failure report is still delivered exactly once.
    assert!(cfg.out_dir().join(report.run_id.as_str()).join("report.txt").exists());
}

#[test]
fn single_snapshot_escalates_no_candidate() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    write_roster(&cfg.data_dir(), "roster_20210101.csv", &[valid_row(0, "VA")]);

    let report = Pipeline::new(cfg).run().unwrap();
    match &report.outcome {
        RunOutcome::Failure { reason } => assert!(reason.contains("previous")),
        RunOutcome::Success => panic!("expected escalation"),
    }
}

#[test]
fn marker_refuses_a_second_run_on_the_same_file() {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = config_in(root.path());
    cfg.marker.enabled = true;
    let data = cfg.data_dir();

    write_roster(&data, "roster_20210101.csv", &[valid_row(0, "VA")]);
    write_roster(&data, "roster_20210201.csv", &[valid_row(1, "VA")]);

    let first = Pipeline::new(cfg.clone()).run().unwrap();
    assert_eq!(first.outcome, RunOutcome::Success);

    let second = Pipeline::new(cfg).run().unwrap();
    match &second.outcome {
        RunOutcome::Failure { reason } => assert!(reason.contains("already processed")),
        RunOutcome::Success => panic!("expected marker refusal"),
    }
}

#[test]
fn failed_run_leaves_file_unmarked_for_retry() {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = config_in(root.path());
    cfg.marker.enabled = true;
    cfg.drift.tolerance = 1;
    let data = cfg.data_dir();

    write_roster(&data, "roster_20210101.csv", &[valid_row(0, "VA")]);
    let big: Vec<String> = (0..9).map(|i| valid_row(i, "VA")).collect();
    write_roster(&data, "roster_20210201.csv", &big);

    let first = Pipeline::new(cfg.clone()).run().unwrap();
    assert!(!first.outcome.is_success());

    // Fix the data and retry: the failed run must not have marked the file.
    let fixed: Vec<String> = (0..2).map(|i| valid_row(i, "VA")).collect();
    write_roster(&data, "roster_20210201.csv", &fixed);
    let second = Pipeline::new(cfg).run().unwrap();
    assert_eq!(second.outcome, RunOutcome::Success);
}

#[test]
fn monthly_convention_selects_by_period() {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = config_in(root.path());
    cfg.input.convention = rosterqa_runner::Convention::Monthly;
    let data = cfg.data_dir();

    // Lexicographic trailing-token order would pick the wrong file here.
    write_roster(&data, "roster_december_2020.csv", &[valid_row(0, "VA")]);
    write_roster(&data, "roster_march_2021.csv", &[valid_row(1, "VA")]);

    let report = Pipeline::new(cfg).run().unwrap();
    assert_eq!(report.current_file.as_deref(), Some("roster_march_2021.csv"));
    assert_eq!(report.previous_file.as_deref(), Some("roster_december_2020.csv"));
    assert_eq!(report.outcome, RunOutcome::Success);
}
