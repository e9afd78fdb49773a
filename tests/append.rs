mod common;

use assert_cmd::Command;
use predicates::str::contains;

use common::TestWorkspace;
use wage_clean::canonical::EXPECTED_COLUMNS;

fn wage_clean() -> Command {
    Command::cargo_bin("wage-clean").expect("binary exists")
}

fn canonical_header() -> String {
    EXPECTED_COLUMNS
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn cleaned_row(year: &str) -> String {
    let mut cells = vec![String::new(); EXPECTED_COLUMNS.len()];
    cells[0] = year.to_string();
    cells[1] = "Rīga".to_string();
    cells[2] = "0000001".to_string();
    cells[21] = "Medium".to_string();
    cells.join(",")
}

#[test]
fn appends_cleaned_files_to_master_in_order() {
    let ws = TestWorkspace::new();
    let first = ws.write(
        "first.csv",
        &format!("{}\n{}\n", canonical_header(), cleaned_row("2021")),
    );
    let second = ws.write(
        "second.csv",
        &format!("{}\n{}\n", canonical_header(), cleaned_row("2022")),
    );
    let master = ws.path().join("master.csv");

    wage_clean()
        .args([
            "append",
            "-i",
            first.to_str().unwrap(),
            "-i",
            second.to_str().unwrap(),
            "-m",
            master.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = ws.read("master.csv");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], canonical_header());
    assert!(lines[1].starts_with("2021,Rīga,0000001"));
    assert!(lines[2].starts_with("2022,Rīga,0000001"));
}

#[test]
fn appending_twice_writes_the_header_once() {
    let ws = TestWorkspace::new();
    let input = ws.write(
        "cleaned.csv",
        &format!("{}\n{}\n", canonical_header(), cleaned_row("2022")),
    );
    let master = ws.path().join("master.csv");

    for _ in 0..2 {
        wage_clean()
            .args([
                "append",
                "-i",
                input.to_str().unwrap(),
                "-m",
                master.to_str().unwrap(),
            ])
            .assert()
            .success();
    }

    let contents = ws.read("master.csv");
    let header_count = contents
        .lines()
        .filter(|line| *line == canonical_header())
        .count();
    assert_eq!(header_count, 1);
    // Append semantics only: the duplicate row is kept.
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn missing_canonical_columns_abort_the_append() {
    let ws = TestWorkspace::new();
    let partial = ws.write(
        "partial.csv",
        "Report_Year,City_Municipality\n2022,Rīga\n",
    );
    let master = ws.path().join("master.csv");

    wage_clean()
        .args([
            "append",
            "-i",
            partial.to_str().unwrap(),
            "-m",
            master.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Missing columns for insert"))
        .stderr(contains("Administrative_Code_ATVK"));

    assert!(!master.exists());
}

#[test]
fn clean_append_to_uses_the_master_files_delimiter() {
    let source_variants = [
        "Gads",
        "Pilsēta, novads",
        "ATVK kods",
        "Oblig. kopā, skaits",
        "Oblig. kopā, alga",
        "Oblig. siev., skaits",
        "Oblig. siev., alga",
        "Oblig. vīr., skaits",
        "Oblig. vīr., alga",
        "Darba ņēm. kopā, skaits",
        "Darba ņēm. kopā, alga",
        "Darba ņēm. siev., skaits",
        "Darba ņēm. siev., alga",
        "Darba ņēm. vīr., skaits",
        "Darba ņēm. vīr., alga",
        "Pašnodarb. kopā, skaits",
        "Pašnodarb. kopā, alga",
        "Pašnodarb. siev., skaits",
        "Pašnodarb. siev., alga",
        "Pašnodarb. vīr., skaits",
        "Pašnodarb. vīr., alga",
    ];
    let mut values = vec!["2022", "Rīga", "1000011"];
    values.extend(std::iter::repeat("100").take(source_variants.len() - 3));

    let ws = TestWorkspace::new();
    let input = ws.write(
        "wages.tsv",
        &format!("{}\n{}\n", source_variants.join("\t"), values.join("\t")),
    );
    let master = ws.path().join("master.csv");

    wage_clean()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "--append-to",
            master.to_str().unwrap(),
        ])
        .assert()
        .success();

    // A .tsv input must not force tabs into the .csv master.
    let contents = ws.read("master.csv");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], canonical_header());
    assert!(!contents.contains('\t'));
    assert!(lines[1].starts_with("2022,Rīga,1000011"));
}

#[test]
fn clean_append_to_requires_the_full_canonical_set() {
    let ws = TestWorkspace::new();
    // Only a handful of source columns: cleaning succeeds, but the table is
    // too narrow for the master insert.
    let input = ws.write(
        "wages.csv",
        "Gads,\"Darba ņēm. kopā, alga\"\n2022,1200\n",
    );
    let master = ws.path().join("master.csv");

    wage_clean()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "--append-to",
            master.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Missing columns for insert"));
}
