mod common;

use std::fs;
use std::io::{Cursor, Write as _};

use assert_cmd::Command;
use candidate_refine::codec::{self, DecodeOptions, TableFormat};
use common::TestWorkspace;
use predicates::str::contains;

const EXPERIENCE_CSV: &str = "Candidate ID,Name,E-mail,CREATED_DATE,Tags\n\
    C1,Asha,asha@example.com,01/05/2024 10:00,01/05/2024\n\
    C2,Ravi,ravi@example.com,02/05/2024 09:00,02/05/2024\n\
    C1,Asha Patel,asha.p@example.com,03/05/2024 08:00,03/05/2024\n";

fn refine() -> Command {
    Command::cargo_bin("candidate-refine").expect("binary exists")
}

#[test]
fn process_writes_a_single_renamed_output() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("May Export.csv", EXPERIENCE_CSV);
    let out_dir = workspace.path().join("out");

    refine()
        .args([
            "process",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let text =
        fs::read_to_string(out_dir.join("processed_May_Export.csv")).expect("read output");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().expect("header"),
        "Applicaiton Date,Updation Date,Candidate ID,Candidate Name,Email,Status,Comments"
    );
    let first = lines.next().expect("first row");
    assert!(first.starts_with("45415,45415,C1,Asha Patel"), "{first}");
    assert_eq!(lines.count(), 1);
}

#[test]
fn process_bundles_multiple_outputs_into_a_zip() {
    let workspace = TestWorkspace::new();
    let one = workspace.write("one.csv", EXPERIENCE_CSV);
    let two = workspace.write("two.csv", EXPERIENCE_CSV);
    let notes = workspace.write("notes.txt", "not a sheet");
    let out_dir = workspace.path().join("out");

    refine()
        .args([
            "process",
            "-i",
            one.to_str().unwrap(),
            "-i",
            two.to_str().unwrap(),
            "-i",
            notes.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let bundle = fs::read_dir(&out_dir)
        .expect("read output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("processed_files_") && n.ends_with(".zip"))
        })
        .expect("bundle exists");

    let bytes = fs::read(&bundle).expect("read bundle");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("readable bundle");
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["processed_one.csv", "processed_two.csv"]);
}

#[test]
fn process_expands_zip_inputs() {
    let workspace = TestWorkspace::new();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    writer
        .start_file("exports/June Batch.csv", options)
        .expect("start entry");
    writer
        .write_all(EXPERIENCE_CSV.as_bytes())
        .expect("write entry");
    let bytes = writer.finish().expect("finish zip").into_inner();
    let archive = workspace.write_bytes("upload.zip", &bytes);
    let out_dir = workspace.path().join("out");

    refine()
        .args([
            "process",
            "-i",
            archive.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out_dir.join("processed_June_Batch.csv").exists());
}

#[test]
fn process_preserves_the_xlsx_container() {
    let workspace = TestWorkspace::new();
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Candidate ID", "Name", "CREATED_DATE", "Tags"]
        .iter()
        .enumerate()
    {
        sheet
            .write_string(0, col as u16, *header)
            .expect("write header");
    }
    for (col, value) in ["C1", "Asha", "01/05/2024 10:00", "01/05/2024"]
        .iter()
        .enumerate()
    {
        sheet
            .write_string(1, col as u16, *value)
            .expect("write cell");
    }
    let input = workspace.write_bytes(
        "export.xlsx",
        &workbook.save_to_buffer().expect("workbook bytes"),
    );
    let out_dir = workspace.path().join("out");

    refine()
        .args([
            "process",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let bytes = fs::read(out_dir.join("processed_export.xlsx")).expect("read output");
    let table = codec::decode(&bytes, TableFormat::Xlsx, &DecodeOptions::default())
        .expect("output decodes");
    assert_eq!(table.headers[0], "Applicaiton Date");
    assert_eq!(table.rows[0][0], "45413");
}

#[test]
fn fresher_format_flag_changes_the_layout() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "campus.csv",
        "Candidate ID,Name,Name of the Institute,CREATED_DATE,Tags\n\
         C7,Kiran,IIT Madras,10/06/2024 12:00,10/06/2024\n",
    );
    let out_dir = workspace.path().join("out");

    refine()
        .args([
            "process",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--format",
            "fresher",
        ])
        .assert()
        .success();

    let text = fs::read_to_string(out_dir.join("processed_campus.csv")).expect("read output");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().expect("header"),
        "Application Date,Updation Date,Candidate ID,Candidate Name,Name of Instiute,Status,Comments"
    );
    assert_eq!(
        lines.next().expect("row"),
        "45453,45453,C7,Kiran,IIT Madras,Active,"
    );
}

#[test]
fn process_writes_a_summary_report() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", EXPERIENCE_CSV);
    let out_dir = workspace.path().join("out");
    let summary = workspace.path().join("summary.json");

    refine()
        .args([
            "process",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--summary",
            summary.to_str().unwrap(),
        ])
        .assert()
        .success();

    let reports: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("read summary"))
            .expect("parse summary");
    let report = &reports[0];
    assert_eq!(report["input"], "export.csv");
    assert_eq!(report["output"], "processed_export.csv");
    assert_eq!(report["content_type"], "text/csv");
    assert_eq!(report["rows_read"], 3);
    assert_eq!(report["rows_emitted"], 2);
    assert_eq!(report["duplicates_collapsed"], 1);
    assert_eq!(report["blank_candidate_ids"], 0);
}

#[test]
fn process_rejects_inputs_with_no_tables() {
    let workspace = TestWorkspace::new();
    let notes = workspace.write("notes.txt", "hello");

    refine()
        .args(["process", "-i", notes.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no .csv, .xlsx, or .zip inputs were eligible"));
}

#[test]
fn process_names_the_sheet_missing_its_id_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("broken.csv", "Name,CREATED_DATE\nAsha,01/05/2024\n");

    refine()
        .args(["process", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("broken.csv"))
        .stderr(contains("required column 'Candidate ID' is missing"));
}

#[test]
fn preview_prints_the_remapped_table() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", EXPERIENCE_CSV);

    refine()
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "1"])
        .assert()
        .success()
        .stdout(contains("Applicaiton Date"))
        .stdout(contains("Asha Patel"));
}

#[test]
fn formats_lists_mappings_and_the_fresher_column_order() {
    refine()
        .arg("formats")
        .assert()
        .success()
        .stdout(contains("Applicaiton Date"))
        .stdout(contains("Name of Instiute"))
        .stdout(contains("How Did You Hear About This Job Opportunity?"))
        .stdout(contains("Output column order for the fresher format:"));
}
