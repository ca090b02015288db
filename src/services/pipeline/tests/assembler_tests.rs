use super::*;
use crate::services::tabular::{CellValue, TabularGrid};
use crate::test_utils::{create_template_tree, TemplateFixture, PNG_BYTES};
use crate::types::errors::{AssemblyError, AssemblyResult};
use super::assembler::discard_on_error;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

fn report_data() -> Value {
    json!({
        "Title": "Exam <results>",
        "ChartTitle": "Scores",
        "ChartData": [
            {"Key": "Alice", "Value": 100},
            {"Key": "Bob", "Value": 88},
            {"Key": "Carol", "Value": 66}
        ]
    })
}

fn full_manifest(fixture: &TemplateFixture) -> Manifest {
    let grid = TabularGrid::new("Scores")
        .with_row(["Name", "Score"])
        .with_row(vec![CellValue::from("Alice"), CellValue::from(100)])
        .with_row(vec![CellValue::from("Bob"), CellValue::from(88)]);
    Manifest::new()
        .template("/word/document.xml", report_data())
        .template("/word/charts/chart1.xml", report_data())
        .binary("/word/media/image1.png", fixture.image_path())
        .tabular("/word/embeddings/Microsoft_Excel____.xlsx", grid)
}

fn staged_files(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            crate::services::fs_utils::path_utils::archive_name(
                e.path().strip_prefix(root).unwrap(),
            )
        })
        .collect()
}

fn read_member(archive: &Path, name: &str) -> Vec<u8> {
    let file = fs::File::open(archive).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_assemble_archive_matches_staging_tree() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());

    let doc = assembler.assemble(&full_manifest(&fixture)).unwrap();

    let archived: BTreeSet<String> = doc.members().iter().cloned().collect();
    assert_eq!(archived, staged_files(&doc.staging_dir()));
    assert!(archived.contains("word/styles.xml"), "Untouched members are kept");
}

#[test]
fn test_assemble_rewrites_each_member_kind() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let doc = assembler.assemble(&full_manifest(&fixture)).unwrap();
    let archive = doc.archive_path();

    let body = String::from_utf8(read_member(archive, "word/document.xml")).unwrap();
    assert!(body.contains("Exam &lt;results&gt;"));
    let alice = body.find("1. Alice: 100").unwrap();
    let bob = body.find("2. Bob: 88").unwrap();
    let carol = body.find("3. Carol: 66").unwrap();
    assert!(alice < bob && bob < carol);
    assert!(!body.contains("{{"));

    let chart = String::from_utf8(read_member(archive, "word/charts/chart1.xml")).unwrap();
    assert!(chart.contains(r#"<c:pt idx="2"><c:v>66</c:v></c:pt>"#));

    assert_eq!(read_member(archive, "word/media/image1.png"), PNG_BYTES);

    let xlsx = read_member(archive, "word/embeddings/Microsoft_Excel____.xlsx");
    let mut book = zip::ZipArchive::new(std::io::Cursor::new(xlsx)).unwrap();
    let mut sheet = String::new();
    book.by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    assert!(sheet.contains(r#"<c r="B2"><v>100</v></c>"#));
}

#[test]
fn test_assemble_leaves_template_tree_untouched() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    assembler.assemble(&full_manifest(&fixture)).unwrap();

    let template = fixture.template_dir();
    assert_eq!(
        fs::read_to_string(template.join("word/document.xml")).unwrap(),
        crate::test_utils::DOCUMENT_TEMPLATE
    );
    assert_eq!(
        fs::read(template.join("word/embeddings/Microsoft_Excel____.xlsx")).unwrap(),
        b""
    );
    assert_eq!(
        fs::read(template.join("word/media/image1.png")).unwrap(),
        b"placeholder image"
    );
}

#[test]
fn test_runs_use_isolated_workspaces() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());

    let first = assembler.assemble(&full_manifest(&fixture)).unwrap();
    let second = assembler.assemble(&full_manifest(&fixture)).unwrap();

    assert_ne!(first.run_id(), second.run_id());
    assert_ne!(first.archive_path(), second.archive_path());

    let workspace_root = first.archive_path().parent().unwrap().to_path_buf();
    drop(first);
    assert!(!workspace_root.exists(), "Workspace is removed on drop");
    assert!(second.archive_path().exists());
}

#[test]
fn test_entry_failure_aborts_before_archiving() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let output = fixture.dir.path().join("out").join("doc.zip");

    let manifest = Manifest::new()
        .template("/word/document.xml", report_data())
        .template("/word/charts/chart1.xml", json!({"ChartData": []}))
        .binary("/word/media/image1.png", fixture.image_path());

    let err = assembler.assemble_to(&manifest, &output).unwrap_err();
    match err {
        AssemblyError::Template { member, .. } => assert_eq!(member, "/word/charts/chart1.xml"),
        other => panic!("Expected template error, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_binary_source_is_returned_error() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let manifest = Manifest::new().binary(
        "/word/media/image1.png",
        fixture.dir.path().join("missing.png"),
    );

    let err = assembler.assemble(&manifest).unwrap_err();
    assert!(matches!(err, AssemblyError::Io { .. }));
}

#[test]
fn test_unknown_kind_removes_stale_archive_and_aborts() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let output = fixture.dir.path().join("doc.zip");
    fs::write(&output, b"stale archive from a previous run").unwrap();

    let text = r#"{"entries": [
        {"kind": "template", "path": "word/document.xml", "data": {"Title": "t", "ChartData": []}},
        {"kind": "spreadsheet", "path": "word/embeddings/Microsoft_Excel____.xlsx"}
    ]}"#;

    let err = assembler.assemble_json_to(text, &output).unwrap_err();
    assert!(matches!(err, AssemblyError::UnsupportedKind(ref kind) if kind == "spreadsheet"));
    assert!(!output.exists(), "No archive may be left at the output path");
}

#[test]
fn test_assemble_to_replaces_stale_archive() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let output = fixture.dir.path().join("doc.zip");
    fs::write(&output, b"stale").unwrap();

    let summary = assembler
        .assemble_to(&full_manifest(&fixture), &output)
        .unwrap();

    assert_eq!(summary.archive_path, output);
    assert!(fs::read(&output).unwrap().starts_with(b"PK"));
}

#[test]
fn test_failed_pack_discards_partial_archive() {
    let fixture = create_template_tree();
    let output = fixture.dir.path().join("doc.zip");
    fs::write(&output, b"PK\x03\x04 truncated").unwrap();

    let result: AssemblyResult<()> = Err(AssemblyError::Archive("disk full".into()));
    let err = discard_on_error(&output, result).unwrap_err();

    assert!(matches!(err, AssemblyError::Archive(ref m) if m == "disk full"));
    assert!(!output.exists());
}

#[test]
fn test_successful_pack_keeps_archive() {
    let fixture = create_template_tree();
    let output = fixture.dir.path().join("doc.zip");
    fs::write(&output, b"PK").unwrap();

    discard_on_error(&output, Ok(())).unwrap();
    assert!(output.exists());
}

#[test]
fn test_assemble_json_runs_pipeline() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let text = serde_json::to_string(&full_manifest(&fixture)).unwrap();

    let doc = assembler.assemble_json(&text).unwrap();
    assert!(doc.read_bytes().unwrap().starts_with(b"PK"));
}

#[test]
fn test_missing_template_dir_fails() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.dir.path().join("absent"));
    let err = assembler.assemble(&Manifest::new()).unwrap_err();
    assert!(matches!(err, AssemblyError::Io { .. }));
}

#[test]
fn test_empty_manifest_packs_template_as_is() {
    let fixture = create_template_tree();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let doc = assembler.assemble(&Manifest::new()).unwrap();

    assert_eq!(doc.members().len(), 7);
    assert_eq!(
        read_member(doc.archive_path(), "word/document.xml"),
        crate::test_utils::DOCUMENT_TEMPLATE.as_bytes()
    );
}

#[test]
fn test_template_member_new_in_staging_is_created() {
    let fixture = create_template_tree();
    fs::create_dir_all(fixture.template_dir().join("word/footers")).unwrap();
    fs::write(
        fixture.template_dir().join("word/footers/footer1.xml"),
        "{{ Title }}",
    )
    .unwrap();
    let assembler = DocumentAssembler::new(fixture.template_dir());
    let doc = assembler
        .assemble(&Manifest::new().template("word/footers/footer1.xml", json!({"Title": "f"})))
        .unwrap();
    assert_eq!(read_member(doc.archive_path(), "word/footers/footer1.xml"), b"f");
}
