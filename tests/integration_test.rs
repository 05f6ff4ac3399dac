/// Integration tests for the macro analyzer
///
/// These tests drive the public API with canned tool output, covering single
/// classifications and batch scans where some files fail.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::Level;

use macro_analyzer::app;
use macro_analyzer::{
    ClassificationResult, ExternalTool, MacroAnalyzer, MemoryLogger, RuleSet, ToolError,
};

/// Fake `file`: reports a MIME type chosen by file extension
struct ExtensionMime;

impl ExternalTool for ExtensionMime {
    fn run(&self, args: &[&OsStr]) -> Result<Vec<u8>, ToolError> {
        assert_eq!(&args[..2], &[OsStr::new("--brief"), OsStr::new("--mime")]);
        let path = Path::new(args[2]);
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("doc") => "application/msword; charset=binary",
            Some("docm") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document; charset=binary"
            }
            Some("xml") => "application/xml; charset=us-ascii",
            Some("broken") => return Err(ToolError::Failed(format!("cannot type {}", path.display()))),
            _ => "text/plain; charset=us-ascii",
        };
        Ok(mime.as_bytes().to_vec())
    }
}

/// Fake `olevba`: echoes the document content back as its report
struct EchoReport;

impl ExternalTool for EchoReport {
    fn run(&self, args: &[&OsStr]) -> Result<Vec<u8>, ToolError> {
        assert_eq!(args[0], OsStr::new("-a"));
        std::fs::read(args[1]).map_err(|e| ToolError::Failed(e.to_string()))
    }
}

fn analyzer() -> (MacroAnalyzer, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let analyzer = MacroAnalyzer::new(
        Arc::new(RuleSet::builtin().expect("rules compile")),
        logger.clone(),
        Box::new(ExtensionMime),
        Box::new(EchoReport),
    );
    (analyzer, logger)
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

#[test]
fn test_office_document_with_autoexec_and_download() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write(
        temp_dir.path(),
        "order.docm",
        "VBA MACRO ThisDocument.cls\n\
         | AutoExec   | Document_Open | Runs when the Word document is opened |\n\
         | Suspicious | User-Agent    | May download files from the Internet  |\n",
    );
    let (analyzer, logger) = analyzer();

    let result = analyzer.classify(&path, false);

    assert_eq!(
        result,
        ClassificationResult::Infected(vec![
            "executes automatically".into(),
            "download file(s)".into(),
            "have suspicious strings".into(),
        ])
    );
    assert_eq!(
        logger.lines(),
        vec![(
            Level::Error,
            "VIRUS Contains macro(s) that executes automatically, download file(s), have suspicious strings"
                .to_string()
        )]
    );
}

#[test]
fn test_text_file_is_clean_even_with_markers() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write(temp_dir.path(), "notes.txt", "| AutoExec | not a document\n");
    let (analyzer, logger) = analyzer();

    assert_eq!(analyzer.classify(&path, false), ClassificationResult::Clean);
    assert_eq!(logger.messages(), vec!["notes.txt OK"]);
}

#[test]
fn test_flat_office_xml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let office = write(
        temp_dir.path(),
        "macro.xml",
        "<?xml version=\"1.0\"?>\n<?mso-application progid=\"Excel.Sheet\"?>\n| Suspicious | Shell | x\n",
    );
    let plain = write(temp_dir.path(), "plain.xml", "<?xml version=\"1.0\"?>\n| AutoExec |\n");
    let (analyzer, _) = analyzer();

    assert_eq!(
        analyzer.classify(&office, true),
        ClassificationResult::Infected(vec![
            "executes file(s)".into(),
            "have suspicious strings".into()
        ])
    );
    assert_eq!(analyzer.classify(&plain, true), ClassificationResult::Clean);
}

#[test]
fn test_batch_keeps_going_after_failures() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let infected = write(temp_dir.path(), "a.doc", "| AutoExec | AutoOpen\n");
    let broken = write(temp_dir.path(), "b.broken", "");
    let missing = temp_dir.path().join("c.doc");
    let clean = write(temp_dir.path(), "d.doc", "No VBA macros found.\n");
    let files = vec![
        infected.clone(),
        broken.clone(),
        missing.clone(),
        temp_dir.path().to_path_buf(),
        clean.clone(),
    ];
    let (analyzer, logger) = analyzer();

    let records = app::scan_files(&analyzer, &files, true, 2, None).expect("scan runs");

    let paths: Vec<_> = records.iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, files);
    assert!(records[0].result.is_infected());
    assert_eq!(
        records[1].result,
        ClassificationResult::Error(format!("cannot type {}", broken.display()))
    );
    assert_eq!(records[2].result, ClassificationResult::Skipped("does not exist".into()));
    assert_eq!(records[3].result, ClassificationResult::Skipped("not a file".into()));
    assert_eq!(records[4].result, ClassificationResult::Clean);

    let mut messages = logger.messages();
    messages.sort();
    let mut expected = vec![
        "VIRUS Dangerous macro".to_string(),
        format!("cannot type {}", broken.display()),
        format!("File {} does not exist", missing.display()),
        "d.doc OK".to_string(),
    ];
    expected.sort();
    assert_eq!(messages, expected);
}

#[test]
fn test_collect_targets_walks_directory() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = temp_dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write(temp_dir.path(), "one.doc", "");
    write(&nested, "two.doc", "");
    write(&nested, "three.doc", "");
    let explicit = temp_dir.path().join("not-there.doc");

    let all = app::collect_targets(&[explicit.clone()], Some(temp_dir.path()), 100);
    assert_eq!(all.len(), 4);
    assert_eq!(all[0], explicit);
    assert!(all.iter().all(|p| p == &explicit || p.is_file()));

    let capped = app::collect_targets(&[], Some(temp_dir.path()), 2);
    assert_eq!(capped.len(), 2);
}

#[test]
fn test_collect_targets_missing_directory() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let targets = app::collect_targets(&[], Some(&temp_dir.path().join("absent")), 10);
    assert!(targets.is_empty());
}
