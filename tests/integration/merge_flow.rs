//! Integration tests for the merge and delivery flow against real PDFs.

use pdfstack::error::PdfStackError;
use pdfstack::session::SessionOptions;
use tempfile::TempDir;

use crate::common::{harness, page_widths, write_fixture};

fn options(dir: &TempDir, auto_save: bool) -> SessionOptions {
    SessionOptions {
        output_path: dir.path().join("merged.pdf"),
        auto_save,
        ..SessionOptions::default()
    }
}

#[tokio::test]
async fn test_merge_concatenates_in_selection_order() {
    let dir = TempDir::new().unwrap();
    // Page counts 2, 3, 1 with distinct width bases per document.
    let a = write_fixture(dir.path(), "a.pdf", 600, 2);
    let b = write_fixture(dir.path(), "b.pdf", 700, 3);
    let c = write_fixture(dir.path(), "c.pdf", 800, 1);

    let mut h = harness(options(&dir, true));
    h.session
        .add_patterns([a.to_string_lossy(), b.to_string_lossy(), c.to_string_lossy()])
        .unwrap();
    h.session.merge().await.unwrap();

    let output = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert_eq!(page_widths(&output), vec![600, 601, 700, 701, 702, 800]);

    let last = h.sink.last().unwrap();
    assert!(last.starts_with("PDFs merged successfully! 6 page(s) from 3 file(s)."));
}

#[tokio::test]
async fn test_reorder_changes_the_next_merge() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);
    let b = write_fixture(dir.path(), "b.pdf", 700, 1);

    let mut h = harness(options(&dir, true));
    h.session
        .add_patterns([a.to_string_lossy(), b.to_string_lossy()])
        .unwrap();

    h.session.merge().await.unwrap();
    let first = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert_eq!(page_widths(&first), vec![600, 700]);

    h.session.move_item(1, 0).unwrap();
    h.session.merge().await.unwrap();
    let second = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert_eq!(page_widths(&second), vec![700, 600]);
}

#[tokio::test]
async fn test_duplicate_selection_duplicates_pages() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);

    let mut h = harness(options(&dir, true));
    h.session
        .add_patterns([a.to_string_lossy(), a.to_string_lossy()])
        .unwrap();
    h.session.merge().await.unwrap();

    let output = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert_eq!(page_widths(&output), vec![600, 600]);
}

#[tokio::test]
async fn test_decode_failure_aborts_whole_merge() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"this is not a pdf").unwrap();
    let c = write_fixture(dir.path(), "c.pdf", 800, 1);

    let mut h = harness(options(&dir, true));
    h.session
        .add_patterns([a.to_string_lossy(), bad.to_string_lossy(), c.to_string_lossy()])
        .unwrap();

    let err = h.session.merge().await.unwrap_err();
    assert!(matches!(err, PdfStackError::DecodeFailed { ref name, .. } if name == "bad.pdf"));
    assert!(err.is_recoverable());

    // No artifact, no output file.
    assert!(h.session.artifact_slot().is_released());
    assert!(!dir.path().join("merged.pdf").exists());

    // Removing the offender makes the retry succeed.
    h.session.remove(1).unwrap();
    h.session.merge().await.unwrap();
    let output = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert_eq!(page_widths(&output), vec![600, 800]);
}

#[tokio::test]
async fn test_empty_merge_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(options(&dir, true));

    let err = h.session.merge().await.unwrap_err();
    assert!(matches!(err, PdfStackError::EmptySelection));
    assert!(!dir.path().join("merged.pdf").exists());
}

#[tokio::test]
async fn test_manual_save_without_auto_save() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 2);

    let mut h = harness(options(&dir, false));
    h.session.add_patterns([a.to_string_lossy()]).unwrap();
    h.session.merge().await.unwrap();

    assert!(!dir.path().join("merged.pdf").exists());

    let target = dir.path().join("elsewhere.pdf");
    let saved = h.session.save(Some(&target)).await.unwrap();
    assert_eq!(saved, target);

    let output = std::fs::read(&target).unwrap();
    assert_eq!(page_widths(&output), vec![600, 601]);
}

#[tokio::test]
async fn test_save_after_release_reports_released() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);

    let mut h = harness(options(&dir, false));
    h.session.add_patterns([a.to_string_lossy()]).unwrap();
    h.session.merge().await.unwrap();

    h.session.artifact_slot().release();
    let err = h.session.save(None).await.unwrap_err();
    assert!(matches!(err, PdfStackError::ArtifactReleased));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_merged_output_reloads_cleanly() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 3);
    let b = write_fixture(dir.path(), "b.pdf", 700, 2);

    let mut h = harness(options(&dir, true));
    h.session
        .add_patterns([a.to_string_lossy(), b.to_string_lossy()])
        .unwrap();
    h.session.merge().await.unwrap();

    // A second session can consume the merged output as an input.
    let merged = dir.path().join("merged.pdf");
    let mut second = harness(SessionOptions {
        output_path: dir.path().join("twice.pdf"),
        auto_save: true,
        ..SessionOptions::default()
    });
    second.session.add_patterns([merged.to_string_lossy()]).unwrap();
    second.session.merge().await.unwrap();

    let output = std::fs::read(dir.path().join("twice.pdf")).unwrap();
    assert_eq!(page_widths(&output), vec![600, 601, 602, 700, 701]);
}
