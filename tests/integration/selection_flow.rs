//! Integration tests for selection management through the session.

use pdfstack::error::PdfStackError;
use pdfstack::reorder::HoverSide;
use pdfstack::session::SessionOptions;
use tempfile::TempDir;

use crate::common::{harness, rendered_names, write_fixture};

#[test]
fn test_add_patterns_in_given_order() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);
    let b = write_fixture(dir.path(), "b.pdf", 700, 1);

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns([b.to_string_lossy(), a.to_string_lossy()])
        .unwrap();

    assert_eq!(rendered_names(&h.renderer), ["b.pdf", "a.pdf"]);
    assert_eq!(
        h.sink.last().as_deref(),
        Some("2 file(s) added. Total: 2 file(s).")
    );
}

#[test]
fn test_add_directory_resolves_pdfs() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "x.pdf", 600, 1);
    write_fixture(dir.path(), "y.pdf", 700, 1);
    std::fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns([dir.path().to_string_lossy()])
        .unwrap();

    assert_eq!(h.session.store().len(), 2);
    assert_eq!(rendered_names(&h.renderer), ["x.pdf", "y.pdf"]);
}

#[test]
fn test_add_matching_nothing_reports_no_files() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("none-*.pdf");

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns([pattern.to_string_lossy()])
        .unwrap();

    assert_eq!(h.sink.last().as_deref(), Some("No files selected."));
    assert!(h.session.store().is_empty());
}

#[test]
fn test_same_file_can_be_selected_twice() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);

    let mut h = harness(SessionOptions::default());
    h.session.add_patterns([a.to_string_lossy()]).unwrap();
    h.session.add_patterns([a.to_string_lossy()]).unwrap();

    assert_eq!(rendered_names(&h.renderer), ["a.pdf", "a.pdf"]);
}

#[test]
fn test_remove_then_reorder_keeps_positions_contiguous() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = ["a.pdf", "b.pdf", "c.pdf", "d.pdf"]
        .iter()
        .enumerate()
        .map(|(i, name)| write_fixture(dir.path(), name, 600 + 100 * i as i64, 1))
        .collect();

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns(paths.iter().map(|p| p.to_string_lossy()))
        .unwrap();

    h.session.remove(1).unwrap();
    h.session.move_item(2, 0).unwrap();
    assert_eq!(rendered_names(&h.renderer), ["d.pdf", "a.pdf", "c.pdf"]);

    // Every rank maps onto a live position after the churn.
    let frame = h.renderer.last_frame().unwrap();
    for (i, row) in frame.iter().enumerate() {
        assert_eq!(row.rank, i + 1);
        assert_eq!(row.position, i);
    }
}

#[test]
fn test_drag_preview_commits_only_on_drop() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = ["a.pdf", "b.pdf", "c.pdf"]
        .iter()
        .enumerate()
        .map(|(i, name)| write_fixture(dir.path(), name, 600 + 100 * i as i64, 1))
        .collect();

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns(paths.iter().map(|p| p.to_string_lossy()))
        .unwrap();

    // Drag the first item below the last item's midline.
    assert!(h.session.begin_drag(0));
    h.session.hover_drag(2, HoverSide::Below);
    assert_eq!(rendered_names(&h.renderer), ["b.pdf", "c.pdf", "a.pdf"]);
    // Preview only; the store still has the original order.
    assert_eq!(h.session.store().get(0).unwrap().name(), "a.pdf");

    h.session.drop_drag().unwrap();
    assert_eq!(h.session.store().get(2).unwrap().name(), "a.pdf");
    assert_eq!(
        h.sink.last().as_deref(),
        Some("File order updated. Total: 3 file(s).")
    );
}

#[test]
fn test_drag_cancel_reverts_the_preview() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", 600, 1);
    let b = write_fixture(dir.path(), "b.pdf", 700, 1);

    let mut h = harness(SessionOptions::default());
    h.session
        .add_patterns([a.to_string_lossy(), b.to_string_lossy()])
        .unwrap();

    h.session.begin_drag(1);
    h.session.hover_drag(0, HoverSide::Above);
    assert_eq!(rendered_names(&h.renderer), ["b.pdf", "a.pdf"]);

    h.session.cancel_drag();
    assert_eq!(rendered_names(&h.renderer), ["a.pdf", "b.pdf"]);
    assert_eq!(h.session.store().get(0).unwrap().name(), "a.pdf");
}

#[test]
fn test_remove_out_of_range_is_recoverable() {
    let mut h = harness(SessionOptions::default());
    let err = h.session.remove(0).unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(err, PdfStackError::PositionOutOfRange { .. }));
}
