//! Integration tests for pdfstack.
//!
//! These tests exercise full session flows against real PDF bytes built
//! with lopdf. Fixtures are generated programmatically; each page carries
//! a distinct MediaBox width so page order stays observable through a
//! merge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lopdf::{Document, Object, dictionary};

use pdfstack::engine::LopdfEngine;
use pdfstack::merge::MergePipeline;
use pdfstack::render::RecordingRenderer;
use pdfstack::session::{Session, SessionOptions};
use pdfstack::status::MemorySink;

/// Build a minimal PDF with `page_count` pages.
///
/// Page `i` gets a MediaBox width of `base_width + i`, so the sequence of
/// widths in a merged output identifies both the source document and the
/// intra-document page order.
pub fn pdf_bytes(base_width: i64, page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(page_count);
    for i in 0..page_count {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Integer(base_width + i as i64),
                792.into(),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => dictionary! {},
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture PDF should serialize");
    buffer
}

/// Write a fixture PDF into `dir` and return its path.
pub fn write_fixture(dir: &Path, name: &str, base_width: i64, page_count: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(base_width, page_count)).expect("fixture should be writable");
    path
}

/// Read the MediaBox width marker of every page, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("output should be a loadable PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let dict = doc.get_object(id).unwrap().as_dict().unwrap();
            let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// A session over the real lopdf engine, with recording observers.
pub struct Harness {
    pub session: Session<LopdfEngine>,
    pub renderer: Arc<RecordingRenderer>,
    pub sink: Arc<MemorySink>,
}

/// Build a harness with the given delivery options.
pub fn harness(options: SessionOptions) -> Harness {
    let renderer = Arc::new(RecordingRenderer::new());
    let sink = Arc::new(MemorySink::new());
    let session = Session::new(
        MergePipeline::new(LopdfEngine::new()),
        Box::new(Arc::clone(&renderer)),
        Box::new(Arc::clone(&sink)),
        options,
    );
    Harness {
        session,
        renderer,
        sink,
    }
}

/// Names in the most recently rendered frame.
pub fn rendered_names(renderer: &RecordingRenderer) -> Vec<String> {
    renderer
        .last_frame()
        .expect("a frame should have been rendered")
        .into_iter()
        .map(|row| row.name)
        .collect()
}
