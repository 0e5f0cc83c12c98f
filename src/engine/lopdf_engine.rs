//! lopdf-backed implementation of the document engine.
//!
//! Copying a page means cloning its object subtree out of the source
//! document (with the page tree `Parent` link stripped and inheritable
//! attributes materialized onto the page first), offsetting every object id
//! past the output document's high-water mark, and splicing the page into
//! the output's page tree.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::engine::DocumentEngine;
use crate::error::{PdfStackError, Result};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A page copied out of a source document.
///
/// Holds the page object and every object it transitively references,
/// still under their source-document ids.
#[derive(Debug)]
pub struct CopiedPage {
    objects: BTreeMap<ObjectId, Object>,
    page_id: ObjectId,
    max_id: u32,
}

/// Document engine backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfEngine;

impl LopdfEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// The output document's page tree root.
    fn pages_root_id(doc: &Document) -> Result<ObjectId> {
        let catalog = doc
            .catalog()
            .map_err(|e| PdfStackError::engine_failed(format!("failed to get catalog: {e}")))?;
        catalog
            .get(b"Pages")
            .and_then(Object::as_reference)
            .map_err(|e| {
                PdfStackError::engine_failed(format!("failed to get pages reference: {e}"))
            })
    }

    /// Append a page reference to the page tree's Kids and bump Count.
    fn push_into_page_tree(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> Result<()> {
        let pages_dict = doc
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| {
                PdfStackError::engine_failed(format!("pages object is not a dictionary: {e}"))
            })?;

        let kids = pages_dict
            .get_mut(b"Kids")
            .map_err(|_| PdfStackError::engine_failed("pages dictionary missing Kids array"))?;
        let Object::Array(kids_array) = kids else {
            return Err(PdfStackError::engine_failed("Kids is not an array"));
        };
        kids_array.push(Object::Reference(page_id));

        let count = pages_dict
            .get(b"Count")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        pages_dict.set("Count", Object::Integer(count + 1));
        Ok(())
    }
}

impl DocumentEngine for LopdfEngine {
    type Doc = Document;
    type Page = CopiedPage;

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(Vec::new()),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PdfStackError::engine_failed(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfStackError::engine_failed("PDF is encrypted"));
        }
        if doc.get_pages().is_empty() {
            return Err(PdfStackError::engine_failed("PDF has no pages"));
        }
        Ok(doc)
    }

    fn page_indices(&self, doc: &Document) -> Vec<u32> {
        doc.get_pages().keys().copied().collect()
    }

    fn copy_pages(&self, doc: &Document, indices: &[u32]) -> Result<Vec<CopiedPage>> {
        let pages = doc.get_pages();
        let mut copied = Vec::with_capacity(indices.len());

        for &number in indices {
            let page_id = *pages.get(&number).ok_or_else(|| {
                PdfStackError::engine_failed(format!("page {number} not found"))
            })?;

            let mut page_dict = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|e| {
                    PdfStackError::engine_failed(format!("page {number} is not a dictionary: {e}"))
                })?
                .clone();

            materialize_inherited(doc, &mut page_dict);
            // The Parent link would drag the whole source page tree along;
            // the output document re-parents the page on append.
            page_dict.remove(b"Parent");

            let page_obj = Object::Dictionary(page_dict);
            let mut objects = BTreeMap::new();
            collect_dependencies(&mut objects, doc, &page_obj);
            objects.insert(page_id, page_obj);

            let max_id = objects.keys().map(|id| id.0).max().unwrap_or(0);
            copied.push(CopiedPage {
                objects,
                page_id,
                max_id,
            });
        }

        Ok(copied)
    }

    fn append_page(&self, output: &mut Document, page: CopiedPage) -> Result<()> {
        // Shift the bundle's ids past everything already in the output to
        // avoid id collisions between source documents.
        let offset = output.max_id;
        let new_page_id = (page.page_id.0 + offset, page.page_id.1);
        output.objects.extend(offset_ids(page.objects, offset));
        output.max_id = offset + page.max_id;

        let pages_id = Self::pages_root_id(output)?;
        output
            .get_object_mut(new_page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| {
                PdfStackError::engine_failed(format!("copied page is not a dictionary: {e}"))
            })?
            .set("Parent", pages_id);

        Self::push_into_page_tree(output, pages_id, new_page_id)
    }

    fn serialize(&self, output: &mut Document) -> Result<Vec<u8>> {
        output.compress();
        output.renumber_objects();

        let mut buffer = Vec::new();
        output
            .save_to(&mut buffer)
            .map_err(|e| PdfStackError::engine_failed(format!("failed to serialize: {e}")))?;
        Ok(buffer)
    }
}

/// Copy attributes the page inherits from its page-tree ancestors onto the
/// page itself, so the copy stays self-contained once Parent is stripped.
fn materialize_inherited(doc: &Document, page_dict: &mut Dictionary) {
    for key in INHERITABLE_PAGE_KEYS {
        if page_dict.has(key) {
            continue;
        }
        if let Some(value) = find_inherited(doc, page_dict, key) {
            page_dict.set(key, value);
        }
    }
}

/// Walk the Parent chain looking for an inherited attribute.
fn find_inherited(doc: &Document, page_dict: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page_dict
        .get(b"Parent")
        .and_then(Object::as_reference)
        .ok();
    while let Some(id) = parent {
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        parent = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Recursively collect every object `obj` references out of `source`.
fn collect_dependencies(
    target: &mut BTreeMap<ObjectId, Object>,
    source: &Document,
    obj: &Object,
) {
    match obj {
        Object::Reference(id) => {
            if !target.contains_key(id)
                && let Ok(referenced) = source.get_object(*id)
            {
                target.insert(*id, referenced.clone());
                collect_dependencies(target, source, referenced);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                collect_dependencies(target, source, value);
            }
        }
        Object::Array(items) => {
            for item in items {
                collect_dependencies(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                collect_dependencies(target, source, value);
            }
        }
        _ => {}
    }
}

/// Shift every object id (and every reference) in a bundle by `offset`.
fn offset_ids(objects: BTreeMap<ObjectId, Object>, offset: u32) -> BTreeMap<ObjectId, Object> {
    objects
        .into_iter()
        .map(|((number, generation), mut obj)| {
            offset_refs(&mut obj, offset);
            ((number + offset, generation), obj)
        })
        .collect()
}

fn offset_refs(obj: &mut Object, offset: u32) {
    match obj {
        Object::Reference(id) => id.0 += offset,
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                offset_refs(value, offset);
            }
        }
        Object::Array(items) => {
            for item in items {
                offset_refs(item, offset);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                offset_refs(value, offset);
            }
        }
        _ => {}
    }
}
