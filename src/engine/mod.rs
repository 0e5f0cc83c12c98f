//! The external document engine boundary.
//!
//! The merge pipeline is written against [`DocumentEngine`], the contract
//! of the page-level decode/copy/serialize service. The production
//! implementation is [`LopdfEngine`]; tests substitute recording mocks to
//! observe call order without touching real PDF bytes.
//!
//! Engine calls are synchronous and run between the pipeline's await
//! points; the pipeline's suspension points are its byte reads and artifact
//! writes.

pub mod lopdf_engine;

pub use lopdf_engine::LopdfEngine;

use crate::error::Result;

/// Capabilities required of the document engine.
pub trait DocumentEngine {
    /// A decoded or under-construction document.
    type Doc;
    /// A page copied out of a decoded document, ready to append.
    type Page;

    /// Create an empty output document.
    fn create_empty(&self) -> Self::Doc;

    /// Decode a document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the underlying reason when the bytes are
    /// not a decodable document.
    fn load(&self, bytes: &[u8]) -> Result<Self::Doc>;

    /// The document's page indices, in intra-document order.
    fn page_indices(&self, doc: &Self::Doc) -> Vec<u32>;

    /// Copy the given pages out of a decoded document, in the given order.
    fn copy_pages(&self, doc: &Self::Doc, indices: &[u32]) -> Result<Vec<Self::Page>>;

    /// Append one copied page after all pages already in `output`.
    fn append_page(&self, output: &mut Self::Doc, page: Self::Page) -> Result<()>;

    /// Serialize the output document to a byte buffer.
    fn serialize(&self, output: &mut Self::Doc) -> Result<Vec<u8>>;
}
