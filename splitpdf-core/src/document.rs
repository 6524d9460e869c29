//! Source document handle
//!
//! [`SourceDocument`] owns the parsed codec object graph and is the only place
//! that touches it. Callers see page counts and get serialized PDFs back for a
//! list of [`PageIndex`] values; they never see objects or references.

use crate::error::{Result, SplitError};
use crate::selection::PageIndex;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// An immutable, parsed PDF
#[derive(Debug)]
pub struct SourceDocument {
    inner: Document,
    /// Page object ids in page order
    page_ids: Vec<ObjectId>,
    /// Page and page-tree node ids; references to them are never followed
    page_tree: HashSet<ObjectId>,
}

impl SourceDocument {
    /// Parse a PDF held in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data)
            .map_err(|err| SplitError::Codec(format!("failed to parse PDF: {err}")))?;

        let document = Self::from_document(inner);
        debug!(pages = document.page_count(), "PDF parsed");
        Ok(document)
    }

    /// Read and parse a PDF from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| SplitError::filesystem(path, err))?;
        Self::from_bytes(&data)
    }

    fn from_document(inner: Document) -> Self {
        // `get_pages` is keyed by 1-based page number, so values come out in order
        let page_ids = inner.get_pages().into_values().collect();
        let page_tree = inner
            .objects
            .iter()
            .filter(|(_, object)| is_page_tree_node(object))
            .map(|(id, _)| *id)
            .collect();

        Self {
            inner,
            page_ids,
            page_tree,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// PDF version from the file header, e.g. `1.7`.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// `/Title` of the document info dictionary, when present.
    pub fn title(&self) -> Option<String> {
        match self.info_dictionary()?.get(b"Title").ok()? {
            Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Build a standalone PDF holding `pages` in the given order and
    /// serialize it.
    ///
    /// Repeated indices produce repeated pages. An empty slice produces a
    /// valid document with no pages.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn extract(&self, pages: &[PageIndex]) -> Result<Vec<u8>> {
        let mut output = self.build(pages)?;

        let mut buffer = Vec::new();
        output
            .save_to(&mut buffer)
            .map_err(|err| SplitError::Codec(format!("failed to serialise PDF: {err}")))?;

        debug!(output_bytes = buffer.len(), "PDF serialised");
        Ok(buffer)
    }

    fn build(&self, pages: &[PageIndex]) -> Result<Document> {
        let mut target = Document::with_version(self.inner.version.as_str());
        let pages_id = target.new_object_id();
        let mut copier = ObjectCopier::new(&self.inner, &self.page_tree);

        let mut kids = Vec::with_capacity(pages.len());
        for &index in pages {
            let source_id =
                *self
                    .page_ids
                    .get(index.get())
                    .ok_or(SplitError::InvalidPageNumber {
                        page: index.page_number() as i64,
                        total: self.page_count(),
                    })?;

            let mut page = self.page_with_inherited(source_id)?;
            page.remove(b"Parent");

            // Annotations pointing back at this page (`/P`) land on its copy
            let page_id = target.new_object_id();
            copier.map(source_id, page_id);

            let mut copy = copier.copy_dictionary(&mut target, &page);
            copy.set("Parent", Object::Reference(pages_id));
            target.objects.insert(page_id, Object::Dictionary(copy));
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        target.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ])),
        );

        let catalog_id = target.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        target.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(info) = self.info_dictionary() {
            let info = copier.copy_dictionary(&mut target, info);
            let info_id = target.add_object(info);
            target.trailer.set("Info", Object::Reference(info_id));
        }

        Ok(target)
    }

    /// The page dictionary with inheritable attributes made explicit, so the
    /// page renders the same once detached from its original page tree.
    fn page_with_inherited(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut page = self.inner.get_dictionary(page_id)?.clone();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

        for _ in 0..MAX_TREE_DEPTH {
            let Some(parent_id) = parent else {
                break;
            };
            let Ok(node) = self.inner.get_dictionary(parent_id) else {
                break;
            };

            for key in INHERITABLE_KEYS {
                if !page.has(key) {
                    if let Ok(value) = node.get(key) {
                        page.set(key.to_vec(), value.clone());
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }

        Ok(page)
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.inner.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.inner.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Copies objects from a source document into a target document, following
/// references. Each source object is copied at most once per target, so
/// resources shared between pages stay shared.
struct ObjectCopier<'a> {
    source: &'a Document,
    /// References to these ids become `null` unless already mapped
    page_tree: &'a HashSet<ObjectId>,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, page_tree: &'a HashSet<ObjectId>) -> Self {
        Self {
            source,
            page_tree,
            copied: HashMap::new(),
        }
    }

    /// Resolve future references to `source_id` to `target_id`.
    fn map(&mut self, source_id: ObjectId, target_id: ObjectId) {
        self.copied.insert(source_id, target_id);
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy_object(target, value));
        }
        copy
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(target, &stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&copied) = self.copied.get(&id) {
            return Object::Reference(copied);
        }
        // Links and annotations may point at other pages; those must not drag
        // the rest of the source document along.
        if self.page_tree.contains(&id) {
            return Object::Null;
        }

        let source = self.source;
        let referenced = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Dropping unresolvable reference");
                return Object::Null;
            }
        };

        // Reserve the id first so reference cycles resolve to it
        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);
        let copy = self.copy_object(target, referenced);
        target.objects.insert(new_id, copy);

        Object::Reference(new_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Page" || name == b"Pages"
        ),
        _ => false,
    }
}
