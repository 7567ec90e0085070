use std::collections::{BTreeMap, BTreeSet, VecDeque};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

/// Page attributes a page may take from an ancestor in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose `/Parent` chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// Copies pages out of a source document into fresh documents.
///
/// Only the page dictionaries and the objects they reach are copied.
/// Catalog-level data (outlines, attachments, forms, metadata) and other
/// pages are left behind; references to anything not copied become `null`.
pub struct PageExtractor<'a> {
    doc: &'a Document,
    pages: BTreeMap<u32, ObjectId>,
    page_ids: BTreeSet<ObjectId>,
}

impl<'a> PageExtractor<'a> {
    pub fn new(doc: &'a Document) -> Self {
        let pages = doc.get_pages();
        let page_ids = pages.values().copied().collect();
        Self {
            doc,
            pages,
            page_ids,
        }
    }

    /// Page numbers in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// Build a document holding `keep` (1-based page numbers) in original
    /// order. Unknown page numbers are ignored.
    pub fn extract(&self, keep: &[u32]) -> Document {
        let keep: BTreeSet<u32> = keep.iter().copied().collect();
        let selected: Vec<ObjectId> = self
            .pages
            .iter()
            .filter(|(number, _)| keep.contains(number))
            .map(|(_, id)| *id)
            .collect();

        let mut out = Document::with_version(self.doc.version.clone());
        out.max_id = self.doc.max_id;
        let pages_id = out.new_object_id();
        let catalog_id = out.new_object_id();

        let mut queue = VecDeque::new();
        for &page_id in &selected {
            let Ok(source) = self.doc.get_dictionary(page_id) else {
                continue;
            };
            let mut page = source.clone();
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = self.inherited(source, key) {
                        page.set(key, value.clone());
                    }
                }
            }
            page.remove(b"Parent");
            collect_references(&Object::Dictionary(page.clone()), &mut queue);
            page.set("Parent", pages_id);
            out.objects.insert(page_id, Object::Dictionary(page));
        }

        while let Some(id) = queue.pop_front() {
            if out.objects.contains_key(&id) || self.page_ids.contains(&id) {
                continue;
            }
            let Some(object) = self.doc.objects.get(&id) else {
                continue;
            };
            collect_references(object, &mut queue);
            out.objects.insert(id, object.clone());
        }

        let mut known: BTreeSet<ObjectId> = out.objects.keys().copied().collect();
        known.insert(pages_id);
        known.insert(catalog_id);
        for object in out.objects.values_mut() {
            null_dangling(object, &known);
        }

        let kids: Vec<Object> = selected
            .iter()
            .filter(|id| out.objects.contains_key(id))
            .map(|id| Object::Reference(*id))
            .collect();
        let count = kids.len() as i64;
        out.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        out.objects.insert(
            catalog_id,
            Object::Dictionary(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_id,
            }),
        );
        out.trailer.set("Root", catalog_id);
        out
    }

    fn inherited(&self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut node = page;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Some(value);
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

/// Queue every indirect reference inside `object`, except `/Parent` links.
fn collect_references(object: &Object, queue: &mut VecDeque<ObjectId>) {
    match object {
        Object::Reference(id) => queue.push_back(*id),
        Object::Array(items) => {
            for item in items {
                collect_references(item, queue);
            }
        }
        Object::Dictionary(dict) => collect_dictionary_references(dict, queue),
        Object::Stream(stream) => collect_dictionary_references(&stream.dict, queue),
        _ => {}
    }
}

fn collect_dictionary_references(dict: &Dictionary, queue: &mut VecDeque<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            collect_references(value, queue);
        }
    }
}

fn null_dangling(object: &mut Object, known: &BTreeSet<ObjectId>) {
    match object {
        Object::Reference(id) if !known.contains(id) => *object = Object::Null,
        Object::Array(items) => {
            for item in items.iter_mut() {
                null_dangling(item, known);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                null_dangling(value, known);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                null_dangling(value, known);
            }
        }
        _ => {}
    }
}
