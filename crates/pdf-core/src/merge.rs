//! Overlay of a content page onto a background template page
//!
//! The content page is converted into a Form XObject inside the template
//! document and drawn after the template's own content, so the template can
//! never obscure it. The template's existing content is wrapped in `q`/`Q`
//! so any graphics state it leaves behind does not affect the overlay.

use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Resource name the overlay Form XObject is registered under
const OVERLAY_NAME: &str = "PayslipContent";

/// Copies objects (and everything they reference) between documents
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Deep copy an indirect object, returning its id in the target document
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so reference cycles terminate
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;
        self.target.objects.insert(new_id, new_obj);

        Ok(new_id)
    }

    /// Replace every reference inside `obj` with a reference to a copied object
    fn remap_references(&mut self, obj: Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => Ok(Object::Array(
                arr.into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dictionary(dict)?)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dictionary(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    fn remap_dictionary(&mut self, mut dict: Dictionary) -> Result<Dictionary> {
        for (_, value) in dict.iter_mut() {
            *value = self.remap_references(value.clone())?;
        }
        Ok(dict)
    }
}

/// Serialize a document to PDF bytes
pub fn document_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(buffer)
}

/// Get the object id of page 1, failing when the document has no pages
fn first_page_id(doc: &Document) -> Result<ObjectId> {
    let pages = doc.get_pages();
    pages
        .get(&1)
        .copied()
        .ok_or(PdfError::EmptyDocument)
}

/// Look up a page attribute, following the Parent chain for inherited values
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut current_id = page_id;

    // Follow parent chain up to 10 levels (safety limit)
    for _ in 0..10 {
        let dict = doc
            .get_object(current_id)?
            .as_dict()
            .map_err(|_| PdfError::Malformed("Object is not a dictionary".to_string()))?;

        if let Ok(value) = dict.get(key) {
            let resolved = match value {
                Object::Reference(id) => doc.get_object(*id)?.clone(),
                other => other.clone(),
            };
            return Ok(Some(resolved));
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current_id = *parent_id,
            _ => break,
        }
    }

    Ok(None)
}

fn number(obj: &Object) -> Result<f64> {
    obj.as_f32()
        .map(|v| v as f64)
        .ok()
        .or_else(|| obj.as_i64().ok().map(|v| v as f64))
        .ok_or_else(|| PdfError::Malformed("Invalid MediaBox entry".to_string()))
}

/// Media box of page 1 as `[x1, y1, x2, y2]`
fn first_page_media_box(doc: &Document) -> Result<[f64; 4]> {
    let page_id = first_page_id(doc)?;
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .ok_or_else(|| PdfError::Malformed("Page has no MediaBox".to_string()))?;
    let values = media_box
        .as_array()
        .map_err(|_| PdfError::Malformed("MediaBox is not an array".to_string()))?;

    if values.len() < 4 {
        return Err(PdfError::Malformed("Invalid MediaBox format".to_string()));
    }

    Ok([
        number(&values[0])?,
        number(&values[1])?,
        number(&values[2])?,
        number(&values[3])?,
    ])
}

/// Width and height in points of the first page
pub fn first_page_size(doc: &Document) -> Result<(f64, f64)> {
    let [x1, y1, x2, y2] = first_page_media_box(doc)?;
    Ok((x2 - x1, y2 - y1))
}

/// Concatenated (decompressed) content of a page
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = doc
        .get_object(page_id)?
        .as_dict()
        .map_err(|_| PdfError::Malformed("Page object is not a dictionary".to_string()))?;

    let stream_bytes = |stream: &Stream| {
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    };

    let content = match page.get(b"Contents") {
        Ok(Object::Stream(stream)) => stream_bytes(stream),
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Stream(stream) => stream_bytes(stream),
            Object::Array(arr) => concat_streams(doc, arr, &stream_bytes),
            _ => Vec::new(),
        },
        Ok(Object::Array(arr)) => concat_streams(doc, arr, &stream_bytes),
        _ => Vec::new(),
    };

    Ok(content)
}

fn concat_streams(
    doc: &Document,
    arr: &[Object],
    stream_bytes: &dyn Fn(&Stream) -> Vec<u8>,
) -> Vec<u8> {
    let mut combined = Vec::new();
    for obj in arr {
        match obj {
            Object::Reference(id) => {
                if let Ok(Object::Stream(stream)) = doc.get_object(*id) {
                    combined.extend_from_slice(&stream_bytes(stream));
                    combined.push(b'\n');
                }
            }
            Object::Stream(stream) => {
                combined.extend_from_slice(&stream_bytes(stream));
                combined.push(b'\n');
            }
            _ => {}
        }
    }
    combined
}

/// The page's content streams as a flat list of entries
///
/// `/Contents` may be a stream, an array of streams, or a reference to
/// either; a referenced array is expanded so it is never nested.
fn content_entries(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc
        .get_object(page_id)?
        .as_dict()
        .map_err(|_| PdfError::Malformed("Page object is not a dictionary".to_string()))?;

    let entries = match page.get(b"Contents") {
        Ok(Object::Array(arr)) => arr.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(arr)) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(other) => vec![other.clone()],
        Err(_) => Vec::new(),
    };
    Ok(entries)
}

/// Overlay page 1 of `content` on top of page 1 of `template`
///
/// The template is modified in place. Only the first page of either
/// document is used; both are expected to have the same page size.
///
/// # Errors
/// Returns [`PdfError::EmptyDocument`] when either document has no pages.
pub fn overlay_page(template: &mut Document, content: &Document) -> Result<()> {
    let content_page_id = first_page_id(content)?;
    let template_page_id = first_page_id(template)?;

    // 1. Turn the content page into a Form XObject in the template document
    let [x1, y1, x2, y2] = first_page_media_box(content)?;
    let content_bytes = page_content(content, content_page_id)?;
    let content_resources = inherited_attribute(content, content_page_id, b"Resources")?
        .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

    let resources = {
        let mut copier = ObjectCopier::new(content, template);
        copier.remap_references(content_resources)?
    };

    let mut form_dict = Dictionary::new();
    form_dict.set("Type", Object::Name(b"XObject".to_vec()));
    form_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    form_dict.set(
        "BBox",
        Object::Array(vec![
            (x1 as f32).into(),
            (y1 as f32).into(),
            (x2 as f32).into(),
            (y2 as f32).into(),
        ]),
    );
    form_dict.set("Resources", resources);
    let form_id = template.add_object(Stream::new(form_dict, content_bytes));

    // 2. Register the form in the template page's resources
    let mut page_resources = match inherited_attribute(template, template_page_id, b"Resources")? {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };
    let mut xobjects = match page_resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => template
            .get_object(*id)
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    };
    xobjects.set(OVERLAY_NAME, Object::Reference(form_id));
    page_resources.set("XObject", Object::Dictionary(xobjects));

    // 3. Wrap existing content in q/Q and draw the form last
    let open_id = template.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let close_id = template.add_object(Stream::new(
        Dictionary::new(),
        format!("Q\nq\n/{OVERLAY_NAME} Do\nQ\n").into_bytes(),
    ));

    let mut contents = vec![Object::Reference(open_id)];
    contents.extend(content_entries(template, template_page_id)?);
    contents.push(Object::Reference(close_id));

    let page = template
        .get_object_mut(template_page_id)?
        .as_dict_mut()
        .map_err(|_| PdfError::Malformed("Page object is not a dictionary".to_string()))?;

    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(page_resources));

    Ok(())
}
