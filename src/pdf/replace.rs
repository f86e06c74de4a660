//! Page replacement engine using lopdf
//!
//! Consumes a finalized `ReplacementPlan` and produces the output document.
//! This is where the deferred half of plan validation happens: positions are
//! checked against the real base page count, and explicit ranges against the
//! real source page counts, only once the documents are loaded.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::plan::{ReplacementEntry, ReplacementPlan};
use crate::ranges::PageSelection;

/// Pages of one entry resolved against the loaded documents
///
/// The displaced span is expressed in the original base numbering. `span_end`
/// may run past the last base page, in which case the remaining tail of the
/// base is consumed.
struct ResolvedEntry {
    span_start: u32,
    span_end: u32,
    source_pages: Vec<ObjectId>,
}

/// Apply a replacement plan and save the resulting document
///
/// Entries are validated in plan order. Each entry displaces as many base
/// pages as it selects from its source, starting at its insertion position;
/// two entries whose displaced spans overlap are rejected with
/// `Error::ReplaceConflict` rather than applied in some guessed order.
///
/// # Example
///
/// ```no_run
/// use pdf_repage::plan::ReplacementPlan;
/// use pdf_repage::ranges::PageSelection;
/// use pdf_repage::pdf::replace_pages;
/// use std::path::Path;
///
/// let mut plan = ReplacementPlan::new(Path::new("base.pdf"));
/// plan.add_replacement(
///     Path::new("chapter2.pdf"),
///     PageSelection::parse("1-3,4").unwrap(),
///     1,
/// ).unwrap();
/// replace_pages(&plan, Path::new("updated.pdf")).expect("Failed to replace pages");
/// ```
pub fn replace_pages(plan: &ReplacementPlan, output_path: &Path) -> Result<()> {
    if plan.is_empty() {
        return Err(Error::General("No replacement entries in plan".to_string()));
    }

    // Validate all input files exist before loading anything
    if !plan.base().exists() {
        return Err(Error::FileNotFound(plan.base().to_path_buf()));
    }
    for entry in plan.entries() {
        if !entry.source().exists() {
            return Err(Error::FileNotFound(entry.source().to_path_buf()));
        }
    }

    info!(
        "replacing pages in {} ({} entries)",
        plan.base().display(),
        plan.len()
    );

    // Load the base document and renumber it into the shared id space
    let mut max_id = 1;
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    let mut base_doc = Document::load(plan.base())?;
    base_doc.renumber_objects_with(max_id);
    max_id = base_doc.max_id + 1;

    let base_pages: Vec<ObjectId> = base_doc.get_pages().into_values().collect();
    if base_pages.is_empty() {
        return Err(Error::EmptyPdf(plan.base().to_path_buf()));
    }
    let base_count = base_pages.len();
    objects.extend(base_doc.objects);

    // Load each source in plan order, resolve its pages and displaced span
    let mut resolved: Vec<ResolvedEntry> = Vec::new();
    for entry in plan.entries() {
        let mut doc = Document::load(entry.source())?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(Error::EmptyPdf(entry.source().to_path_buf()));
        }

        if entry.position() as usize > base_count {
            return Err(Error::ReplaceOutOfBounds {
                position: entry.position(),
                page_count: base_count,
                base: plan.base().to_path_buf(),
            });
        }

        let source_pages = select_source_pages(entry, &pages)?;
        objects.extend(doc.objects);

        if source_pages.is_empty() {
            // A selection with no ranges displaces nothing and inserts nothing
            debug!("entry for {} selects no pages, skipping", entry.source().display());
            continue;
        }

        let span_start = entry.position();
        let span_end = span_start + source_pages.len() as u32 - 1;
        debug!(
            "{}: {} pages replacing base pages {}-{}",
            entry.source().display(),
            source_pages.len(),
            span_start,
            span_end.min(base_count as u32)
        );

        resolved.push(ResolvedEntry {
            span_start,
            span_end,
            source_pages,
        });
    }

    // Displaced spans are interpreted against the original base numbering,
    // so any overlap between two entries is a contradiction, not a sequence
    for i in 0..resolved.len() {
        for j in (i + 1)..resolved.len() {
            let (a, b) = (&resolved[i], &resolved[j]);
            if a.span_start <= b.span_end && b.span_start <= a.span_end {
                return Err(Error::ReplaceConflict(
                    a.span_start,
                    a.span_end,
                    b.span_start,
                    b.span_end,
                ));
            }
        }
    }

    // Walk the original base pages, swapping in source pages at span starts
    // and dropping pages inside a displaced span
    let mut span_starts: BTreeMap<u32, usize> = BTreeMap::new();
    for (idx, r) in resolved.iter().enumerate() {
        span_starts.insert(r.span_start, idx);
    }

    let mut final_pages: Vec<ObjectId> = Vec::new();
    for (i, &page_id) in base_pages.iter().enumerate() {
        let page_num = (i + 1) as u32;

        if let Some(&idx) = span_starts.get(&page_num) {
            final_pages.extend(resolved[idx].source_pages.iter().copied());
        }

        let displaced = resolved
            .iter()
            .any(|r| r.span_start <= page_num && page_num <= r.span_end);
        if !displaced {
            final_pages.push(page_id);
        }
    }

    // Assemble the output document around the substituted page list
    let mut out_doc = Document::with_version("1.5");
    out_doc.objects.extend(objects);

    // new_object_id() must not collide with the ids we just imported
    out_doc.max_id = max_id - 1;

    let pages_id = out_doc.new_object_id();

    let kids: Vec<Object> = final_pages
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(final_pages.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = out_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    out_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    out_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    out_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Re-parent every page onto the new Pages node
    for &page_id in &final_pages {
        if let Ok(page_object) = out_doc.get_object_mut(page_id) {
            if let Object::Dictionary(ref mut dict) = page_object {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    out_doc.compress();
    out_doc.save(output_path)?;

    info!(
        "wrote {} ({} pages)",
        output_path.display(),
        final_pages.len()
    );

    Ok(())
}

/// Resolve an entry's selection to concrete page object ids
///
/// `pages` holds the source document's page ids in page order. Explicit ranges
/// must fit within the source; a whole-document selection takes every page.
fn select_source_pages(entry: &ReplacementEntry, pages: &[ObjectId]) -> Result<Vec<ObjectId>> {
    match entry.selection() {
        PageSelection::WholeDocument => Ok(pages.to_vec()),
        PageSelection::Ranges(set) => {
            let mut selected = Vec::with_capacity(set.total_page_count());
            for range in set.ranges() {
                if range.end() as usize > pages.len() {
                    return Err(Error::SourcePageOutOfRange {
                        page: range.end(),
                        page_count: pages.len(),
                        source_path: entry.source().to_path_buf(),
                    });
                }
                for page in range.start()..=range.end() {
                    selected.push(pages[(page - 1) as usize]);
                }
            }
            Ok(selected)
        }
    }
}
