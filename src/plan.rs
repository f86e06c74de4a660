//! Replacement planning
//!
//! A `ReplacementPlan` is a declarative, ordered list of "insert these pages
//! from this source at this position" instructions against one base document.
//! Positions always refer to the original base numbering; the execution step
//! owns any renumbering that replacements cause, since only it knows the real
//! page counts.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ranges::PageSelection;

/// One replacement instruction: pages from a source document to be inserted
/// at a position in the base document
#[derive(Debug, Clone)]
pub struct ReplacementEntry {
    source: PathBuf,
    selection: PageSelection,
    position: u32,
}

impl ReplacementEntry {
    /// Path of the source document supplying the pages
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Which pages to take from the source
    pub fn selection(&self) -> &PageSelection {
        &self.selection
    }

    /// 1-based page in the base document at which the replacement starts
    pub fn position(&self) -> u32 {
        self.position
    }
}

/// An ordered sequence of replacement instructions for one base document
///
/// Only local validation happens while the plan is built: positions must be
/// at least 1. Whether a position actually exists in the base document, and
/// whether the sources are readable, is checked when the plan is executed.
#[derive(Debug, Clone)]
pub struct ReplacementPlan {
    base: PathBuf,
    entries: Vec<ReplacementEntry>,
}

impl ReplacementPlan {
    /// Create an empty plan for the given base document
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Path of the base document whose pages are being replaced
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Append a replacement instruction
    ///
    /// The selection is taken by value: once handed to the plan it is frozen.
    /// Fails with `Error::InvalidPosition` when position < 1; previously added
    /// entries are retained.
    pub fn add_replacement(
        &mut self,
        source: &Path,
        selection: PageSelection,
        position: u32,
    ) -> Result<()> {
        if position < 1 {
            return Err(Error::InvalidPosition(position));
        }

        self.entries.push(ReplacementEntry {
            source: source.to_path_buf(),
            selection,
            position,
        });
        Ok(())
    }

    /// Iterate the entries in the exact order they were added
    ///
    /// Restartable and non-destructive: every call replays the same sequence.
    pub fn entries(&self) -> impl Iterator<Item = &ReplacementEntry> {
        self.entries.iter()
    }

    /// Number of entries in the plan
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries have been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
