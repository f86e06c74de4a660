//! PDF Repage Library
//!
//! A cross-platform library for replacing page ranges in a PDF and extracting
//! document properties. This library provides functionality to:
//! - Select pages of a source PDF by ranges or as a whole document
//! - Plan replacements of base-document pages by pages from other PDFs
//! - Apply a replacement plan and save the resulting document
//! - Extract document properties (page count, version, info fields) as JSON
//!
//! # Example
//!
//! ```no_run
//! use pdf_repage::plan::ReplacementPlan;
//! use pdf_repage::ranges::PageSelection;
//! use pdf_repage::pdf::replace_pages;
//! use std::path::Path;
//!
//! let mut plan = ReplacementPlan::new(Path::new("base.pdf"));
//!
//! // Pages 1-3 and 4 of the first source replace base pages starting at page 1
//! plan.add_replacement(
//!     Path::new("chapter2.pdf"),
//!     PageSelection::parse("1-3,4").unwrap(),
//!     1,
//! ).unwrap();
//!
//! // Every page of the second source replaces base pages starting at page 6
//! plan.add_replacement(Path::new("appendix.pdf"), PageSelection::WholeDocument, 6).unwrap();
//!
//! replace_pages(&plan, Path::new("updated.pdf")).expect("Failed to replace pages");
//! ```

pub mod error;
pub mod pdf;
pub mod plan;
pub mod ranges;

// Re-export commonly used items
pub use error::{Error, Result};
