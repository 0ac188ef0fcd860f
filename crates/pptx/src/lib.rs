//! PPTX (Office Open XML) translation pipeline.
//!
//! Walks the entries of a .pptx ZIP archive, translates the text runs of slide
//! and notes parts, and copies every other entry through untouched.

pub mod filter;
pub mod pipeline;

pub use filter::EntryFilter;
pub use pipeline::{DocumentPipeline, EntryOutcome, PassthroughReason, PipelineReport};
