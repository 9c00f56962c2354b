//! Text pipeline: HTML to plain text, section extraction and chunking

pub mod chunker;
pub mod html;
pub mod sections;

pub use chunker::RecursiveSplitter;
pub use html::html_to_text;
pub use sections::{SectionKind, SectionSpan, extract_section, locate_section};
