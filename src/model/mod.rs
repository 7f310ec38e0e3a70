//! Data model for extracted pages and sections.

mod page;
mod section;

pub use page::{Line, Page};
pub use section::{Heading, Section, SectionRegistry, UNCLASSIFIED};
