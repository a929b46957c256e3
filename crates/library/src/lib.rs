//! Publication views for the library screens.
//!
//! The library database only stores a [`DocumentRecord`] per publication. To
//! show it, the full manifest is materialized through the
//! [`folio_cache::Materializer`] and flattened, together with the record and
//! the last reading position, into a [`ViewRecord`].
//!
//! [`Library`] wires the pieces together from a [`folio_config::Config`].

mod convert;
mod document;
pub mod error;
mod library;
pub mod reading;
mod view;

pub use crate::convert::ViewConverter;
pub use crate::document::{CoverFile, CustomCover, DocumentRecord, LcpInfo};
pub use crate::library::Library;
pub use crate::reading::{ReaderRegistry, ReadingState};
pub use crate::view::{CoverView, UNTITLED, ViewRecord};
