//! Core building blocks: the tagged value model, the ordered properties
//! record, and one validated builder per treatment kind. These are pure
//! in-memory primitives consumed by the high-level `api` module; nothing in
//! here touches the filesystem.
pub mod builder;
pub mod record;
