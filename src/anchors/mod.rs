//! Anchors module - Scan, index and resolve anchors
//!
//! Anchors are named locations declared inside comments or markdown.
//! Format: [[id|label]] declares an anchor, [[#id|label]] links to it.

pub mod api;
pub mod index;
pub mod kind;
pub mod lint;
pub mod resolve;
pub mod scan;
pub mod syntax;
pub mod zones;
