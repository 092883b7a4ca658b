//! Backends module - File system integrations
//!
//! Provides:
//! - ignore_rules: Layered ignore patterns compiled with globset
//! - discover: Eligible-file enumeration with the ignore walker
//! - workspace: Text access used by the rebuild
//! - watch: notify-based watching and the watch command

pub mod discover;
pub mod ignore_rules;
pub mod watch;
pub mod workspace;
