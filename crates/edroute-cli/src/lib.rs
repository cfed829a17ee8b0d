//! edroute CLI library.
//!
//! Rendering, terminal and clipboard helpers shared by the `edroute` binary's
//! subcommands.

pub mod clipboard;
pub mod output;
pub mod terminal;
