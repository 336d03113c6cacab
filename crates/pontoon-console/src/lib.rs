//! Terminal implementations of the pontoon display callbacks.
//!
//! This crate provides:
//! - `TermSpinner`: an animated progress spinner on a render thread
//! - `TermNotices`: colored one-line failure notices on stderr
//! - ANSI styling constants shared by both

pub mod notice;
pub mod spinner;
pub mod style;

pub use notice::TermNotices;
pub use spinner::TermSpinner;
