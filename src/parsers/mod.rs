//! JSONL transcript decoding.
//!
//! # Error Handling Strategy
//!
//! Transcript files are produced by an external writer and may be partially
//! written or corrupted mid-session, so decoding degrades gracefully:
//!
//! - **Individual line failures**: malformed JSON or message-less records
//!   are skipped (logged at debug), never failing the file.
//! - **Field-level leniency**: a missing role defaults to "unknown", an
//!   unparseable timestamp is simply left unset.
//! - **File-level failures**: only I/O and encoding errors surface as
//!   `Err`, and every caller treats such a session as skippable rather
//!   than aborting the operation that found it.

pub mod transcript;

pub use transcript::{parse_line, parse_transcript_file};
