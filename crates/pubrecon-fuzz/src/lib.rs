//! Fuzzing library for pubrecon.
//!
//! The targets feed arbitrary bytes to the Symplectic and arXiv feed
//! parsers and to filter validation. None of them may panic.
//!
//! # Usage
//!
//! ```bash
//! cd crates/pubrecon-fuzz
//! cargo +nightly fuzz run fuzz_arxiv_feed -- -max_total_time=60
//! ```

pub use pubrecon::{models, sources};
