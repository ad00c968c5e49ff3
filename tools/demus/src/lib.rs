//! demus library
//!
//! Extraction pipeline shared by the `demus` binary and its tests.

pub mod pipeline;

pub use pipeline::{default_output_dir, read_buffer, run, ExtractConfig, SampleFormat, Summary};

// Re-export the decoder types callers need to build a config
pub use mus_bank::Platform;
