//! MUS bank parser
//!
//! - `read` - Decoding the header and every table of a bank
//! - `tests` - Decoder tests against synthesized banks

mod read;


pub use read::{
    parse_bank, parse_header, parse_layer_table, parse_preset_table, parse_program_table,
    parse_sequence_table, parse_wave_table,
};
