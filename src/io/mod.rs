pub mod fs;

pub use fs::{read_bytes, write_atomic};
