//! Result assembly and output files
pub mod assembler;
pub mod writer;

pub use assembler::{
    Assembled,
    SessionSummary,
    assemble,
};
pub use writer::{
    OutputPaths,
    WriteError,
    WriteReport,
    ensure_output_dir,
    write_json_file,
    write_text_file,
};
