//! Translation file input and output
pub mod dat;

pub use dat::{
    DatError,
    SyntaxError,
    SyntaxErrorKind,
    load_dataset,
    parse_dataset,
    serialize_dataset,
    write_dataset,
};
