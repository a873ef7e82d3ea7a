//! In-memory representation of translation data
pub mod dataset;

pub use dataset::{
    Dataset,
    DatasetError,
    Entry,
    Section,
};
