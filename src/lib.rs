//! dat-i18n
//!
//! `.dat` 形式の翻訳ファイルをベース言語と同期させるツール

pub mod config;
pub mod domain;
pub mod error;
pub mod input;
pub mod ir;
pub mod merge;
pub mod update;
pub mod verify;

pub use error::JobError;
pub use update::UpdateJob;
pub use verify::VerifyJob;
