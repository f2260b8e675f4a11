use std::result;

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum FixError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("required table '{0}' not found")]
    MissingTable(&'static str),

    #[error("failed to build cmap table")]
    CmapBuildError,

    #[error("fixed font failed validation: {0}")]
    InvalidOutput(String),
}

pub type Result<T> = result::Result<T, FixError>;
