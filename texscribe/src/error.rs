//! Crate-level error type

use crate::builder::BuildError;
use crate::config::DocumentConfigError;
use crate::level::LevelError;
use crate::sink::SinkError;
use crate::writer::WriterError;
use thiserror::Error;

/// Any error raised by texscribe
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Build(#[from] BuildError),

    #[error("config file error: {0}")]
    Config(#[from] DocumentConfigError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
