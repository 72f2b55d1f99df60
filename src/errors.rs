use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaperNlpError {
    #[error("provider error: {0}")] Provider(String),
    #[error("template error: {0}")] Template(String),
    #[error("example file {path:?} could not be read: {source}")]
    Example { path: PathBuf, source: std::io::Error },
    #[error("aborted by user")] Aborted,
    #[error("script failed with status {status}:\n{stderr}")]
    ScriptFailed { status: i32, stderr: String },
}
