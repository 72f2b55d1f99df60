use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};

use crate::reaper::{ReaperApi, RENDER_ACTION_ID};

pub const MP3_FORMAT_CODE: &str = "l3pm";
pub const WAV_FORMAT_CODE: &str = "evaw";

/// Map a format name to REAPER's render format code.
///
/// Only mp3 is recognised; every other name renders as wav.
pub fn format_code(format: &str) -> &'static str {
    if format == "mp3" {
        MP3_FORMAT_CODE
    } else {
        WAV_FORMAT_CODE
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub project_path: PathBuf,
    pub render_path: Option<PathBuf>,
    pub audio_format: String,
}

impl RenderRequest {
    pub fn new(project_path: impl Into<PathBuf>, render_path: Option<PathBuf>, audio_format: impl Into<String>) -> Self {
        Self { project_path: project_path.into(), render_path, audio_format: audio_format.into() }
    }

    /// Output path and the format it is rendered in.
    ///
    /// An explicit render path wins, and its extension (if any) overrides the
    /// requested format. Otherwise the project's extension is swapped for the format.
    pub fn resolve(&self) -> (PathBuf, String) {
        match &self.render_path {
            Some(p) => {
                let format = p
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.audio_format.clone());
                (p.clone(), format)
            }
            None => (self.project_path.with_extension(&self.audio_format), self.audio_format.clone()),
        }
    }
}

/// Point the project's render settings at the resolved path and trigger a render.
///
/// Returns once the render action call returns; the file may still be written
/// afterwards by REAPER.
pub fn render_project(api: &mut dyn ReaperApi, req: &RenderRequest) -> Result<PathBuf> {
    let (render_path, format) = req.resolve();

    let output_dir = render_path.parent().unwrap_or_else(|| Path::new(""));
    if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let file_name = render_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("render path {} has no file name", render_path.display()))?;
    let code = format_code(&format);

    log::info!("rendering {} as {} ({})", render_path.display(), format, code);
    api.set_project_info_string(0, "RENDER_FORMAT", code)?;
    api.set_project_info_string(0, "RENDER_FILE", &output_dir.to_string_lossy())?;
    api.set_project_info_string(0, "RENDER_PATTERN", &file_name)?;
    api.main_on_command(RENDER_ACTION_ID, 0)?;

    Ok(render_path)
}
