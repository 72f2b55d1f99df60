use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::exec::ScriptRunner;
use crate::extract::extract_python;
use crate::library::{Library, DEFAULT_EXAMPLES_DIR};
use crate::prompt::{build_prompt, ExampleTemplate, PromptTemplate};
use crate::provider::Provider;
use crate::reaper::ReaperApi;
use crate::render::{render_project, RenderRequest};

/// Optional knobs of [`nl_reaper_command`]; unset fields fall back to the built-ins.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    pub audio_format: String,
    pub post_process: bool,
    /// Pre-built examples block. Built from the built-in library when `None` or empty.
    pub examples: Option<String>,
    pub prompt_template: Option<PromptTemplate>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            audio_format: "mp3".into(),
            post_process: false,
            examples: None,
            prompt_template: None,
        }
    }
}

/// Receives the intermediate texts of a run. Returning an error aborts the
/// run before the next step.
pub trait Observer {
    fn prompt(&mut self, _prompt: &str) -> Result<()> {
        Ok(())
    }
    fn response(&mut self, _response: &str) -> Result<()> {
        Ok(())
    }
    fn script(&mut self, _script: &str) -> Result<()> {
        Ok(())
    }
}

pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Built-in examples block, read from `assets/reaper_api_examples` next to the crate.
pub fn builtin_examples_block() -> Result<String> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_EXAMPLES_DIR);
    Library::builtin(dir).build_block(&ExampleTemplate::builtin())
}

/// Apply a natural-language instruction to a REAPER project and render it.
///
/// Every step runs in order and any failure is returned as-is; nothing is
/// retried or rolled back. Returns the path the render was pointed at.
pub async fn nl_reaper_command(
    rpp_path: &Path,
    instruction: &str,
    render_path: Option<&Path>,
    llm: &dyn Provider,
    runner: &dyn ScriptRunner,
    api: &mut dyn ReaperApi,
    options: CommandOptions,
) -> Result<PathBuf> {
    run_observed(rpp_path, instruction, render_path, llm, runner, api, options, &mut NoopObserver).await
}

#[allow(clippy::too_many_arguments)]
pub async fn run_observed(
    rpp_path: &Path,
    instruction: &str,
    render_path: Option<&Path>,
    llm: &dyn Provider,
    runner: &dyn ScriptRunner,
    api: &mut dyn ReaperApi,
    options: CommandOptions,
    observer: &mut dyn Observer,
) -> Result<PathBuf> {
    let examples = match options.examples {
        Some(e) if !e.is_empty() => e,
        _ => builtin_examples_block()?,
    };
    let template = options.prompt_template.unwrap_or_else(PromptTemplate::builtin);

    let prompt = build_prompt(&template, rpp_path, &examples, instruction)?;
    log::info!("prompt assembled for {} ({} bytes)", rpp_path.display(), prompt.len());
    observer.prompt(&prompt)?;

    let answer = llm.complete(&prompt).await?;
    observer.response(&answer)?;

    let code = if options.post_process { extract_python(&answer) } else { answer.as_str() };
    observer.script(code)?;

    let out = runner.run(code)?;
    log::info!("generated script finished in {}ms", out.duration_ms);
    if !out.stdout.trim().is_empty() {
        log::debug!("script stdout:\n{}", out.stdout);
    }

    let req = RenderRequest::new(rpp_path, render_path.map(Path::to_path_buf), options.audio_format);
    render_project(api, &req)
}
