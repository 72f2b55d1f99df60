use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use indicatif::ProgressBar;
use std::path::Path;
use uuid::Uuid;

use reaper_nlp::artifacts::{ArtifactWriter, RunRecord};
use reaper_nlp::errors::ReaperNlpError;
use reaper_nlp::pipeline::{self, Observer};
use reaper_nlp::{cli, config, exec, library, prompt, provider, reaper, ux};

/// Saves artifacts, shows progress and asks before the script touches the project.
struct CliObserver<'a> {
    artifacts: ArtifactWriter,
    project: &'a Path,
    instruction: &'a str,
    auto_approve: bool,
    spinner: Option<ProgressBar>,
}

impl Observer for CliObserver<'_> {
    fn prompt(&mut self, prompt: &str) -> anyhow::Result<()> {
        self.artifacts.prompt(prompt)?;
        ux::print_run_header(self.project, self.instruction, prompt.len());
        self.spinner = Some(ux::waiting("waiting for the model"));
        Ok(())
    }

    fn response(&mut self, response: &str) -> anyhow::Result<()> {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
        self.artifacts.response(response)
    }

    fn script(&mut self, script: &str) -> anyhow::Result<()> {
        self.artifacts.script(script)?;
        ux::show_script(script);
        if !self.auto_approve && !ux::confirm("Run this script against the open REAPER project?") {
            return Err(ReaperNlpError::Aborted.into());
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let cfg = config::Config::resolve(&args)?;
    let txid = Uuid::new_v4();
    let started_at = Utc::now();
    log::debug!("run {} with {:?}/{}", txid, cfg.provider, cfg.model);

    let prov = provider::make_provider(cfg.provider, cfg.model.clone(), cfg.timeout_secs, cfg.ollama_url.clone())?;

    let examples = match &cfg.examples_manifest {
        Some(p) => Some(
            library::Library::from_manifest(Path::new(p))?
                .build_block(&prompt::ExampleTemplate::builtin())
                .with_context(|| format!("building examples from {}", p))?,
        ),
        None => None,
    };
    let prompt_template = cfg
        .prompt_template
        .as_deref()
        .map(|p| prompt::PromptTemplate::from_file(Path::new(p)))
        .transpose()?;

    let runner = exec::PythonRunner::locate(&cfg.python)?;
    let mut api = reaper::ReapyApi::new(runner.clone());

    let options = pipeline::CommandOptions {
        audio_format: cfg.audio_format.clone(),
        post_process: cfg.post_process,
        examples,
        prompt_template,
    };

    let project = Path::new(&args.project);
    let mut observer = CliObserver {
        artifacts: ArtifactWriter::new(Path::new(&cfg.artifacts_dir), txid, cfg.save_artifacts),
        project,
        instruction: &args.instruction,
        auto_approve: cfg.auto_approve,
        spinner: None,
    };

    let result = pipeline::run_observed(
        project,
        &args.instruction,
        args.render_path.as_deref().map(Path::new),
        &*prov,
        &runner,
        &mut api,
        options,
        &mut observer,
    )
    .await;

    if let Some(pb) = observer.spinner.take() {
        pb.finish_and_clear();
    }

    let render_path = match result {
        Ok(p) => p,
        Err(e) if matches!(e.downcast_ref::<ReaperNlpError>(), Some(ReaperNlpError::Aborted)) => {
            println!("Aborted by user.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    observer.artifacts.save_record(&RunRecord {
        tx: txid,
        started_at,
        project: args.project.clone(),
        instruction: args.instruction.clone(),
        provider: format!("{:?}", cfg.provider),
        model: cfg.model.clone(),
        render_path: Some(render_path.display().to_string()),
    })?;
    if cfg.save_artifacts {
        println!("artifacts: {}", observer.artifacts.dir().display());
    }

    ux::print_render_result(&render_path);
    Ok(())
}
