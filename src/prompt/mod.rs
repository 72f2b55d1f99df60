use anyhow::{Context, Result};
use fs_err as fs;
use std::path::Path;

use crate::template::Template;

pub const PROMPT_FIELDS: [&str; 4] = ["rpp_content", "examples", "instruction", "rpp_path"];
pub const EXAMPLE_FIELDS: [&str; 2] = ["instruction", "answer_code"];

fn builtin_prompt() -> &'static str {
r#"######## START OF RPP FILE ########
{rpp_content}
######## END OF RPP FILE ########

You are a code co-pilot, writing Python code to controll the digital audio workstation Reaper through its Python API.
Given the existing (potientially empty) Reaper project in the RPP file above, write Python code that edits the Reaper project according to the instruction below.
A Reaper Python API method `method_name` can be called with this line of code: `RPR.method_name` (see examples below).
Output code according to the examples below.
Output nothing else than the Python code.

{examples}

INSTRUCTION: {instruction}
RPP PROJECT PATH: {rpp_path}"#
}

fn builtin_example() -> &'static str {
r#"Here is an example:
Instruction: {instruction}
RPP project path: /Documents/my_reaper_projects/my_reaper_project.RPP
Output:
{answer_code}"#
}

/// The four-slot prompt sent to the LLM.
#[derive(Debug, Clone)]
pub struct PromptTemplate(Template);

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Ok(Self(Template::new(text, &PROMPT_FIELDS)?))
    }

    pub fn builtin() -> Self {
        Self(Template::new(builtin_prompt(), &PROMPT_FIELDS).expect("built-in prompt template is valid"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::new(text).with_context(|| format!("invalid prompt template {}", path.display()))
    }

    pub fn render(&self, rpp_content: &str, examples: &str, instruction: &str, rpp_path: &str) -> Result<String> {
        Ok(self.0.render(&[
            ("rpp_content", rpp_content),
            ("examples", examples),
            ("instruction", instruction),
            ("rpp_path", rpp_path),
        ])?)
    }
}

/// Layout of one few-shot example inside the examples block.
#[derive(Debug, Clone)]
pub struct ExampleTemplate(Template);

impl ExampleTemplate {
    pub fn builtin() -> Self {
        Self(Template::new(builtin_example(), &EXAMPLE_FIELDS).expect("built-in example template is valid"))
    }

    pub fn render(&self, instruction: &str, answer_code: &str) -> Result<String> {
        Ok(self.0.render(&[("instruction", instruction), ("answer_code", answer_code)])?)
    }
}

/// Read the project file and substitute it, with the other three slots, into `template`.
pub fn build_prompt(template: &PromptTemplate, rpp_path: &Path, examples: &str, instruction: &str) -> Result<String> {
    let rpp_content = fs::read_to_string(rpp_path)?;
    template.render(&rpp_content, examples, instruction, &rpp_path.display().to_string())
}
