use anyhow::Result;

use crate::exec::ScriptRunner;

/// "File: Render project, using the most recent render settings".
pub const RENDER_ACTION_ID: i32 = 41824;

/// The slice of the REAPER API this crate drives directly.
pub trait ReaperApi {
    fn get_project_info_string(&mut self, project: i32, key: &str) -> Result<String>;
    fn set_project_info_string(&mut self, project: i32, key: &str, value: &str) -> Result<()>;
    fn main_on_command(&mut self, action: i32, flag: i32) -> Result<()>;
}

/// Issues ReaScript calls through reapy by running one-line scripts.
pub struct ReapyApi<R> {
    runner: R,
}

impl<R: ScriptRunner> ReapyApi<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

/// A quoted Python string literal. JSON string syntax is a subset of it.
fn py_str(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

impl<R: ScriptRunner> ReaperApi for ReapyApi<R> {
    fn get_project_info_string(&mut self, project: i32, key: &str) -> Result<String> {
        let code = format!("print(RPR.GetSetProjectInfo_String({project}, {}, \"\", False)[3])", py_str(key));
        let out = self.runner.run(&code)?;
        Ok(out.stdout.trim_end_matches(['\r', '\n']).to_string())
    }

    fn set_project_info_string(&mut self, project: i32, key: &str, value: &str) -> Result<()> {
        let code = format!(
            "RPR.GetSetProjectInfo_String({project}, {}, {}, True)",
            py_str(key),
            py_str(value)
        );
        self.runner.run(&code)?;
        Ok(())
    }

    fn main_on_command(&mut self, action: i32, flag: i32) -> Result<()> {
        self.runner.run(&format!("RPR.Main_OnCommand({action}, {flag})"))?;
        Ok(())
    }
}
