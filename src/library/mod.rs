use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ReaperNlpError;
use crate::prompt::ExampleTemplate;

/// One few-shot example: an instruction and the file holding its reference script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub instruction: String,
    pub answer_file: String,
}

impl Example {
    fn new(instruction: &str, answer_file: &str) -> Self {
        Self { instruction: instruction.into(), answer_file: answer_file.into() }
    }
}

pub const DEFAULT_EXAMPLES_DIR: &str = "assets/reaper_api_examples";

pub fn builtin_examples() -> Vec<Example> {
    vec![
        Example::new("Create a new track with the file '/Documents/reaper_material/vocals.wav'", "new_media_track.py"),
        Example::new("Mute the track at index 0", "mute_track_by_index.py"),
        Example::new("Mute all tracks", "mute_all_tracks.py"),
        Example::new("Solo the track at index 0", "solo_track_by_index.py"),
        Example::new("Mute the track with the name 'my_track_name'", "mute_track_by_name.py"),
        Example::new("Decrease the volume of the track at index 0 by 50%", "track_volume.py"),
        Example::new("Change panning of the track at index 0 to 50% left", "track_pan.py"),
        Example::new("Increase the volume of the master track by 100%", "master_volume.py"),
        Example::new("Change panning of the master track to 75% right", "master_pan.py"),
        Example::new(
            "For the track at index 0: add an equalization (EQ) with three bands:\n\
             -A hipass filter: frequency 100 Hz, gain +6 dB, bandwidth 1.0 oct\n\
             -A loshelf filter: frequency 1000 Hz, gain -3 dB, bandwidth 1.0 oct\n\
             -A band filter: frequency 8000 Hz, gain +2 dB, bandwidth 1.0 oct",
            "track_eq.py",
        ),
        Example::new("Disable the first bandpass filter on the track at index 0", "track_eq_disable_band.py"),
        Example::new("Disable the equalizer of the track at index 0", "track_eq_disable.py"),
        Example::new("Remove the EQ of the track at index 0", "track_eq_remove.py"),
    ]
}

/// An ordered example list plus the directory its answer files live in.
#[derive(Debug, Clone)]
pub struct Library {
    pub dir: PathBuf,
    pub examples: Vec<Example>,
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(rename = "example", default)]
    examples: Vec<Example>,
}

impl Library {
    pub fn builtin(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), examples: builtin_examples() }
    }

    /// Load a `[[example]]` TOML manifest; answer files resolve next to it.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let manifest: Manifest = toml::from_str(&text)
            .with_context(|| format!("parsing example manifest {}", path.display()))?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { dir, examples: manifest.examples })
    }

    /// Pair every instruction with its reference code, in list order.
    pub fn load(&self) -> Result<Vec<(String, String)>, ReaperNlpError> {
        self.examples
            .iter()
            .map(|ex| {
                let path = self.dir.join(&ex.answer_file);
                fs::read_to_string(&path)
                    .map(|code| (ex.instruction.clone(), code))
                    .map_err(|source| ReaperNlpError::Example { path, source })
            })
            .collect()
    }

    pub fn build_block(&self, template: &ExampleTemplate) -> Result<String> {
        let loaded = self.load()?;
        let rendered = loaded
            .iter()
            .map(|(instruction, code)| template.render(instruction, code))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("built examples block from {} example(s) in {}", rendered.len(), self.dir.display());
        Ok(rendered.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib_with(files: &[(&str, &str, &str)]) -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        let mut examples = Vec::new();
        for (instruction, file, code) in files {
            std::fs::write(dir.path().join(file), code).unwrap();
            examples.push(Example::new(instruction, file));
        }
        let lib = Library { dir: dir.path().to_path_buf(), examples };
        (dir, lib)
    }

    #[test]
    fn block_preserves_order_and_uniqueness() {
        let (_dir, lib) = lib_with(&[
            ("second", "b.py", "code_b"),
            ("first", "a.py", "code_a"),
            ("third", "c.py", "code_c"),
        ]);
        let block = lib.build_block(&ExampleTemplate::builtin()).unwrap();

        let pos = |s: &str| block.find(s).unwrap();
        assert!(pos("Instruction: second") < pos("Instruction: first"));
        assert!(pos("Instruction: first") < pos("Instruction: third"));
        for s in ["code_a", "code_b", "code_c", "Instruction: first"] {
            assert_eq!(block.matches(s).count(), 1);
        }
        assert_eq!(block.matches("\n\nHere is an example:").count(), 2);
        assert!(block.contains("Output:\ncode_b\n\nHere is an example:\nInstruction: first"));
    }

    #[test]
    fn reference_code_is_verbatim() {
        let code = "  x = 1\n\n# trailing\n";
        let (_dir, lib) = lib_with(&[("keep", "k.py", code)]);
        assert_eq!(lib.load().unwrap(), vec![("keep".to_string(), code.to_string())]);
    }

    #[test]
    fn unreadable_file_fails_the_whole_build() {
        let (_dir, mut lib) = lib_with(&[("ok", "ok.py", "pass")]);
        lib.examples.push(Example::new("missing", "missing.py"));
        let err = lib.build_block(&ExampleTemplate::builtin()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReaperNlpError>(), Some(ReaperNlpError::Example { .. })));
    }

    #[test]
    fn manifest_resolves_files_relative_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.py"), "RPR.Undo_BeginBlock()").unwrap();
        let manifest = dir.path().join("examples.toml");
        std::fs::write(&manifest, "[[example]]\ninstruction = \"Do one\"\nanswer_file = \"one.py\"\n").unwrap();

        let lib = Library::from_manifest(&manifest).unwrap();
        assert_eq!(lib.dir, dir.path());
        assert_eq!(lib.load().unwrap(), vec![("Do one".to_string(), "RPR.Undo_BeginBlock()".to_string())]);
    }

    #[test]
    fn builtin_library_ships_every_answer_file() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_EXAMPLES_DIR);
        let lib = Library::builtin(dir);
        assert_eq!(lib.examples.len(), 13);
        assert_eq!(lib.load().unwrap().len(), 13);
    }

    #[test]
    fn builtin_eq_examples_use_reaeq_bandtypes() {
        // ReaScript bandtypes run from -1 (master gain) to 7 (parallel bandpass).
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_EXAMPLES_DIR);
        let re = regex::Regex::new(r"TrackFX_(?:SetEQParam|SetEQBandEnabled)\(track, fx, (-?\d+),").unwrap();
        let mut seen = 0;
        for (_, code) in Library::builtin(dir).load().unwrap() {
            assert!(!code.contains("BANDTYPE"));
            for caps in re.captures_iter(&code) {
                let bandtype: i32 = caps[1].parse().unwrap();
                assert!((-1..=7).contains(&bandtype), "bandtype {bandtype} out of range");
                seen += 1;
            }
        }
        assert_eq!(seen, 10);
    }
}
