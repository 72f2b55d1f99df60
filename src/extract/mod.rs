use regex::Regex;
use std::sync::OnceLock;

pub const PYTHON_ANSWER_PATTERN: &str = r"(?s)```python\s*(.*?)\s*```";

fn python_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PYTHON_ANSWER_PATTERN).expect("static pattern"))
}

/// Return the body of the first ```` ```python ```` block, or `answer` untouched
/// when there is none. The result is not checked for being valid Python.
pub fn extract_python(answer: &str) -> &str {
    python_block_re()
        .captures(answer)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(answer)
}
