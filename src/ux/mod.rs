use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

/// Spinner shown while the model is answering.
pub fn waiting(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn show_script(code: &str) {
    println!("\n{}", "=== GENERATED SCRIPT ===".bold());
    println!("{}", indent(code, 2));
    println!();
}

pub fn print_run_header(project: &Path, instruction: &str, prompt_len: usize) {
    println!("{} {}", "[PROJECT]".cyan().bold(), project.display());
    println!("{} {}", "[INSTRUCTION]".cyan().bold(), instruction);
    println!("{} {}", "[PROMPT]".cyan().bold(), format_size(prompt_len, DECIMAL));
}

pub fn print_render_result(render_path: &Path) {
    println!(
        "\n{} render started: {}",
        "[RENDER]".green().bold(),
        render_path.display()
    );
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_every_line() {
        assert_eq!(indent("a\nb", 2), "  a\n  b");
    }
}
