//! Terminal output for the circom-proofs CLI, built on [`console`].

use console::style;

use circom_proofs_core::backend::PrerequisiteError;

/// Print a bold cyan header with an underline separator.
pub fn print_header(text: &str) {
    println!("\n{}", style(text).bold().cyan());
    println!("{}", style("=".repeat(text.len())).dim());
}

/// Print a success message prefixed with green `[OK]`.
pub fn print_success(text: &str) {
    println!("{} {}", style("[OK]").green().bold(), text);
}

/// Print a warning message prefixed with yellow `[WARN]`.
pub fn print_warning(text: &str) {
    println!("{} {}", style("[WARN]").yellow().bold(), text);
}

/// Print an error prefixed with red `[ERROR]` to stderr, folded onto one line.
pub fn print_error(text: &str) {
    let line = text.lines().collect::<Vec<_>>().join(" | ");
    eprintln!("{} {}", style("[ERROR]").red().bold(), line);
}

/// Print a failed check prefixed with red `[FAIL]`.
pub fn print_failure(text: &str) {
    println!("{} {}", style("[FAIL]").red().bold(), text);
}

/// Print a progress step indicator like `[1/2] Generating proof...`.
pub fn print_step(step: u32, total: u32, text: &str) {
    println!("{} {}", style(format!("[{step}/{total}]")).dim(), text);
}

/// Print a key-value pair with dimmed key formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Warn about every missing external tool. Never fails the command.
pub fn print_prerequisites(result: Result<(), Vec<PrerequisiteError>>) {
    if let Err(missing) = result {
        for m in &missing {
            print_warning(&format!(
                "{} not found. Install: {}",
                m.tool_name, m.install_instructions
            ));
        }
    }
}
