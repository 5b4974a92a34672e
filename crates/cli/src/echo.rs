use owo_colors::OwoColorize;

use alchemize_core::ExtractedContent;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Alchemize".bold().bright_magenta(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Turn web pages into annotated Markdown notes\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{step}/{total}]").dimmed(), message.bright_cyan());
}

/// Print a labelled detail line under the current step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{label}:").dimmed(), value.bright_white());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Summary of what the extractor produced
pub fn print_content_details(content: &ExtractedContent) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Note Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_detail("Title", &content.title);
    if let Some(extractor) = content.metadata_text("extractor") {
        print_detail("Extractor", extractor);
    }
    if !content.tags.is_empty() {
        print_detail("Tags", &content.tags.join(", "));
    }
    let diagrams = content.images.iter().filter(|image| image.is_diagram).count();
    print_detail("Images", &format!("{} ({diagrams} diagrams)", content.images.len()));
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
