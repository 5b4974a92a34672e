mod echo;

use std::fs;
use std::path::{Path, PathBuf};

use alchemize_core::{
    AlchemizeConfig, ContentKind, ExportMode, ExtractedContent, FetchConfig, OutputFormat,
    extract_html, fetch_file, fetch_stdin, fetch_url, import_markdown, note_file_name, preprocess_html,
    pipeline::registry_with_options,
};
use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    format_size, print_banner, print_content_details, print_detail, print_info, print_step, print_success,
    print_warning,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const TOTAL_STEPS: usize = 3;

/// Turn web pages, HTML files and Markdown into annotated Markdown notes
#[derive(Parser, Debug)]
#[command(name = "alchemize")]
#[command(version)]
#[command(about = "Turn web pages into annotated Markdown notes", long_about = None)]
struct Args {
    /// URL to fetch, local HTML/Markdown file, or "-" for stdin (default)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output file or directory (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format (markdown, json, html)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Export mode (reference, study, flashcards)
    #[arg(short, long, value_name = "MODE")]
    mode: Option<ExportMode>,

    /// Source URL recorded for file or stdin input
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Include the frontmatter block (Markdown only)
    #[arg(long, overrides_with = "no_frontmatter")]
    frontmatter: bool,

    /// Omit the frontmatter block
    #[arg(long, overrides_with = "frontmatter")]
    no_frontmatter: bool,

    /// Settings file (default: <config dir>/alchemize/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Disable automatic tagging
    #[arg(long)]
    no_tags: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command-line flags win over the settings file.
    fn merge_into(&self, mut config: AlchemizeConfig) -> AlchemizeConfig {
        if let Some(mode) = self.mode {
            config.export_mode = mode;
        }
        if self.no_tags {
            config.auto_tagging = false;
        }
        if self.frontmatter {
            config.include_frontmatter = true;
        } else if self.no_frontmatter {
            config.include_frontmatter = false;
        }
        config
    }

    fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent) }
    }
}

/// Raw input text plus the URL it came from, when known.
struct Input {
    text: String,
    source_url: Option<String>,
    fetched: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "alchemize_core=debug,alchemize=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AlchemizeConfig> {
    match path {
        Some(path) => AlchemizeConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display())),
        None => AlchemizeConfig::load_default().context("Failed to load default config"),
    }
}

async fn read_input(args: &Args) -> anyhow::Result<Input> {
    let text = match args.input.as_deref() {
        None | Some("-") => {
            if args.verbose {
                print_step(1, TOTAL_STEPS, "Reading from stdin");
            }
            fetch_stdin().context("Failed to read from stdin")?
        }
        Some(input) if ContentKind::detect(input) == ContentKind::Url => {
            return fetch_page(input, args).await;
        }
        Some(path) => {
            if args.verbose {
                print_step(1, TOTAL_STEPS, &format!("Reading from file {}", path.bright_white()));
            }
            fetch_file(path).with_context(|| format!("Failed to read file: {path}"))?
        }
    };

    if ContentKind::detect(&text) == ContentKind::Url {
        return fetch_page(text.trim(), args).await;
    }

    Ok(Input { text, source_url: args.url.clone(), fetched: false })
}

async fn fetch_page(url: &str, args: &Args) -> anyhow::Result<Input> {
    if args.verbose {
        print_step(1, TOTAL_STEPS, &format!("Fetching from {}", url.bright_white().underline()));
    }
    let text = fetch_url(url, &args.fetch_config()).await.with_context(|| format!("Failed to fetch URL: {url}"))?;

    Ok(Input { text, source_url: Some(args.url.clone().unwrap_or_else(|| url.to_string())), fetched: true })
}

fn build_content(input: &Input, config: &AlchemizeConfig) -> anyhow::Result<ExtractedContent> {
    let options = config.extract_options();

    let mut content = if input.fetched || ContentKind::detect(&input.text) == ContentKind::Html {
        let registry = registry_with_options(&options);
        extract_html(&input.text, input.source_url.as_deref(), &registry).context("Failed to extract content")?
    } else {
        let mut content = import_markdown(&input.text, &options);
        content.source_url = input.source_url.clone();
        content
    };

    content.add_tags(config.custom_tags.iter().cloned());
    Ok(content)
}

fn render_output(
    input: &Input, content: &ExtractedContent, format: OutputFormat, config: &AlchemizeConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Markdown => Ok(content.to_note(config.include_frontmatter)),
        OutputFormat::Json => content.to_json().context("Failed to serialize content"),
        OutputFormat::Html => {
            if content.metadata_text("extractor") == Some("markdown-import") {
                bail!("HTML output needs HTML input");
            }
            Ok(preprocess_html(&input.text, &Default::default()))
        }
    }
}

/// A directory target gets a file named from the configured template.
fn output_path(target: &Path, content: &ExtractedContent, format: OutputFormat, config: &AlchemizeConfig) -> PathBuf {
    if !target.is_dir() {
        return target.to_path_buf();
    }

    let name = note_file_name(&config.filename_template, &content.title, chrono::Local::now());
    let path = target.join(name);
    match format {
        OutputFormat::Markdown => path,
        OutputFormat::Json => path.with_extension("json"),
        OutputFormat::Html => path.with_extension("html"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = args.merge_into(load_config(args.config.as_deref())?);
    tracing::debug!(?config, "resolved settings");
    let input = read_input(&args).await?;

    if args.verbose {
        print_detail("Size", &format_size(input.text.len()));
        print_detail("Mode", config.export_mode.as_str());
        eprintln!();
        print_step(2, TOTAL_STEPS, "Extracting content");
    }

    if input.text.trim().is_empty() {
        bail!("Input is empty");
    }

    let content = build_content(&input, &config)?;

    if args.verbose {
        print_content_details(&content);
        print_step(3, TOTAL_STEPS, "Writing output");
    }
    if content.markdown.is_empty() {
        print_warning("No content could be extracted");
    }

    let output = render_output(&input, &content, args.format, &config)?;

    match &args.output {
        Some(target) => {
            let path = output_path(target, &content, args.format, &config);
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Note written to {}", path.display().bright_white()));
        }
        None => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("alchemize").chain(argv.iter().copied()))
    }

    #[test]
    fn test_flags_override_config() {
        let config = AlchemizeConfig { export_mode: ExportMode::Study, ..Default::default() };
        let merged = args(&["-m", "flashcards", "--no-tags", "--no-frontmatter"]).merge_into(config);

        assert_eq!(merged.export_mode, ExportMode::Flashcards);
        assert!(!merged.auto_tagging);
        assert!(!merged.include_frontmatter);
    }

    #[test]
    fn test_config_kept_without_flags() {
        let config = AlchemizeConfig { export_mode: ExportMode::Study, include_frontmatter: false, ..Default::default() };
        let merged = args(&[]).merge_into(config.clone());

        assert_eq!(merged, config);
    }

    #[test]
    fn test_last_frontmatter_flag_wins() {
        let config = AlchemizeConfig { include_frontmatter: false, ..Default::default() };
        assert!(args(&["--no-frontmatter", "--frontmatter"]).merge_into(config).include_frontmatter);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Args::try_parse_from(["alchemize", "-m", "summary"]).is_err());
    }

    #[test]
    fn test_output_path_for_file_target() {
        let content = ExtractedContent::new("A Title");
        let path = output_path(Path::new("/nonexistent/note.md"), &content, OutputFormat::Markdown, &Default::default());

        assert_eq!(path, PathBuf::from("/nonexistent/note.md"));
    }

    #[test]
    fn test_output_path_for_directory_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let content = ExtractedContent::new("A Title");
        let config = AlchemizeConfig { filename_template: "{{title}}".to_string(), ..Default::default() };

        assert_eq!(output_path(dir.path(), &content, OutputFormat::Json, &config), dir.path().join("a-title.json"));
    }
}
