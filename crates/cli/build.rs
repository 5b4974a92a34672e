use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");
    if let Err(err) = fs::create_dir_all(&completions_dir) {
        println!("cargo:warning=Could not create completions directory: {err}");
        return;
    }

    let mut cmd = clap::Command::new("alchemize")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn web pages into annotated Markdown notes")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML/Markdown file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <PATH> "Output file or directory (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format")
                .default_value("markdown")
                .value_parser(["markdown", "json", "html"]),
        )
        .arg(clap::arg!(-m --mode <MODE> "Export mode").value_parser(["reference", "study", "flashcards"]))
        .arg(clap::arg!(--url <URL> "Source URL recorded for file or stdin input"))
        .arg(clap::arg!(--frontmatter "Include the frontmatter block (Markdown only)"))
        .arg(clap::arg!(--"no-frontmatter" "Omit the frontmatter block"))
        .arg(
            clap::arg!(--config <FILE> "Settings file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--"no-tags" "Disable automatic tagging"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        if let Err(err) = clap_complete::generate_to(shell, &mut cmd, "alchemize", &completions_dir) {
            println!("cargo:warning=Could not generate {shell} completions: {err}");
        }
    }
}
