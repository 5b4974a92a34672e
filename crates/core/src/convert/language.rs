//! Code block language detection.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::preprocess::DATA_LANGUAGE_ATTR;

static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:language|lang)-([\w+#.-]+)$").expect("valid language class pattern"));

/// Map a language alias to its canonical fence tag.
///
/// Unknown names pass through lowercased.
pub fn canonical_language(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let canonical = match lower.as_str() {
        "js" | "jsx" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" | "python3" => "python",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "yml" | "cloudformation" => "yaml",
        "terraform" | "tf" => "hcl",
        "rb" => "ruby",
        "rs" => "rust",
        "ps1" | "pwsh" => "powershell",
        "md" => "markdown",
        "golang" => "go",
        "cs" | "c#" => "csharp",
        _ => return lower,
    };
    canonical.to_string()
}

/// Language named by a `language-x` or `lang-x` class token, if any.
pub fn language_from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<String> {
    classes
        .into_iter()
        .find_map(|class| LANGUAGE_CLASS.captures(class).map(|caps| canonical_language(&caps[1])))
}

/// Detect the language of a code block.
///
/// Looks at the element itself, then at its first nested `<code>`, checking
/// `language-*`/`lang-*` classes before the `data-language` attribute.
pub fn detect_language(element: ElementRef<'_>) -> Option<String> {
    let code = first_code_descendant(element);

    [code, Some(element)].into_iter().flatten().find_map(|el| {
        language_from_classes(el.value().classes()).or_else(|| {
            el.value()
                .attr(DATA_LANGUAGE_ATTR)
                .filter(|lang| !lang.trim().is_empty())
                .map(canonical_language)
        })
    })
}

/// The first `<code>` element below `element`, or `element` itself when it is one.
pub fn first_code_descendant(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "code")
}
