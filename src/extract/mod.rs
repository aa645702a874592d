pub mod codechef;
pub mod leetcode;

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Trim and collapse internal whitespace runs to single spaces.
pub fn clean_text(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").to_string()
}

/// Resolve `href` against `base`; absolute URLs pass through. `None` when
/// either side does not parse.
pub fn absolute_url(base: &str, href: &str) -> Option<String> {
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}
