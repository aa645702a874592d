use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use tracing::debug;

use crate::document::{Document, Node};
use crate::error::CrawlError;
use crate::problem::Problem;

use super::{absolute_url, clean_text};

pub const BASE_URL: &str = "https://leetcode.com";
pub const PROBLEMSET_URL: &str = "https://leetcode.com/problemset/all/";

/// Opens the listing's display settings.
pub const SETTINGS_BUTTON: &str = "button[aria-label='settings']";
/// "Show tags" toggle inside the settings menu.
pub const TAGS_SWITCH: &str = "div[role='switch']";

static PAGINATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav.flex.flex-nowrap.items-center").unwrap());
static BUTTON_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("button").unwrap());
static PAGE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

// Row layout, relative to the problem anchor.
const ROW_DEPTH: usize = 6;
const DIFFICULTY_COLUMN: usize = 4;

pub fn page_url(page: usize) -> String {
    format!("{}?page={}", PROBLEMSET_URL, page)
}

/// Highest page index shown by the pagination control. The last button is
/// "next", so the one before it carries the final page number.
pub fn page_count(doc: &Document, url: &str) -> Result<usize, CrawlError> {
    let nav = doc
        .select_one(&PAGINATION_SEL)
        .ok_or_else(|| CrawlError::shape(url, "pagination nav not found"))?;
    let buttons = nav.select(&BUTTON_SEL);
    let last = buttons
        .len()
        .checked_sub(2)
        .and_then(|i| buttons.get(i))
        .ok_or_else(|| CrawlError::shape(url, "pagination nav has fewer than two buttons"))?;

    let text = clean_text(&last.text());
    if !PAGE_NUMBER_RE.is_match(&text) {
        return Err(CrawlError::shape(
            url,
            format!("last page button reads {:?}", text),
        ));
    }
    text.parse()
        .map_err(|_| CrawlError::shape(url, format!("page number {:?} out of range", text)))
}

/// Problems on one listing page. Rows without a difficulty cell or tag
/// container are skipped rather than failing the page.
pub fn extract_listing(doc: &Document) -> Vec<Problem> {
    doc.anchors()
        .into_iter()
        .filter(|a| a.attr("href").is_some_and(is_problem_link))
        .filter(|a| !is_premium(a))
        .filter_map(|a| {
            let row = extract_row(&a);
            if row.is_none() {
                debug!(href = a.attr("href"), "skipping incomplete row");
            }
            row
        })
        .collect()
}

/// Full tag list from a problem's own page.
pub fn extract_detail_tags(doc: &Document) -> Vec<String> {
    doc.anchors()
        .into_iter()
        .filter(|a| a.attr("href").is_some_and(|h| h.contains("/tag/")))
        .map(|a| clean_text(&a.text()))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_problem_link(href: &str) -> bool {
    href.starts_with("/problems/")
        && !href.ends_with("/solution")
        && !href.contains("?envType=daily-question")
}

/// Premium rows carry a lock icon right after the title wrapper.
fn is_premium(a: &Node) -> bool {
    a.parent().is_some_and(|p| p.next_sibling("svg").is_some())
}

fn extract_row(a: &Node) -> Option<Problem> {
    let href = a.attr("href")?;
    let name = clean_text(&a.text());
    if name.is_empty() {
        return None;
    }

    let difficulty = a
        .ancestor(ROW_DEPTH)?
        .child_elements("div")
        .get(DIFFICULTY_COLUMN)
        .map(|cell| clean_text(&cell.text()))
        .filter(|d| !d.is_empty())?;

    let tags = a
        .ancestor(2)?
        .next_sibling("div")?
        .descendants("span")
        .iter()
        .map(|s| clean_text(&s.text()))
        .filter(|t| !t.is_empty())
        .collect();

    Some(Problem::new(
        absolute_url(BASE_URL, href)?,
        name,
        difficulty,
        tags,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> Document {
        Document::parse(&std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap())
    }

    #[test]
    fn listing_rows() {
        let problems = extract_listing(&fixture("leetcode_listing"));
        let names: Vec<&str> = problems.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["1. Two Sum", "15. 3Sum", "7. Reverse Integer"]);

        let two_sum = &problems[0];
        assert_eq!(two_sum.url, "https://leetcode.com/problems/two-sum/");
        assert_eq!(two_sum.difficulty, "Easy");
        assert_eq!(two_sum.tags, vec!["Array", "Hash Table"]);
        assert!(!two_sum.has_partial_tags());
    }

    #[test]
    fn truncated_row_is_partial() {
        let problems = extract_listing(&fixture("leetcode_listing"));
        let three_sum = problems.iter().find(|p| p.name == "15. 3Sum").unwrap();
        assert_eq!(three_sum.difficulty, "Medium");
        assert_eq!(three_sum.tags, vec!["Array", "Two Pointers", "1+"]);
        assert!(three_sum.has_partial_tags());
    }

    #[test]
    fn filtered_rows_are_absent() {
        let problems = extract_listing(&fixture("leetcode_listing"));
        assert!(problems.iter().all(|p| !p.url.contains("daily-question")));
        assert!(problems.iter().all(|p| !p.url.ends_with("/solution")));
        assert!(problems.iter().all(|p| !p.name.contains("Meeting Rooms")));
        assert!(problems.iter().all(|p| !p.name.contains("Median")));
    }

    #[test]
    fn empty_tag_container_is_kept() {
        let problems = extract_listing(&fixture("leetcode_listing"));
        let rev = problems.iter().find(|p| p.name == "7. Reverse Integer").unwrap();
        assert!(rev.tags.is_empty());
    }

    #[test]
    fn pagination_reads_last_page() {
        let doc = fixture("leetcode_listing");
        assert_eq!(page_count(&doc, &page_url(1)).unwrap(), 57);
    }

    #[test]
    fn missing_pagination_is_shape_drift() {
        let doc =
            Document::parse("<html><body><nav class='flex'><button>1</button></nav></body></html>");
        let err = page_count(&doc, &page_url(1)).unwrap_err();
        assert!(matches!(err, CrawlError::ShapeDrift { .. }));
        assert!(!err.is_integrity_fault());
    }

    #[test]
    fn non_numeric_last_page_is_shape_drift() {
        let doc = Document::parse(
            "<nav class='flex flex-nowrap items-center'>\
             <button>1</button><button>...</button><button>&gt;</button></nav>",
        );
        assert!(matches!(
            page_count(&doc, &page_url(1)),
            Err(CrawlError::ShapeDrift { .. })
        ));
    }

    #[test]
    fn detail_tags() {
        let tags = extract_detail_tags(&fixture("leetcode_detail"));
        assert_eq!(tags, vec!["Array", "Two Pointers", "Sorting"]);
    }

    #[test]
    fn detail_without_tags_is_empty() {
        let doc = Document::parse("<a href='/problems/x/'>x</a>");
        assert!(extract_detail_tags(&doc).is_empty());
    }

    #[test]
    fn problem_link_predicate() {
        assert!(is_problem_link("/problems/two-sum/"));
        assert!(!is_problem_link("/problems/two-sum/solution"));
        assert!(!is_problem_link("/problems/x/?envType=daily-question&envId=1"));
        assert!(!is_problem_link("/problemset/all/"));
        assert!(!is_problem_link("https://leetcode.com/problems/two-sum/"));
    }

    #[test]
    fn page_urls() {
        assert_eq!(page_url(3), "https://leetcode.com/problemset/all/?page=3");
    }
}
