use crate::document::Document;
use crate::problem::Problem;

use super::{absolute_url, clean_text};

pub const BASE_URL: &str = "https://www.codechef.com";

const PROBLEM_CLASS_PREFIX: &str = "_problemName";
const MCQ_LABEL: &str = "Multiple Choice Question";

/// A topic listing page: every problem on it gets these tags and this difficulty.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub url: &'static str,
    pub tags: &'static [&'static str],
    pub difficulty: &'static str,
}

pub const LISTINGS: &[Listing] = &[
    Listing {
        url: "https://www.codechef.com/practice/basic-math-c",
        tags: &["Math"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/arrays-c",
        tags: &["Array"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/strings-c",
        tags: &["String"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/sorting-c",
        tags: &["Sorting"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/linked-lists",
        tags: &["Linked list"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/two-pointers",
        tags: &["Two pointers"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/stacks-and-queues",
        tags: &["Stack", "Queue"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/heaps",
        tags: &["Heap"],
        difficulty: "Beginner",
    },
    Listing {
        url: "https://www.codechef.com/practice/arrays-strings-sorting",
        tags: &["Array", "String", "Sorting"],
        difficulty: "Intermediate",
    },
    Listing {
        url: "https://www.codechef.com/practice/greedy-algorithms",
        tags: &["Greedy"],
        difficulty: "Intermediate",
    },
    Listing {
        url: "https://www.codechef.com/practice/binary-search",
        tags: &["Binary search"],
        difficulty: "Intermediate",
    },
    Listing {
        url: "https://www.codechef.com/practice/dynamic-programming",
        tags: &["Dynamic programming"],
        difficulty: "Intermediate",
    },
    Listing {
        url: "https://www.codechef.com/practice/number-theory",
        tags: &["Math"],
        difficulty: "Intermediate",
    },
];

/// Problem links on a topic page, stamped with the listing's tags and difficulty.
pub fn extract(doc: &Document, listing: &Listing) -> Vec<Problem> {
    let tags: Vec<String> = listing.tags.iter().map(|t| t.to_string()).collect();

    doc.anchors()
        .into_iter()
        .filter(|a| {
            a.first_class()
                .is_some_and(|c| c.starts_with(PROBLEM_CLASS_PREFIX))
        })
        .filter_map(|a| {
            let href = a.attr("href")?;
            let name = clean_text(&a.text());
            if name.is_empty() || name == MCQ_LABEL {
                return None;
            }
            Some(Problem::new(
                absolute_url(BASE_URL, href)?,
                name,
                listing.difficulty,
                tags.clone(),
            ))
        })
        .collect()
}
