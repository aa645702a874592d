use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::CrawlError;
use crate::extract::{codechef, leetcode};
use crate::problem::Problem;
use crate::progress;
use crate::session::PageSession;
use crate::settings::Delays;

/// A source that is read as a numbered sequence of listing pages.
#[allow(async_fn_in_trait)]
pub trait PagedSource {
    fn name(&self) -> &str;

    /// Total number of pages, read once before walking.
    async fn page_count(&mut self) -> Result<usize, CrawlError>;

    /// Records on page `page` (1-based).
    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Problem>, CrawlError>;

    /// Expected wall time for one page, used for the ETA estimate.
    fn page_cost(&self) -> Duration {
        Duration::ZERO
    }
}

/// Fetch pages `1..=page_count` in order and concatenate their records.
pub async fn walk<S: PagedSource>(source: &mut S) -> Result<Vec<Problem>, CrawlError> {
    let total = source.page_count().await?;
    let name = source.name().to_string();
    info!("{}: {} pages", name, total);
    if let Some(estimate) = progress::scaled(source.page_cost(), total) {
        progress::log_estimate(estimate);
    }

    let pb = progress::bar(total);

    let mut all = Vec::new();
    for page in 1..=total {
        let problems = match source.fetch_page(page).await {
            Ok(p) => p,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        if problems.is_empty() {
            warn!("{}: page {} yielded no problems", name, page);
        } else {
            debug!("{}: page {} yielded {} problems", name, page, problems.len());
        }
        all.extend(problems);
        pb.inc(1);
        info!("Scraped page {} / {}", page, total);
    }

    pb.finish_and_clear();
    info!("{}: {} records from {} pages", name, all.len(), total);
    Ok(all)
}

/// The LeetCode problem set, one listing page per `?page=N`.
pub struct LeetCodeListing<'s, P> {
    session: &'s mut P,
    delays: Delays,
}

impl<'s, P: PageSession> LeetCodeListing<'s, P> {
    pub fn new(session: &'s mut P, delays: Delays) -> Self {
        Self { session, delays }
    }

    /// Turn on the tag column. Rows without it are dropped by the extractor,
    /// so a backend that cannot click fails the walk.
    async fn show_tags(&mut self) -> Result<(), CrawlError> {
        for selector in [leetcode::SETTINGS_BUTTON, leetcode::TAGS_SWITCH] {
            self.session.click(selector).await?;
            self.session.wait(self.delays.click).await;
        }
        Ok(())
    }
}

impl<P: PageSession> PagedSource for LeetCodeListing<'_, P> {
    fn name(&self) -> &str {
        "leetcode"
    }

    async fn page_count(&mut self) -> Result<usize, CrawlError> {
        let url = leetcode::page_url(1);
        self.session.navigate(&url).await?;
        self.session.wait(self.delays.get).await;
        let doc = self.session.document()?;
        leetcode::page_count(&doc, &url)
    }

    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Problem>, CrawlError> {
        self.session.navigate(&leetcode::page_url(page)).await?;
        self.session.wait(self.delays.get).await;
        self.show_tags().await?;
        let doc = self.session.document()?;
        let problems = leetcode::extract_listing(&doc);
        if problems.is_empty() {
            debug!(url = self.session.current_url(), "no problem rows on listing page");
        }
        Ok(problems)
    }

    fn page_cost(&self) -> Duration {
        self.delays
            .get
            .saturating_add(self.delays.click.saturating_mul(2))
    }
}

/// CodeChef's fixed topic pages, walked as if they were numbered pages.
pub struct CodeChefListings<'s, P> {
    session: &'s mut P,
    listings: &'static [codechef::Listing],
    delays: Delays,
}

impl<'s, P: PageSession> CodeChefListings<'s, P> {
    pub fn new(session: &'s mut P, listings: &'static [codechef::Listing], delays: Delays) -> Self {
        Self {
            session,
            listings,
            delays,
        }
    }
}

impl<P: PageSession> PagedSource for CodeChefListings<'_, P> {
    fn name(&self) -> &str {
        "codechef"
    }

    async fn page_count(&mut self) -> Result<usize, CrawlError> {
        Ok(self.listings.len())
    }

    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Problem>, CrawlError> {
        let listing = page
            .checked_sub(1)
            .and_then(|i| self.listings.get(i))
            .ok_or_else(|| CrawlError::shape("codechef", format!("no listing page {}", page)))?;
        self.session.navigate(listing.url).await?;
        self.session.wait(self.delays.listing).await;
        let doc = self.session.document()?;
        Ok(codechef::extract(&doc, listing))
    }

    fn page_cost(&self) -> Duration {
        self.delays.listing
    }
}
