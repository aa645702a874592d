use std::time::Duration;

use tracing::{info, warn};

use crate::error::CrawlError;
use crate::extract::leetcode;
use crate::problem::Problem;
use crate::progress;
use crate::session::PageSession;
use crate::settings::Delays;

/// Session warm-up added to the time estimate.
const ESTIMATED_STARTUP: Duration = Duration::from_secs(4);

/// Outcome of a completion pass.
pub struct Completion {
    /// Complete records first, then the re-fetched ones in input order.
    pub problems: Vec<Problem>,
    pub completed: usize,
    /// Detail pages that could not be loaded; those records end with no tags.
    pub failed: usize,
}

/// Replace every truncated tag list with the full list from the problem's
/// detail page. Records whose tags are already complete pass through.
pub async fn complete<P: PageSession>(
    session: &mut P,
    problems: Vec<Problem>,
    delays: Delays,
) -> Completion {
    let total = problems.len();
    let (mut done, partial): (Vec<Problem>, Vec<Problem>) =
        problems.into_iter().partition(|p| !p.has_partial_tags());

    info!("Total problems: {}", total);
    info!("Problems with partial tags: {}", partial.len());
    if let Some(estimate) = progress::scaled(delays.detail, partial.len())
        .and_then(|d| d.checked_add(ESTIMATED_STARTUP))
    {
        progress::log_estimate(estimate);
    }

    let pb = progress::bar(partial.len());
    let mut failed = 0;
    for (i, problem) in partial.iter().enumerate() {
        let tags = match fetch_tags(session, &problem.url, delays).await {
            Ok(tags) => {
                if tags.is_empty() {
                    warn!("{}: no tags on detail page", problem.name);
                }
                tags
            }
            Err(e) => {
                warn!("{}: {}", problem.name, e);
                failed += 1;
                Vec::new()
            }
        };
        done.push(problem.with_tags(tags));
        pb.inc(1);
        info!("Completed tags for problem {} / {}", i + 1, partial.len());
    }
    pb.finish_and_clear();

    Completion {
        problems: done,
        completed: partial.len() - failed,
        failed,
    }
}

async fn fetch_tags<P: PageSession>(
    session: &mut P,
    url: &str,
    delays: Delays,
) -> Result<Vec<String>, CrawlError> {
    session.navigate(url).await?;
    session.wait(delays.detail).await;
    let doc = session.document()?;
    Ok(leetcode::extract_detail_tags(&doc))
}
