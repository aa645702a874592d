use std::time::Duration;

use chrono::{Local, TimeDelta};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Progress bar for a sequential crawl loop.
pub fn bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}

/// Log how long a crawl of fixed-delay page loads should take, and when it should end.
pub fn log_estimate(estimate: Duration) {
    if estimate.is_zero() {
        return;
    }
    match finish_time(estimate) {
        Some(end) => info!(
            "Estimated time to complete: {} ({})",
            format_duration(estimate),
            end
        ),
        None => info!("Estimated time to complete: {}", format_duration(estimate)),
    }
}

fn finish_time(estimate: Duration) -> Option<String> {
    let delta = TimeDelta::from_std(estimate).ok()?;
    let end = Local::now().checked_add_signed(delta)?;
    Some(end.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// `per_item` repeated `n` times, or `None` when that does not fit a `Duration`.
pub fn scaled(per_item: Duration, n: usize) -> Option<Duration> {
    per_item.checked_mul(u32::try_from(n).ok()?)
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
