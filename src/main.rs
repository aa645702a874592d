mod catalog;
mod document;
mod error;
mod extract;
mod problem;
mod progress;
mod sampler;
mod session;
mod settings;
mod store;
mod tags;
mod walker;

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use session::{Backend, HttpSession, PageSession, SpiderSession};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "problem_catalog",
    about = "Crawl, merge and sample programming-practice problems"
)]
struct Cli {
    /// Page backend (overrides CATALOG_BACKEND)
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl CodeChef's topic pages into a merged catalog
    Codechef {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Crawl every LeetCode problem-set page (tags may be partial)
    Leetcode {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Fetch full tag lists for records whose tags were truncated
    CompleteTags {
        /// Records with possibly partial tag lists
        #[arg(short = 'p', long)]
        problems: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Merge record files into one catalog keyed by problem name
    Merge {
        #[arg(short, long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Draw a per-tag sample with names unique across tags
    Sample {
        #[arg(short, long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
        /// Problems per tag
        #[arg(short)]
        k: NonZeroUsize,
        #[arg(short, long, num_args = 1.., required = true)]
        tags: Vec<String>,
        #[arg(short, long, num_args = 1.., required = true)]
        difficulties: Vec<String>,
        /// Fix the shuffle for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show counts for record files
    Stats {
        #[arg(short, long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }

    let result = match cli.command {
        Commands::Codechef { output } => match settings.backend {
            Backend::Spider => {
                crawl_codechef(&mut SpiderSession::from_env()?, &settings, &output).await
            }
            Backend::Http => crawl_codechef(&mut HttpSession::new()?, &settings, &output).await,
        },
        Commands::Leetcode { output } => match settings.backend {
            Backend::Spider => {
                crawl_leetcode(&mut SpiderSession::from_env()?, &settings, &output).await
            }
            Backend::Http => crawl_leetcode(&mut HttpSession::new()?, &settings, &output).await,
        },
        Commands::CompleteTags { problems, output } => {
            let records = store::load_problems(&problems)?;
            match settings.backend {
                Backend::Spider => {
                    let mut session = SpiderSession::from_env()?;
                    complete_tags(&mut session, records, &settings, &output).await
                }
                Backend::Http => {
                    complete_tags(&mut HttpSession::new()?, records, &settings, &output).await
                }
            }
        }
        Commands::Merge { inputs, output } => {
            let batches = store::load_batches(&inputs)?;
            let n: usize = batches.iter().map(Vec::len).sum();
            let catalog = catalog::merge(batches)?;
            println!("Merged {} records into {} problems", n, catalog.len());
            store::save_problems(&output, &catalog.into_problems())
        }
        Commands::Sample {
            inputs,
            k,
            tags,
            difficulties,
            seed,
            output,
        } => {
            let catalog = catalog::merge(store::load_batches(&inputs)?)?;
            if catalog.is_empty() {
                warn!("Catalog is empty; every bucket will be empty");
            }
            let tags: BTreeSet<String> = tags.into_iter().collect();
            let difficulties: BTreeSet<String> = difficulties.into_iter().collect();
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };

            let sample = sampler::sample(&catalog, k, &tags, &difficulties, &mut rng);
            for (tag, got) in sampler::short_buckets(&sample, k) {
                warn!("Only {} of {} problems available for tag {:?}", got, k, tag);
            }
            let chosen: usize = sample.values().map(Vec::len).sum();
            println!(
                "Sampled {} problems across {} tags from {} in catalog",
                chosen,
                sample.len(),
                catalog.len()
            );
            store::save_sample(&output, &sample)
        }
        Commands::Stats { inputs } => {
            let records = store::load_all(&inputs)?;
            let s = catalog::stats(&records);
            println!("Records:   {}", s.records);
            println!("Unique:    {}", s.unique);
            println!("Partial:   {}", s.partial);
            println!("\n--- Difficulties ---");
            for (difficulty, n) in &s.by_difficulty {
                println!("  {:<16} {:>6}", difficulty, n);
            }
            println!("\n--- Tags ---");
            for (tag, n) in &s.by_tag {
                println!("  {:<24} {:>6}", tag, n);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", progress::format_duration(elapsed));
    }

    if let Err(e) = &result {
        match e.downcast_ref::<error::CrawlError>() {
            Some(c) if c.is_integrity_fault() => {
                error!("Data-integrity fault, catalog not written")
            }
            Some(_) => error!("Upstream fault, run aborted"),
            None => {}
        }
    }

    result
}

async fn crawl_codechef<P: PageSession>(
    session: &mut P,
    settings: &Settings,
    output: &Path,
) -> Result<()> {
    let mut source =
        walker::CodeChefListings::new(session, extract::codechef::LISTINGS, settings.delays());
    let records = walker::walk(&mut source).await?;
    let n = records.len();
    let catalog = catalog::merge([records])?;
    info!("Merged {} CodeChef records into {} problems", n, catalog.len());
    store::save_problems(output, &catalog.into_problems())?;
    println!("Wrote CodeChef catalog to {}", output.display());
    Ok(())
}

async fn crawl_leetcode<P: PageSession>(
    session: &mut P,
    settings: &Settings,
    output: &Path,
) -> Result<()> {
    let mut source = walker::LeetCodeListing::new(session, settings.delays());
    let records = walker::walk(&mut source).await?;
    let partial = records.iter().filter(|p| p.has_partial_tags()).count();
    store::save_problems(output, &records)?;
    println!(
        "Wrote {} LeetCode problems ({} with partial tags) to {}",
        records.len(),
        partial,
        output.display()
    );
    Ok(())
}

async fn complete_tags<P: PageSession>(
    session: &mut P,
    records: Vec<problem::Problem>,
    settings: &Settings,
    output: &Path,
) -> Result<()> {
    let done = tags::complete(session, records, settings.delays()).await;
    store::save_problems(output, &done.problems)?;
    println!(
        "Completed tags for {} problems ({} detail pages failed); wrote {} problems to {}",
        done.completed,
        done.failed,
        done.problems.len(),
        output.display()
    );
    Ok(())
}
