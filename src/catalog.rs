use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::CrawlError;
use crate::problem::Problem;

/// Deduplicated problems keyed by name. Tags of each entry are sorted and
/// duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    problems: BTreeMap<String, Problem>,
}

impl Catalog {
    /// Fold one record into the catalog.
    pub fn insert(&mut self, problem: Problem) -> Result<(), CrawlError> {
        match self.problems.entry(problem.name.clone()) {
            Entry::Vacant(slot) => {
                let tags = normalize_tags(problem.tags.iter());
                slot.insert(Problem { tags, ..problem });
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if existing.difficulty != problem.difficulty {
                    return Err(CrawlError::DifficultyConflict {
                        name: problem.name,
                        existing: existing.difficulty.clone(),
                        incoming: problem.difficulty,
                    });
                }
                existing.tags = normalize_tags(existing.tags.iter().chain(&problem.tags));
            }
        }
        Ok(())
    }

    pub fn extend<I>(&mut self, problems: I) -> Result<(), CrawlError>
    where
        I: IntoIterator<Item = Problem>,
    {
        for problem in problems {
            self.insert(problem)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values()
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems.into_values().collect()
    }
}

/// Merge record batches from any number of sources into one catalog.
pub fn merge<I>(batches: I) -> Result<Catalog, CrawlError>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = Problem>,
{
    batches.into_iter().try_fold(Catalog::default(), |mut catalog, batch| {
        catalog.extend(batch)?;
        Ok(catalog)
    })
}

fn normalize_tags<'a>(tags: impl Iterator<Item = &'a String>) -> Vec<String> {
    tags.collect::<BTreeSet<_>>().into_iter().cloned().collect()
}

/// Summary counts printed by the `stats` command.
pub struct CatalogStats {
    pub records: usize,
    pub unique: usize,
    pub partial: usize,
    pub by_difficulty: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
}

/// Counts over raw records; `unique` is the number of distinct names.
pub fn stats(problems: &[Problem]) -> CatalogStats {
    let mut by_difficulty = BTreeMap::new();
    let mut by_tag = BTreeMap::new();
    let mut names = BTreeSet::new();

    for p in problems {
        names.insert(p.name.as_str());
        *by_difficulty.entry(p.difficulty.clone()).or_insert(0) += 1;
        for tag in &p.tags {
            *by_tag.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    CatalogStats {
        records: problems.len(),
        unique: names.len(),
        partial: problems.iter().filter(|p| p.has_partial_tags()).count(),
        by_difficulty,
        by_tag,
    }
}
