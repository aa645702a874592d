use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::num::NonZeroUsize;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::problem::Problem;

/// Tag -> chosen problems. Every requested tag has an entry, possibly empty.
pub type Sample = BTreeMap<String, Vec<Problem>>;

/// Draw up to `quota` problems per requested tag, each name used at most once
/// across all tags, restricted to the allowed difficulties.
///
/// The catalog is copied and shuffled with `rng`, so a seeded generator gives a
/// reproducible sample. A tag whose supply runs out gets a short bucket.
pub fn sample<R: Rng + ?Sized>(
    catalog: &Catalog,
    quota: NonZeroUsize,
    tags: &BTreeSet<String>,
    difficulties: &BTreeSet<String>,
    rng: &mut R,
) -> Sample {
    let quota = quota.get();
    let mut buckets: Sample = tags.iter().map(|t| (t.clone(), Vec::new())).collect();
    let mut chosen: HashSet<&str> = HashSet::new();

    let mut order: Vec<&Problem> = catalog.iter().collect();
    order.shuffle(rng);

    for problem in order {
        if !difficulties.contains(&problem.difficulty) {
            continue;
        }
        for tag in &problem.tags {
            let Some(bucket) = buckets.get_mut(tag) else {
                continue;
            };
            if bucket.len() < quota && !chosen.contains(problem.name.as_str()) {
                bucket.push(problem.clone());
                chosen.insert(&problem.name);
            }
        }
    }

    buckets
}

/// Requested tags left with fewer than `quota` problems.
pub fn short_buckets(sample: &Sample, quota: NonZeroUsize) -> Vec<(&str, usize)> {
    sample
        .iter()
        .filter(|(_, bucket)| bucket.len() < quota.get())
        .map(|(tag, bucket)| (tag.as_str(), bucket.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::merge;

    fn p(name: &str, difficulty: &str, tags: &[&str]) -> Problem {
        Problem::new(
            format!("https://example.com/{}", name),
            name,
            difficulty,
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn quota(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn big_catalog() -> Catalog {
        let tags = ["Math", "Array", "String", "Greedy", "Heap"];
        let difficulties = ["Beginner", "Intermediate", "Hard"];
        let problems = (0..120).map(|i| {
            let t: Vec<&str> = (0..=(i % 3)).map(|k| tags[(i + k * 2) % tags.len()]).collect();
            p(&format!("P{i}"), difficulties[i % difficulties.len()], &t)
        });
        merge([problems.collect::<Vec<_>>()]).unwrap()
    }

    #[test]
    fn names_are_unique_across_buckets() {
        let catalog = big_catalog();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = sample(
                &catalog,
                quota(7),
                &set(&["Math", "Array", "String", "Greedy"]),
                &set(&["Beginner", "Intermediate"]),
                &mut rng,
            );
            let mut seen = HashSet::new();
            for bucket in s.values() {
                for problem in bucket {
                    assert!(
                        seen.insert(problem.name.clone()),
                        "seed {seed}: {} twice",
                        problem.name
                    );
                }
            }
        }
    }

    #[test]
    fn buckets_respect_quota_and_difficulty() {
        let catalog = big_catalog();
        let allowed = set(&["Intermediate"]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = sample(&catalog, quota(3), &set(&["Math", "Heap"]), &allowed, &mut rng);
            assert_eq!(s.len(), 2);
            for (tag, bucket) in &s {
                assert!(bucket.len() <= 3);
                for problem in bucket {
                    assert!(allowed.contains(&problem.difficulty));
                    assert!(problem.tags.contains(tag));
                }
            }
        }
    }

    #[test]
    fn every_requested_tag_gets_a_bucket() {
        let catalog = merge([vec![p("A", "Beginner", &["Math"])]]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let s = sample(
            &catalog,
            quota(2),
            &set(&["Math", "Graphs"]),
            &set(&["Beginner"]),
            &mut rng,
        );
        assert_eq!(s["Math"].len(), 1);
        assert!(s["Graphs"].is_empty());
        assert_eq!(short_buckets(&s, quota(2)), vec![("Graphs", 0), ("Math", 1)]);
    }

    #[test]
    fn same_seed_same_sample() {
        let catalog = big_catalog();
        let tags = set(&["Math", "Array"]);
        let diffs = set(&["Beginner", "Hard"]);
        let a = sample(&catalog, quota(4), &tags, &diffs, &mut StdRng::seed_from_u64(42));
        let b = sample(&catalog, quota(4), &tags, &diffs, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn catalog_is_not_reordered() {
        let catalog = big_catalog();
        let before = catalog.clone();
        let mut rng = StdRng::seed_from_u64(9);
        sample(&catalog, quota(5), &set(&["Math"]), &set(&["Beginner"]), &mut rng);
        assert_eq!(catalog, before);
    }

    #[test]
    fn end_to_end_scenario() {
        let catalog = merge([vec![
            p("A", "Beginner", &["Math"]),
            p("B", "Beginner", &["Math", "Array"]),
            p("C", "Hard", &["Math"]),
        ]])
        .unwrap();
        let tags = set(&["Math", "Array"]);
        let diffs = set(&["Beginner"]);

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = sample(&catalog, quota(1), &tags, &diffs, &mut rng);

            let math = &s["Math"];
            let array = &s["Array"];
            assert_eq!(math.len(), 1);
            assert!(math[0].name == "A" || math[0].name == "B");
            assert!(s.values().flatten().all(|x| x.name != "C"));

            let b_in_array = array.iter().any(|x| x.name == "B");
            assert_eq!(b_in_array, math[0].name != "B", "seed {seed}");
        }
    }

    #[test]
    fn input_file_order_does_not_change_sample() {
        let a = vec![p("X", "Easy", &["Math"]), p("Y", "Easy", &["Array"])];
        let b = vec![p("X", "Easy", &["Array"]), p("Z", "Easy", &["Math", "Array"])];
        let ab = merge([a.clone(), b.clone()]).unwrap();
        let ba = merge([b, a]).unwrap();
        let tags = set(&["Math", "Array"]);
        let diffs = set(&["Easy"]);
        for seed in 0..32 {
            let x = sample(&ab, quota(1), &tags, &diffs, &mut StdRng::seed_from_u64(seed));
            let y = sample(&ba, quota(1), &tags, &diffs, &mut StdRng::seed_from_u64(seed));
            assert_eq!(x, y, "seed {seed}");
        }
    }
}
