//! Driver that feeds both trees from a key file and a stream of random operations.
//!
//! Nothing here is needed to use the trees; it exists to compare them side by side. All I/O,
//! timing and logging of the crate happens in this module and in the binary.

mod config;
mod error;

pub use self::config::{Config, DEFAULT_DATA_PATH, DEFAULT_OPERATIONS, USAGE};
pub use self::error::{Error, Result};

use crate::avl_tree::AvlTree;
use crate::red_black_tree::RedBlackTree;
use log::{debug, error, info};
use rand::Rng;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Keys drawn by `random_operations` fall in `-KEY_RANGE..=KEY_RANGE`.
pub const KEY_RANGE: i64 = 9999;

/// Wall-clock time spent filling each tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FillTimings {
    pub avl: Duration,
    pub red_black: Duration,
}

/// Tally of what `random_operations` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub inserts: usize,
    pub removals: usize,
    pub removal_hits: usize,
    pub lookups: usize,
    pub lookup_hits: usize,
}

/// Summary of a driver run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub keys: usize,
    pub avl_fill_seconds: f64,
    pub red_black_fill_seconds: f64,
    pub operations: OperationStats,
    pub avl_len: usize,
    pub avl_height: usize,
    pub red_black_len: usize,
}

impl Report {
    pub fn new(
        keys: usize,
        timings: FillTimings,
        operations: OperationStats,
        avl: &AvlTree<i64>,
        red_black: &RedBlackTree<i64>,
    ) -> Self {
        Report {
            keys,
            avl_fill_seconds: timings.avl.as_secs_f64(),
            red_black_fill_seconds: timings.red_black.as_secs_f64(),
            operations,
            avl_len: avl.len(),
            avl_height: avl.height(),
            red_black_len: red_black.len(),
        }
    }
}

/// Reads a list literal of integers such as `[3, -1, 42]` from `path`.
pub fn load_keys<P>(path: P) -> Result<Vec<i64>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like `load_keys`, but logs the failure and returns no keys instead.
pub fn read_keys_or_empty<P>(path: P) -> Vec<i64>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match load_keys(path) {
        Ok(keys) => {
            info!("Loaded {} keys from `{}`.", keys.len(), path.display());
            keys
        },
        Err(err) => {
            error!("{}", err);
            Vec::new()
        },
    }
}

/// Inserts every key into both trees, timing each tree separately.
pub fn fill_trees(
    avl: &mut AvlTree<i64>,
    red_black: &mut RedBlackTree<i64>,
    keys: &[i64],
) -> FillTimings {
    let start = Instant::now();
    for key in keys {
        avl.insert(*key);
    }
    let avl_time = start.elapsed();

    let start = Instant::now();
    for key in keys {
        red_black.insert(*key);
    }
    let red_black_time = start.elapsed();

    FillTimings {
        avl: avl_time,
        red_black: red_black_time,
    }
}

/// Runs `operations` random steps against both trees. Each step draws a key `k` uniformly from
/// `-KEY_RANGE..=KEY_RANGE` and then:
///
/// - inserts `k` into both trees if `k` is divisible by 3,
/// - otherwise removes one copy of `k` from the red black tree if `k` is divisible by 5,
/// - otherwise counts `k` in both trees.
///
/// The avl tree has no removal, so after the first removal hit the two trees may disagree.
pub fn random_operations<R>(
    avl: &mut AvlTree<i64>,
    red_black: &mut RedBlackTree<i64>,
    rng: &mut R,
    operations: usize,
) -> OperationStats
where
    R: Rng,
{
    let mut stats = OperationStats::default();

    for _ in 0..operations {
        let key: i64 = rng.gen_range(-KEY_RANGE..=KEY_RANGE);

        if key % 3 == 0 {
            avl.insert(key);
            red_black.insert(key);
            stats.inserts += 1;
        } else if key % 5 == 0 {
            stats.removals += 1;
            if red_black.remove(&key).is_some() {
                stats.removal_hits += 1;
            }
        } else {
            let avl_count = avl.count(&key);
            let red_black_count = red_black.count(&key);
            debug!(
                "Key {} occurs {} times in the avl tree and {} times in the red black tree.",
                key, avl_count, red_black_count,
            );
            stats.lookups += 1;
            if avl_count > 0 || red_black_count > 0 {
                stats.lookup_hits += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::{fill_trees, random_operations, FillTimings, OperationStats, Report, KEY_RANGE};
    use crate::avl_tree::AvlTree;
    use crate::red_black_tree::RedBlackTree;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn test_fill_trees() {
        let mut avl = AvlTree::new();
        let mut red_black = RedBlackTree::new();
        fill_trees(&mut avl, &mut red_black, &[4, 2, 4, 9]);

        assert_eq!(avl.iter().cloned().collect::<Vec<i64>>(), vec![2, 4, 9]);
        assert_eq!(red_black.iter().cloned().collect::<Vec<i64>>(), vec![2, 4, 4, 9]);
    }

    #[test]
    fn test_random_operations_tally() {
        let mut avl = AvlTree::new();
        let mut red_black = RedBlackTree::new();
        let mut rng = StdRng::seed_from_u64(1);

        let stats = random_operations(&mut avl, &mut red_black, &mut rng, 2000);

        assert_eq!(stats.inserts + stats.removals + stats.lookups, 2000);
        assert!(stats.removal_hits <= stats.removals);
        assert!(stats.lookup_hits <= stats.lookups);
        assert_eq!(red_black.len(), stats.inserts - stats.removal_hits);
        assert!(avl.len() <= stats.inserts);
        assert!(avl.iter().all(|key| key % 3 == 0 && key.abs() <= KEY_RANGE));
    }

    #[test]
    fn test_random_operations_is_deterministic_for_a_seed() {
        let run = || {
            let mut avl = AvlTree::new();
            let mut red_black = RedBlackTree::new();
            let mut rng = StdRng::seed_from_u64(42);
            let stats = random_operations(&mut avl, &mut red_black, &mut rng, 500);
            (stats, red_black.into_iter().collect::<Vec<i64>>())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_report() {
        let avl: AvlTree<i64> = (0..7).collect();
        let red_black: RedBlackTree<i64> = (0..5).collect();
        let timings = FillTimings {
            avl: Duration::from_millis(1500),
            red_black: Duration::from_millis(250),
        };
        let report = Report::new(7, timings, OperationStats::default(), &avl, &red_black);

        assert_eq!(report.avl_fill_seconds, 1.5);
        assert_eq!(report.red_black_fill_seconds, 0.25);
        assert_eq!(report.avl_height, 3);
        assert_eq!(report.red_black_len, 5);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operations"]["inserts"], 0);
        assert_eq!(json["avl_len"], 7);
    }
}
