// =============================================================================
// Board growth
//
// The playable area spreads outward from cells that already exist: pick a
// random cell, pick one of its four neighbours, keep it if it is new. The
// attempt budget is fixed, so a crowded pick sequence can fall short of the
// target. That shortfall is accepted; growth is best effort.
// =============================================================================

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cells::{CellSet, Position};

const NEIGHBOURS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Tunables for one growth event.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GrowthConfig {
    /// Smallest target, inclusive.
    pub min_added: usize,
    /// Largest target, inclusive. Raised to `min_added` if below it.
    pub max_added: usize,
    /// Neighbour picks allowed before giving up.
    pub max_attempts: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        GrowthConfig {
            min_added: 1,
            max_added: 8,
            max_attempts: 50,
        }
    }
}

/// Grow `cells` with the default config and the thread-local RNG.
/// Returns the enlarged set and how many cells were added.
pub fn grow_board(cells: &CellSet) -> (CellSet, usize) {
    grow_board_with(cells, &GrowthConfig::default(), &mut rand::thread_rng())
}

pub fn grow_board_with<R: Rng + ?Sized>(
    cells: &CellSet,
    config: &GrowthConfig,
    rng: &mut R,
) -> (CellSet, usize) {
    let mut grown = cells.clone();
    if cells.is_empty() {
        return (grown, 0);
    }

    let max_added = config.max_added.max(config.min_added);
    let target = rng.gen_range(config.min_added..=max_added);

    // New cells join the pool, so growth can continue from them.
    let mut pool: Vec<Position> = cells.iter().collect();
    let mut added = 0;
    let mut attempts = 0;

    while added < target && attempts < config.max_attempts {
        attempts += 1;
        let (Some(&origin), Some(&(dx, dy))) = (pool.choose(rng), NEIGHBOURS.choose(rng)) else {
            break;
        };
        let candidate = origin.offset(dx, dy);
        if grown.insert(candidate) {
            trace!("growth: added {}", candidate);
            pool.push(candidate);
            added += 1;
        }
    }

    if added < target {
        debug!(
            "growth: budget of {} attempts spent, added {} of {}",
            config.max_attempts, added, target
        );
    } else {
        debug!("growth: added {} cells in {} attempts", added, attempts);
    }
    (grown, added)
}
