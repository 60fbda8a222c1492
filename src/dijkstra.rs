use fxhash::FxBuildHasher;
/// This module implements a variant of
/// [pathfinding's dijkstra function](https://docs.rs/pathfinding/latest/pathfinding/directed/dijkstra/index.html)
/// which stops at the first settled node accepted by a success predicate, so that a search
/// towards a large set of goals ends as soon as the cheapest one is known. It also polls a
/// cancellation predicate while the frontier is being expanded.
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;
use std::ops::Add;

/// How a search ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Search<T> {
    Found(T),
    Exhausted,
    Cancelled,
}

struct SmallestCostHolder<K> {
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.eq(&other.cost) && self.index == other.index
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest cost first, equal costs are popped in the order their nodes were discovered
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.index.cmp(&self.index),
            s => s,
        }
    }
}

/// Walks the parent links back from `start`, returning nodes and their costs in path order.
fn reverse_path<N, C>(parents: &FxIndexMap<N, (usize, C)>, start: usize) -> Vec<(N, C)>
where
    N: Eq + Hash + Clone,
    C: Copy,
{
    let mut i = start;
    let mut path: Vec<(N, C)> = std::iter::from_fn(|| {
        parents.get_index(i).map(|(node, &(parent, cost))| {
            i = parent;
            (node.clone(), cost)
        })
    })
    .collect();
    path.reverse();
    path
}

/// Dijkstra search from `start` that returns the path to the first node settled with `success`
/// returning true, along with the accumulated cost at every node of the path. `cancelled` is
/// polled on the first pop and then every `poll_interval` pops.
pub fn dijkstra_multi_target<N, C, FN, IN, FS, FC>(
    start: &N,
    mut successors: FN,
    mut success: FS,
    mut cancelled: FC,
    poll_interval: usize,
) -> Search<Vec<(N, C)>>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FS: FnMut(&N) -> bool,
    FC: FnMut() -> bool,
{
    let poll_interval = poll_interval.max(1);
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    let mut pops: usize = 0;
    while let Some(SmallestCostHolder { cost, index }) = to_see.pop() {
        if pops % poll_interval == 0 && cancelled() {
            debug!("Search cancelled after {} pops", pops);
            return Search::Cancelled;
        }
        pops += 1;
        let successors = {
            let Some((node, &(_, c))) = parents.get_index(index) else {
                continue;
            };
            // We may have inserted a node several time into the binary heap if we found
            // a better way to access it. Ensure that we are currently dealing with the
            // best path and discard the others.
            if cost > c {
                continue;
            }
            if success(node) {
                debug!(
                    "Goal settled after {} pops, {} nodes discovered",
                    pops,
                    parents.len()
                );
                return Search::Found(reverse_path(&parents, index));
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                cost: new_cost,
                index: n,
            });
        }
    }
    debug!("Frontier exhausted after {} pops", pops);
    Search::Exhausted
}
