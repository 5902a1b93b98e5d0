//! Country and region aggregation tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Records
//! accumulate only in region nodes; a country's totals are summed over its
//! regions when a series is built. Inserts from several workers lock only
//! the region node they touch, plus the index when a node is created.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::dates::continuous_range;
use crate::error::Result;
use crate::record::{Counts, MAIN_TERRITORY, Origin, Record};
use crate::series::{DailyEntry, build_series};

/// Stable handle to a node of an [`AggregationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node; its children are countries.
    pub const ROOT: NodeId = NodeId(0);
}

/// Per-day counts of one region node, kept apart by origin.
type OriginTotals = BTreeMap<NaiveDate, BTreeMap<Origin, Counts>>;

/// Which origin wins each day of a country.
type Winners = BTreeMap<NaiveDate, Origin>;

struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Mutex<Vec<NodeId>>,
    totals: Mutex<OriginTotals>,
}

impl Node {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            children: Mutex::new(Vec::new()),
            totals: Mutex::new(BTreeMap::new()),
        }
    }

    fn children(&self) -> Vec<NodeId> {
        lock(&self.children).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tree of root, countries and regions accumulating records.
pub struct AggregationGraph {
    nodes: RwLock<Vec<Arc<Node>>>,
    index: RwLock<HashMap<(NodeId, String), NodeId>>,
    source_priority: bool,
}

impl AggregationGraph {
    /// Empty graph that keeps only the highest-priority origin per country and day.
    pub fn new() -> Self {
        Self::with_source_priority(true)
    }

    /// Empty graph. With `source_priority` off, records of every origin are summed.
    pub fn with_source_priority(source_priority: bool) -> Self {
        Self {
            nodes: RwLock::new(vec![Arc::new(Node::new("", None))]),
            index: RwLock::new(HashMap::new()),
            source_priority,
        }
    }

    /// Route `record` into its region node, creating nodes as needed.
    ///
    /// An empty region goes to [`MAIN_TERRITORY`]. Counts for the same
    /// region, day and origin add up.
    pub fn insert(&self, record: &Record) {
        let country = self.child_or_insert(NodeId::ROOT, &record.country);
        let region_name = match record.region.as_str() {
            "" => MAIN_TERRITORY,
            name => name,
        };
        let region = self.child_or_insert(country, region_name);

        let node = self.node_ref(region);
        let mut totals = lock(&node.totals);
        *totals
            .entry(record.date)
            .or_default()
            .entry(record.origin)
            .or_default() += record.counts;
    }

    /// Child of `parent` named `name`, if it exists.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(parent, name.to_string()))
            .copied()
    }

    /// Country node named `name`.
    pub fn country(&self, name: &str) -> Option<NodeId> {
        self.child(NodeId::ROOT, name)
    }

    /// Region `region` of country `country`.
    pub fn region(&self, country: &str, region: &str) -> Option<NodeId> {
        self.country(country)
            .and_then(|country| self.child(country, region))
    }

    /// Country nodes sorted by name.
    pub fn countries(&self) -> Vec<NodeId> {
        self.children(NodeId::ROOT)
    }

    /// Children of `id` sorted by name.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<(String, NodeId)> = self
            .node_ref(id)
            .children()
            .into_iter()
            .map(|child| (self.name(child), child))
            .collect();
        children.sort();
        children.into_iter().map(|(_, id)| id).collect()
    }

    pub fn name(&self, id: NodeId) -> String {
        self.node_ref(id).name.clone()
    }

    /// Parent of `id`; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_ref(id).parent
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// Gap-free daily series of `id` with derived metrics.
    ///
    /// Fails with `EmptyInput` when the node has no days left after source
    /// priority is applied.
    pub fn build_series(&self, id: NodeId) -> Result<Vec<DailyEntry>> {
        build_series(&self.daily_totals(id))
    }

    /// Cumulative counts of `id` per day.
    ///
    /// Region nodes report only days they have data for, except that
    /// `Main territory` with sibling regions is zero on the days of the
    /// country's range it has no data for. Other nodes report every day of
    /// their range, each child carrying its last known totals.
    pub fn daily_totals(&self, id: NodeId) -> BTreeMap<NaiveDate, Counts> {
        match self.country_of(id) {
            Some(country) if country == id => self.country_totals(country),
            Some(country) => self
                .region_totals(country)
                .into_iter()
                .find(|(region, _)| *region == id)
                .map(|(_, totals)| totals)
                .unwrap_or_default(),
            None => sum_children(
                self.children(id)
                    .into_iter()
                    .map(|country| self.country_totals(country))
                    .collect(),
            ),
        }
    }

    fn country_totals(&self, country: NodeId) -> BTreeMap<NaiveDate, Counts> {
        sum_children(
            self.region_totals(country)
                .into_iter()
                .map(|(_, totals)| totals)
                .collect(),
        )
    }

    /// Daily totals of every region of `country`, as [`daily_totals`] reports
    /// them for each region.
    ///
    /// [`daily_totals`]: AggregationGraph::daily_totals
    pub fn region_totals(&self, country: NodeId) -> Vec<(NodeId, BTreeMap<NaiveDate, Counts>)> {
        let winners = self.winners(country);
        let mut regions: Vec<_> = self
            .children(country)
            .into_iter()
            .map(|region| {
                let is_main = self.node_ref(region).name == MAIN_TERRITORY;
                (region, is_main, self.region_days(region, &winners))
            })
            .collect();

        let has_siblings = regions
            .iter()
            .any(|(_, is_main, totals)| !is_main && !totals.is_empty());
        if has_siblings {
            let days = regions.iter().flat_map(|(_, _, t)| t.keys().copied());
            if let Ok(range) = continuous_range(days) {
                for (_, _, totals) in regions
                    .iter_mut()
                    .filter(|(_, is_main, totals)| *is_main && !totals.is_empty())
                {
                    for day in range {
                        totals.entry(day).or_default();
                    }
                }
            }
        }

        regions
            .into_iter()
            .map(|(region, _, totals)| (region, totals))
            .collect()
    }

    /// Days with data of one region node, keeping the winning origin per day.
    fn region_days(&self, region: NodeId, winners: &Winners) -> BTreeMap<NaiveDate, Counts> {
        lock(&self.node_ref(region).totals)
            .iter()
            .filter_map(|(date, by_origin)| {
                let counts = match winners.get(date) {
                    Some(origin) => by_origin.get(origin).copied(),
                    None => Some(by_origin.values().copied().sum()),
                };
                counts.map(|c| (*date, c))
            })
            .collect()
    }

    /// Highest-priority origin per day across the regions of `country`.
    fn winners(&self, country: NodeId) -> Winners {
        let mut winners = Winners::new();
        if !self.source_priority {
            return winners;
        }

        for region in self.node_ref(country).children() {
            let node = self.node_ref(region);
            for (date, by_origin) in lock(&node.totals).iter() {
                if let Some(best) = by_origin.keys().max_by_key(|o| o.priority()) {
                    winners
                        .entry(*date)
                        .and_modify(|w| {
                            if best.priority() > w.priority() {
                                *w = *best;
                            }
                        })
                        .or_insert(*best);
                }
            }
        }

        winners
    }

    /// The country `id` belongs to; `None` for the root.
    fn country_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.parent(current) {
                None => return None,
                Some(NodeId::ROOT) => return Some(current),
                Some(parent) => current = parent,
            }
        }
    }

    fn node_ref(&self, id: NodeId) -> Arc<Node> {
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&nodes[id.0])
    }

    fn child_or_insert(&self, parent: NodeId, name: &str) -> NodeId {
        if let Some(id) = self.child(parent, name) {
            return id;
        }

        let mut index = self.index.write().unwrap_or_else(PoisonError::into_inner);
        let key = (parent, name.to_string());
        if let Some(id) = index.get(&key) {
            return *id;
        }

        let id = {
            let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
            nodes.push(Arc::new(Node::new(name, Some(parent))));
            NodeId(nodes.len() - 1)
        };
        lock(&self.node_ref(parent).children).push(id);
        index.insert(key, id);

        debug!(node = id.0, parent = parent.0, name, "created aggregation node");
        id
    }
}

impl Default for AggregationGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum children's daily totals over the union of their days.
///
/// Each child carries its last value forward.
fn sum_children(children: Vec<BTreeMap<NaiveDate, Counts>>) -> BTreeMap<NaiveDate, Counts> {
    let Ok(range) = continuous_range(children.iter().flat_map(|t| t.keys().copied())) else {
        return BTreeMap::new();
    };

    range
        .into_iter()
        .map(|day| {
            let total = children.iter().map(|totals| carried(totals, day)).sum();
            (day, total)
        })
        .collect()
}

/// Last value on or before `day`, zero before the first.
fn carried(totals: &BTreeMap<NaiveDate, Counts>, day: NaiveDate) -> Counts {
    totals
        .range(..=day)
        .next_back()
        .map(|(_, counts)| *counts)
        .unwrap_or_default()
}

impl std::fmt::Debug for AggregationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationGraph")
            .field("nodes", &self.len())
            .field("source_priority", &self.source_priority)
            .finish()
    }
}
