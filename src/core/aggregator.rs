//! Hierarchical aggregation of flat log lists
//!
//! Interaction logs become Team → User → Category → Item trees, watch logs
//! become Video → log trees. Every level accumulates its rollup while the
//! records stream past in input order, then the top level is sorted by that
//! rollup, highest first. Sorting is stable, so equal totals keep the order
//! in which their keys were first seen.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::core::types::{
    CategoryGroup, InteractionRecord, ItemSummary, TeamGroup, UserGroup, VideoGroup, WatchRecord,
};

/// Ordering applied below the top level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ChildOrder {
    /// Keys in first-seen order (default)
    #[default]
    Insertion,
    /// Same stable descending sort as the top level
    ByTotal,
}

/// Insertion-ordered map from group key to accumulator
struct Ordered<T> {
    index: HashMap<String, usize>,
    nodes: Vec<T>,
}

impl<T> Ordered<T> {
    fn new() -> Self {
        Ordered {
            index: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.nodes.len();
                self.nodes.push(make());
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &mut self.nodes[idx]
    }

    fn into_vec(self) -> Vec<T> {
        self.nodes
    }
}

fn latest(current: Option<DateTime<Utc>>, candidate: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    // Strictly later only; equal timestamps keep the existing value
    match (current, candidate) {
        (Some(c), Some(n)) if n > c => Some(n),
        (None, Some(n)) => Some(n),
        (c, _) => c,
    }
}

fn earliest(current: Option<DateTime<Utc>>, candidate: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (current, candidate) {
        (Some(c), Some(n)) if n < c => Some(n),
        (None, Some(n)) => Some(n),
        (c, _) => c,
    }
}

struct CategoryAccumulator {
    name: String,
    total_count: u64,
    items: Ordered<ItemSummary>,
}

impl CategoryAccumulator {
    fn add(&mut self, record: &InteractionRecord) {
        self.total_count += 1;
        let item = self.items.get_or_insert_with(&record.item_id, || ItemSummary {
            item_id: record.item_id.clone(),
            title: record.item_title.clone(),
            count: 0,
            last_at: record.created_at,
        });
        item.count += 1;
        item.last_at = latest(item.last_at, record.created_at);
    }

    fn finish(self, order: ChildOrder) -> CategoryGroup {
        let mut items = self.items.into_vec();
        if order == ChildOrder::ByTotal {
            items.sort_by(|a, b| b.count.cmp(&a.count));
        }
        CategoryGroup {
            name: self.name,
            total_count: self.total_count,
            items,
        }
    }
}

struct UserAccumulator {
    id: String,
    name: String,
    total_count: u64,
    categories: Ordered<CategoryAccumulator>,
}

impl UserAccumulator {
    fn add(&mut self, record: &InteractionRecord) {
        self.total_count += 1;
        self.categories
            .get_or_insert_with(&record.category, || CategoryAccumulator {
                name: record.category.clone(),
                total_count: 0,
                items: Ordered::new(),
            })
            .add(record);
    }

    fn finish(self, order: ChildOrder) -> UserGroup {
        let mut categories: Vec<CategoryGroup> = self
            .categories
            .into_vec()
            .into_iter()
            .map(|c| c.finish(order))
            .collect();
        if order == ChildOrder::ByTotal {
            categories.sort_by(|a, b| b.total_count.cmp(&a.total_count));
        }
        UserGroup {
            id: self.id,
            name: self.name,
            total_count: self.total_count,
            categories,
        }
    }
}

struct TeamAccumulator {
    name: String,
    total_count: u64,
    users: Ordered<UserAccumulator>,
}

impl TeamAccumulator {
    fn add(&mut self, record: &InteractionRecord) {
        self.total_count += 1;
        self.users
            .get_or_insert_with(&record.user_id, || UserAccumulator {
                id: record.user_id.clone(),
                // First record seen for the user names it
                name: record.display_name.clone(),
                total_count: 0,
                categories: Ordered::new(),
            })
            .add(record);
    }

    fn finish(self, order: ChildOrder) -> TeamGroup {
        let mut users: Vec<UserGroup> = self
            .users
            .into_vec()
            .into_iter()
            .map(|u| u.finish(order))
            .collect();
        if order == ChildOrder::ByTotal {
            users.sort_by(|a, b| b.total_count.cmp(&a.total_count));
        }
        TeamGroup {
            name: self.name,
            total_count: self.total_count,
            users,
        }
    }
}

/// Group interaction records into Team → User → Category → Item
pub(crate) fn aggregate_interactions(
    records: &[InteractionRecord],
    order: ChildOrder,
) -> Vec<TeamGroup> {
    let mut teams: Ordered<TeamAccumulator> = Ordered::new();

    for record in records {
        teams
            .get_or_insert_with(&record.team, || TeamAccumulator {
                name: record.team.clone(),
                total_count: 0,
                users: Ordered::new(),
            })
            .add(record);
    }

    let mut teams: Vec<TeamGroup> = teams
        .into_vec()
        .into_iter()
        .map(|t| t.finish(order))
        .collect();
    teams.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    teams
}

/// Group watch records by video title, summing watch time
pub(crate) fn aggregate_watch(records: &[WatchRecord]) -> Vec<VideoGroup> {
    let mut videos: Ordered<VideoGroup> = Ordered::new();

    for record in records {
        let group = videos.get_or_insert_with(&record.video_title, || VideoGroup {
            title: record.video_title.clone(),
            total_watch_time: 0,
            first_at: record.last_watched_at,
            last_at: record.last_watched_at,
            logs: Vec::new(),
        });
        group.total_watch_time = group.total_watch_time.saturating_add(record.watch_time);
        group.first_at = earliest(group.first_at, record.last_watched_at);
        group.last_at = latest(group.last_at, record.last_watched_at);
        group.logs.push(record.clone());
    }

    let mut videos = videos.into_vec();
    videos.sort_by(|a, b| b.total_watch_time.cmp(&a.total_watch_time));
    videos
}

/// Watch time across every video; clamps at `u64::MAX` like the per-video rollup
pub(crate) fn total_watch_time(videos: &[VideoGroup]) -> u64 {
    videos
        .iter()
        .map(|v| v.total_watch_time)
        .fold(0, u64::saturating_add)
}

/// Number of records represented by the leaves of an interaction tree
pub(crate) fn interaction_leaf_total(teams: &[TeamGroup]) -> u64 {
    teams
        .iter()
        .flat_map(|t| &t.users)
        .flat_map(|u| &u.categories)
        .flat_map(|c| &c.items)
        .map(|i| i.count)
        .sum()
}
