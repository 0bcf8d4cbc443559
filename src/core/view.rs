//! View model for the analysis tables
//!
//! `AnalysisView` owns the current log list and the expand state. The tree
//! itself is never stored: it is recomputed from the records on demand and
//! projected into the rows a table should show, descending only into
//! expanded nodes.

use chrono::{DateTime, Utc};

use crate::core::aggregator::{ChildOrder, aggregate_interactions, aggregate_watch};
use crate::core::expand::{ExpandState, NodeKey};
use crate::core::types::{InteractionRecord, TeamGroup, VideoGroup, WatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    Team,
    User,
    Category,
    Item,
    Video,
    WatchLog,
}

/// One rendered line of a tree table
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VisibleRow {
    pub(crate) depth: usize,
    pub(crate) kind: RowKind,
    /// Present on rows that can be toggled
    pub(crate) key: Option<NodeKey>,
    pub(crate) expanded: bool,
    pub(crate) label: String,
    /// Secondary text, e.g. the user id next to a display name
    pub(crate) detail: Option<String>,
    /// Count for interaction rows, seconds for watch rows
    pub(crate) value: u64,
    pub(crate) first_at: Option<DateTime<Utc>>,
    pub(crate) last_at: Option<DateTime<Utc>>,
}

impl VisibleRow {
    fn group(depth: usize, kind: RowKind, key: NodeKey, state: &ExpandState) -> Self {
        let expanded = state.is_expanded(&key);
        VisibleRow {
            depth,
            kind,
            key: Some(key),
            expanded,
            label: String::new(),
            detail: None,
            value: 0,
            first_at: None,
            last_at: None,
        }
    }

    fn leaf(depth: usize, kind: RowKind) -> Self {
        VisibleRow {
            depth,
            kind,
            key: None,
            expanded: false,
            label: String::new(),
            detail: None,
            value: 0,
            first_at: None,
            last_at: None,
        }
    }
}

/// Rows of an interaction tree under the given expand state
pub(crate) fn visible_interaction_rows(teams: &[TeamGroup], state: &ExpandState) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for team in teams {
        let mut row = VisibleRow::group(0, RowKind::Team, NodeKey::Team(team.name.clone()), state);
        row.label = team.name.clone();
        row.value = team.total_count;
        let open = row.expanded;
        rows.push(row);
        if !open {
            continue;
        }

        for user in &team.users {
            let mut row = VisibleRow::group(1, RowKind::User, NodeKey::User(user.id.clone()), state);
            row.label = user.name.clone();
            row.detail = Some(user.id.clone());
            row.value = user.total_count;
            let open = row.expanded;
            rows.push(row);
            if !open {
                continue;
            }

            for category in &user.categories {
                let key = NodeKey::Category {
                    user: user.id.clone(),
                    category: category.name.clone(),
                };
                let mut row = VisibleRow::group(2, RowKind::Category, key, state);
                row.label = category.name.clone();
                row.value = category.total_count;
                let open = row.expanded;
                rows.push(row);
                if !open {
                    continue;
                }

                for item in &category.items {
                    let mut row = VisibleRow::leaf(3, RowKind::Item);
                    row.label = item.title.clone();
                    row.value = item.count;
                    row.last_at = item.last_at;
                    rows.push(row);
                }
            }
        }
    }
    rows
}

/// Rows of a watch tree under the given expand state
pub(crate) fn visible_watch_rows(videos: &[VideoGroup], state: &ExpandState) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for video in videos {
        let mut row = VisibleRow::group(0, RowKind::Video, NodeKey::Video(video.title.clone()), state);
        row.label = video.title.clone();
        row.value = video.total_watch_time;
        row.first_at = video.first_at;
        row.last_at = video.last_at;
        let open = row.expanded;
        rows.push(row);
        if !open {
            continue;
        }

        for log in &video.logs {
            let mut row = VisibleRow::leaf(1, RowKind::WatchLog);
            row.label = log.user_id.clone();
            if log.display_name != log.user_id {
                row.detail = Some(log.display_name.clone());
            }
            row.value = log.watch_time;
            row.last_at = log.last_watched_at;
            rows.push(row);
        }
    }
    rows
}

/// Generation number of a fetch; later fetches always compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RequestId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    Applied,
    /// A newer fetch was issued after this one; its result was dropped
    Stale,
}

#[derive(Debug)]
pub(crate) struct AnalysisView<R> {
    records: Vec<R>,
    expand: ExpandState,
    issued: u64,
    loading: bool,
}

impl<R> Default for AnalysisView<R> {
    fn default() -> Self {
        AnalysisView {
            records: Vec::new(),
            expand: ExpandState::new(),
            issued: 0,
            loading: false,
        }
    }
}

impl<R> AnalysisView<R> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn records(&self) -> &[R] {
        &self.records
    }

    pub(crate) fn expand_state(&self) -> &ExpandState {
        &self.expand
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a fetch; the returned id must be handed back on completion
    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.issued += 1;
        self.loading = true;
        RequestId(self.issued)
    }

    fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.issued
    }

    /// Install a fetched log list. Only the most recently issued request is
    /// accepted; it replaces the records and collapses every node.
    pub(crate) fn complete(&mut self, id: RequestId, records: Vec<R>) -> FetchOutcome {
        if !self.is_latest(id) {
            tracing::debug!(request = id.0, latest = self.issued, "dropping stale response");
            return FetchOutcome::Stale;
        }
        self.records = records;
        self.expand = ExpandState::new();
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Record a failed fetch. Current records and expand state are kept.
    pub(crate) fn fail(&mut self, id: RequestId) -> FetchOutcome {
        if !self.is_latest(id) {
            return FetchOutcome::Stale;
        }
        self.loading = false;
        FetchOutcome::Applied
    }

    pub(crate) fn toggle(&mut self, key: &NodeKey) {
        self.expand = self.expand.toggle(key);
    }
}

impl AnalysisView<InteractionRecord> {
    pub(crate) fn tree(&self, order: ChildOrder) -> Vec<TeamGroup> {
        aggregate_interactions(&self.records, order)
    }

    pub(crate) fn visible_rows(&self, order: ChildOrder) -> Vec<VisibleRow> {
        visible_interaction_rows(&self.tree(order), &self.expand)
    }
}

impl AnalysisView<WatchRecord> {
    pub(crate) fn tree(&self) -> Vec<VideoGroup> {
        aggregate_watch(&self.records)
    }

    pub(crate) fn visible_rows(&self) -> Vec<VisibleRow> {
        visible_watch_rows(&self.tree(), &self.expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(team: &str, user: &str, category: &str, item: &str) -> InteractionRecord {
        InteractionRecord {
            user_id: user.into(),
            display_name: user.into(),
            team: team.into(),
            category: category.into(),
            item_id: item.into(),
            item_title: format!("title {item}"),
            created_at: "2024-01-01T00:00:00Z".parse().ok(),
        }
    }

    fn watch(video: &str, user: &str, secs: u64) -> WatchRecord {
        WatchRecord {
            user_id: user.into(),
            display_name: user.into(),
            video_title: video.into(),
            watch_time: secs,
            last_watched_at: None,
        }
    }

    fn sample() -> Vec<InteractionRecord> {
        vec![
            rec("shop", "u1", "post", "p1"),
            rec("shop", "u1", "video", "v1"),
            rec("shop", "u2", "post", "p1"),
            rec("event", "u3", "task", "t1"),
        ]
    }

    fn kinds(rows: &[VisibleRow]) -> Vec<RowKind> {
        rows.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn collapsed_tree_shows_only_top_level() {
        let teams = aggregate_interactions(&sample(), ChildOrder::Insertion);
        let rows = visible_interaction_rows(&teams, &ExpandState::new());
        assert_eq!(kinds(&rows), vec![RowKind::Team, RowKind::Team]);
        assert_eq!(rows[0].label, "shop");
        assert_eq!(rows[0].value, 3);
        assert!(rows.iter().all(|r| !r.expanded));
    }

    #[test]
    fn expanding_team_reveals_users_only() {
        let teams = aggregate_interactions(&sample(), ChildOrder::Insertion);
        let state = ExpandState::new().toggle(&NodeKey::Team("shop".into()));
        let rows = visible_interaction_rows(&teams, &state);
        assert_eq!(
            kinds(&rows),
            vec![RowKind::Team, RowKind::User, RowKind::User, RowKind::Team]
        );
        assert!(rows[0].expanded);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].detail.as_deref(), Some("u1"));
    }

    #[test]
    fn child_expansion_hidden_under_collapsed_parent() {
        let teams = aggregate_interactions(&sample(), ChildOrder::Insertion);
        // User open, team closed: the user row is not visible at all
        let state = ExpandState::new().toggle(&NodeKey::User("u1".into()));
        let rows = visible_interaction_rows(&teams, &state);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn full_expansion_reaches_items() {
        let teams = aggregate_interactions(&sample(), ChildOrder::Insertion);
        let state = ExpandState::all_interactions(&teams);
        let rows = visible_interaction_rows(&teams, &state);
        let items: Vec<&VisibleRow> = rows.iter().filter(|r| r.kind == RowKind::Item).collect();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|r| r.depth == 3 && r.key.is_none()));
        assert_eq!(items[0].last_at, "2024-01-01T00:00:00Z".parse().ok());
    }

    #[test]
    fn watch_rows_expand_to_logs() {
        let videos = aggregate_watch(&[watch("Intro", "u1", 30), watch("Intro", "u2", 15)]);
        let collapsed = visible_watch_rows(&videos, &ExpandState::new());
        assert_eq!(kinds(&collapsed), vec![RowKind::Video]);
        assert_eq!(collapsed[0].value, 45);

        let state = ExpandState::all_watch(&videos);
        let rows = visible_watch_rows(&videos, &state);
        assert_eq!(
            kinds(&rows),
            vec![RowKind::Video, RowKind::WatchLog, RowKind::WatchLog]
        );
        assert_eq!(rows[2].label, "u2");
        assert_eq!(rows[2].value, 15);
    }

    #[test]
    fn empty_records_give_no_rows() {
        let view: AnalysisView<InteractionRecord> = AnalysisView::new();
        assert!(view.visible_rows(ChildOrder::Insertion).is_empty());
    }

    #[test]
    fn completed_fetch_replaces_records_and_collapses() {
        let mut view = AnalysisView::new();
        let id = view.begin_fetch();
        assert!(view.is_loading());
        assert_eq!(view.complete(id, sample()), FetchOutcome::Applied);
        assert!(!view.is_loading());

        view.toggle(&NodeKey::Team("shop".into()));
        assert!(!view.expand_state().is_empty());

        let id = view.begin_fetch();
        assert_eq!(
            view.complete(id, vec![rec("event", "u9", "post", "p1")]),
            FetchOutcome::Applied
        );
        assert!(view.expand_state().is_empty());
        assert_eq!(view.records().len(), 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view = AnalysisView::new();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        assert_eq!(
            view.complete(second, vec![rec("event", "u3", "task", "t1")]),
            FetchOutcome::Applied
        );
        view.toggle(&NodeKey::Team("event".into()));

        // The slower, older response resolves last and must not win
        assert_eq!(view.complete(first, sample()), FetchOutcome::Stale);
        assert_eq!(view.records().len(), 1);
        assert!(view.expand_state().is_expanded(&NodeKey::Team("event".into())));
    }

    #[test]
    fn failed_fetch_keeps_previous_records() {
        let mut view = AnalysisView::new();
        let id = view.begin_fetch();
        view.complete(id, sample());
        view.toggle(&NodeKey::Team("shop".into()));

        let id = view.begin_fetch();
        assert_eq!(view.fail(id), FetchOutcome::Applied);
        assert!(!view.is_loading());
        assert_eq!(view.records().len(), 4);
        assert!(!view.expand_state().is_empty());
    }

    #[test]
    fn stale_failure_does_not_clear_loading() {
        let mut view: AnalysisView<WatchRecord> = AnalysisView::new();
        let first = view.begin_fetch();
        let _second = view.begin_fetch();
        assert_eq!(view.fail(first), FetchOutcome::Stale);
        assert!(view.is_loading());
    }

    #[test]
    fn request_ids_increase() {
        let mut view: AnalysisView<WatchRecord> = AnalysisView::new();
        let a = view.begin_fetch();
        let b = view.begin_fetch();
        assert!(b > a);
    }

    #[test]
    fn expand_state_persists_across_rerenders() {
        let mut view = AnalysisView::new();
        let id = view.begin_fetch();
        view.complete(id, sample());
        view.toggle(&NodeKey::Team("event".into()));
        let first = view.visible_rows(ChildOrder::Insertion);
        let second = view.visible_rows(ChildOrder::Insertion);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
