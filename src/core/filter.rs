//! Search filters
//!
//! The API applies these server-side from query parameters. Sources that
//! serve a static export apply them locally through the `matches_*`
//! methods instead.

use chrono::{DateTime, NaiveDate, Utc};

use crate::consts::DATE_FORMAT;
use crate::core::types::{InteractionRecord, WatchRecord};
use crate::utils::Timezone;

pub(crate) type QueryParams = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Default)]
pub(crate) struct LogFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
    pub(crate) user_id: Option<String>,
    pub(crate) team: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) video_title: Option<String>,
}

impl LogFilter {
    pub(crate) fn contains_date(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }

    fn has_date_bounds(&self) -> bool {
        self.since.is_some() || self.until.is_some()
    }

    fn contains_timestamp(&self, ts: Option<DateTime<Utc>>, timezone: Timezone) -> bool {
        if !self.has_date_bounds() {
            return true;
        }
        // An unknown time cannot be placed inside a requested range
        ts.is_some_and(|ts| self.contains_date(timezone.local_date(ts)))
    }

    fn push_dates(&self, params: &mut QueryParams) {
        if let Some(since) = self.since {
            params.push(("start_date", since.format(DATE_FORMAT).to_string()));
        }
        if let Some(until) = self.until {
            params.push(("end_date", until.format(DATE_FORMAT).to_string()));
        }
    }

    /// Query parameters for the interaction-log endpoint
    pub(crate) fn interaction_query(&self) -> QueryParams {
        let mut params = Vec::new();
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(team) = &self.team {
            params.push(("team", team.clone()));
        }
        self.push_dates(&mut params);
        params
    }

    /// Query parameters for the view-log endpoint
    pub(crate) fn watch_query(&self) -> QueryParams {
        let mut params = Vec::new();
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        if let Some(title) = &self.video_title {
            params.push(("video_title", title.clone()));
        }
        self.push_dates(&mut params);
        params
    }

    pub(crate) fn matches_interaction(&self, record: &InteractionRecord, timezone: Timezone) -> bool {
        if self.user_id.as_ref().is_some_and(|u| *u != record.user_id) {
            return false;
        }
        if self.team.as_ref().is_some_and(|t| *t != record.team) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| *c != record.category) {
            return false;
        }
        self.contains_timestamp(record.created_at, timezone)
    }

    pub(crate) fn matches_watch(&self, record: &WatchRecord, timezone: Timezone) -> bool {
        if self.user_id.as_ref().is_some_and(|u| *u != record.user_id) {
            return false;
        }
        if let Some(title) = &self.video_title
            && !record
                .video_title
                .to_lowercase()
                .contains(&title.to_lowercase())
        {
            return false;
        }
        self.contains_timestamp(record.last_watched_at, timezone)
    }
}
