//! CSV exports, one row per tree leaf
//!
//! Timestamps are written as RFC 3339 in UTC so exports do not depend on the
//! display timezone; a missing timestamp is an empty field.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::core::{TeamGroup, VideoGroup, WatchMatrix, rfc3339};
use crate::output::format::csv_escape;

fn ts_field(ts: Option<DateTime<Utc>>) -> String {
    ts.as_ref().map(rfc3339).unwrap_or_default()
}

pub(crate) fn interactions_csv(teams: &[TeamGroup]) -> String {
    let mut out =
        String::from("team,user_id,user_name,category,item_id,item_title,count,last_at\n");
    for team in teams {
        for user in &team.users {
            for category in &user.categories {
                for item in &category.items {
                    let _ = writeln!(
                        out,
                        "{},{},{},{},{},{},{},{}",
                        csv_escape(&team.name),
                        csv_escape(&user.id),
                        csv_escape(&user.name),
                        csv_escape(&category.name),
                        csv_escape(&item.item_id),
                        csv_escape(&item.title),
                        item.count,
                        ts_field(item.last_at),
                    );
                }
            }
        }
    }
    out
}

pub(crate) fn watch_csv(videos: &[VideoGroup]) -> String {
    let mut out = String::from("video_title,user_id,user_name,watch_time,last_watched_at\n");
    for video in videos {
        for log in &video.logs {
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                csv_escape(&video.title),
                csv_escape(&log.user_id),
                csv_escape(&log.display_name),
                log.watch_time,
                ts_field(log.last_watched_at),
            );
        }
    }
    out
}

/// Dense matrix: every user × video pair, zeros where the API had no cell
pub(crate) fn matrix_csv(matrix: &WatchMatrix) -> String {
    let mut out = String::from("user_id,user_name,video_id,video_title,views,time\n");
    for user in &matrix.users {
        for video in &matrix.videos {
            let cell = matrix.cell(user, video).copied().unwrap_or_default();
            let _ = writeln!(
                out,
                "{},{},{},{},{},{}",
                csv_escape(&user.id),
                csv_escape(&user.name),
                csv_escape(&video.id),
                csv_escape(&video.title),
                cell.views,
                cell.time,
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ChildOrder, InteractionRecord, MatrixUser, MatrixVideo, WatchRecord,
        aggregate_interactions, aggregate_watch,
    };

    #[test]
    fn interaction_leaves_become_rows() {
        let record = InteractionRecord {
            user_id: "u1".into(),
            display_name: "Sato, Aki".into(),
            team: "shop".into(),
            category: "post".into(),
            item_id: "p1".into(),
            item_title: "Hello".into(),
            created_at: "2024-01-02T10:00:00Z".parse().ok(),
        };
        let teams = aggregate_interactions(&[record.clone(), record], ChildOrder::Insertion);
        let out = interactions_csv(&teams);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "shop,u1,\"Sato, Aki\",post,p1,Hello,2,2024-01-02T10:00:00Z"
        );
    }

    #[test]
    fn empty_tree_is_header_only() {
        assert_eq!(interactions_csv(&[]).lines().count(), 1);
        assert_eq!(watch_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn watch_rows_leave_missing_timestamp_blank() {
        let videos = aggregate_watch(&[WatchRecord {
            user_id: "u1".into(),
            display_name: "u1".into(),
            video_title: "Intro".into(),
            watch_time: 90,
            last_watched_at: None,
        }]);
        let out = watch_csv(&videos);
        assert_eq!(out.lines().nth(1), Some("Intro,u1,u1,90,"));
    }

    #[test]
    fn matrix_is_dense() {
        let matrix = WatchMatrix {
            users: vec![MatrixUser {
                id: "1".into(),
                name: "Aki".into(),
            }],
            videos: vec![MatrixVideo {
                id: "10".into(),
                title: "Intro".into(),
            }],
            ..WatchMatrix::default()
        };
        let out = matrix_csv(&matrix);
        assert_eq!(out.lines().nth(1), Some("1,Aki,10,Intro,0,0"));
    }
}
