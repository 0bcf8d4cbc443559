use serde_json::json;

use crate::core::{TeamGroup, VideoGroup, WatchMatrix, total_watch_time};

/// Full interaction tree; JSON output ignores the expand state
pub(crate) fn interactions_json(
    teams: &[TeamGroup],
    total: u64,
) -> Result<String, serde_json::Error> {
    let output = json!({
        "total_interactions": total,
        "teams": teams,
    });
    serde_json::to_string_pretty(&output)
}

pub(crate) fn watch_json(videos: &[VideoGroup]) -> Result<String, serde_json::Error> {
    let output = json!({
        "total_watch_time": total_watch_time(videos),
        "videos": videos,
    });
    serde_json::to_string_pretty(&output)
}

/// Matrix with one entry per user listing the cells that exist, in video order
pub(crate) fn matrix_json(matrix: &WatchMatrix) -> Result<String, serde_json::Error> {
    let rows: Vec<serde_json::Value> = matrix
        .users
        .iter()
        .map(|user| {
            let cells: Vec<serde_json::Value> = matrix
                .videos
                .iter()
                .filter_map(|video| {
                    matrix.cell(user, video).map(|cell| {
                        json!({
                            "video_id": video.id,
                            "time": cell.time,
                            "views": cell.views,
                        })
                    })
                })
                .collect();
            json!({
                "user_id": user.id,
                "name": user.name,
                "cells": cells,
            })
        })
        .collect();

    let output = json!({
        "videos": matrix.videos,
        "users": rows,
    });
    serde_json::to_string_pretty(&output)
}
