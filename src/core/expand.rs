//! Expand/collapse state for tree tables
//!
//! A node is collapsed unless its key is in the set. Keys are typed per
//! level, so a team and a user with the same name, or a user id containing
//! a separator, never alias each other.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::types::{TeamGroup, VideoGroup};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum NodeKey {
    Team(String),
    /// Users are keyed by id alone: expanding a user expands it under every team
    User(String),
    Category { user: String, category: String },
    Video(String),
}

impl NodeKey {
    /// Parse the CLI form: `team=<name>`, `user=<id>`,
    /// `category=<user>/<category>` or `video=<title>`.
    ///
    /// For categories the split happens at the last `/`, since category
    /// names never contain one while user ids might.
    pub(crate) fn parse(spec: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidExpandKey {
            input: spec.to_string(),
        };
        let (level, value) = spec.split_once('=').ok_or_else(invalid)?;
        if value.is_empty() {
            return Err(invalid());
        }
        match level.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(NodeKey::Team(value.to_string())),
            "user" => Ok(NodeKey::User(value.to_string())),
            "video" => Ok(NodeKey::Video(value.to_string())),
            "category" => {
                let (user, category) = value.rsplit_once('/').ok_or_else(invalid)?;
                if user.is_empty() || category.is_empty() {
                    return Err(invalid());
                }
                Ok(NodeKey::Category {
                    user: user.to_string(),
                    category: category.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Team(name) => write!(f, "team={name}"),
            NodeKey::User(id) => write!(f, "user={id}"),
            NodeKey::Category { user, category } => write!(f, "category={user}/{category}"),
            NodeKey::Video(title) => write!(f, "video={title}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpandState {
    expanded: BTreeSet<NodeKey>,
}

impl ExpandState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.contains(key)
    }

    /// Copy of the state with `key` flipped
    pub(crate) fn toggle(&self, key: &NodeKey) -> Self {
        let mut next = self.clone();
        if !next.expanded.remove(key) {
            next.expanded.insert(key.clone());
        }
        next
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.expanded.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Every expandable node of an interaction tree
    pub(crate) fn all_interactions(teams: &[TeamGroup]) -> Self {
        let mut keys = Vec::new();
        for team in teams {
            keys.push(NodeKey::Team(team.name.clone()));
            for user in &team.users {
                keys.push(NodeKey::User(user.id.clone()));
                for category in &user.categories {
                    keys.push(NodeKey::Category {
                        user: user.id.clone(),
                        category: category.name.clone(),
                    });
                }
            }
        }
        keys.into_iter().collect()
    }

    /// Every expandable node of a watch tree
    pub(crate) fn all_watch(videos: &[VideoGroup]) -> Self {
        videos
            .iter()
            .map(|v| NodeKey::Video(v.title.clone()))
            .collect()
    }
}

impl FromIterator<NodeKey> for ExpandState {
    fn from_iter<I: IntoIterator<Item = NodeKey>>(iter: I) -> Self {
        ExpandState {
            expanded: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str) -> NodeKey {
        NodeKey::Team(name.to_string())
    }

    #[test]
    fn default_is_collapsed() {
        let state = ExpandState::new();
        assert!(!state.is_expanded(&team("shop")));
        assert!(state.is_empty());
    }

    #[test]
    fn toggle_expands_then_collapses() {
        let state = ExpandState::new().toggle(&team("shop"));
        assert!(state.is_expanded(&team("shop")));
        assert!(!state.is_expanded(&team("event")));
        let state = state.toggle(&team("shop"));
        assert!(!state.is_expanded(&team("shop")));
    }

    #[test]
    fn double_toggle_is_identity() {
        let base = ExpandState::new()
            .toggle(&team("shop"))
            .toggle(&NodeKey::User("u1".into()));
        for key in [
            team("shop"),
            team("event"),
            NodeKey::User("u1".into()),
            NodeKey::Category {
                user: "u1".into(),
                category: "post".into(),
            },
        ] {
            assert_eq!(base.toggle(&key).toggle(&key), base);
        }
    }

    #[test]
    fn toggle_leaves_original_untouched() {
        let base = ExpandState::new();
        let _ = base.toggle(&team("shop"));
        assert!(base.is_empty());
    }

    #[test]
    fn category_keys_do_not_collide_on_separator() {
        // "a-b" + "c" and "a" + "b-c" both join to "a-b-c" with a dash
        let left = NodeKey::Category {
            user: "a-b".into(),
            category: "c".into(),
        };
        let right = NodeKey::Category {
            user: "a".into(),
            category: "b-c".into(),
        };
        let state = ExpandState::new().toggle(&left);
        assert!(state.is_expanded(&left));
        assert!(!state.is_expanded(&right));
    }

    #[test]
    fn levels_do_not_alias() {
        let state = ExpandState::new().toggle(&team("u1"));
        assert!(!state.is_expanded(&NodeKey::User("u1".into())));
    }

    #[test]
    fn parse_each_level() {
        assert_eq!(NodeKey::parse("team=shop").unwrap(), team("shop"));
        assert_eq!(
            NodeKey::parse("user=u1").unwrap(),
            NodeKey::User("u1".into())
        );
        assert_eq!(
            NodeKey::parse("video=Intro = Basics").unwrap(),
            NodeKey::Video("Intro = Basics".into())
        );
        assert_eq!(
            NodeKey::parse("category=org/u1/post").unwrap(),
            NodeKey::Category {
                user: "org/u1".into(),
                category: "post".into()
            }
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["shop", "team=", "planet=mars", "category=u1", "category=/post"] {
            let err = NodeKey::parse(bad).unwrap_err();
            assert!(err.to_string().contains(bad), "{bad}");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let key = NodeKey::Category {
            user: "u-1".into(),
            category: "post".into(),
        };
        assert_eq!(NodeKey::parse(&key.to_string()).unwrap(), key);
    }
}
