//! CLI subcommand definitions

use clap::{Args, Subcommand};

/// Main CLI commands
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Interaction logs grouped by team, user and category (default)
    Interactions(InteractionArgs),
    /// Video watch logs grouped by video
    Watch(WatchArgs),
    /// Watch matrix of users against videos
    Matrix,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct InteractionArgs {
    /// Only logs from this team
    #[arg(long)]
    pub(crate) team: Option<String>,

    /// Only logs of this category (post, video, knowhow, task, news, mission, notice)
    #[arg(long)]
    pub(crate) category: Option<String>,

    /// Only logs from this user id
    #[arg(long, value_name = "USER_ID")]
    pub(crate) user: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct WatchArgs {
    /// Only logs from this user id
    #[arg(long, value_name = "USER_ID")]
    pub(crate) user: Option<String>,

    /// Only videos whose title contains this text
    #[arg(long, value_name = "TEXT")]
    pub(crate) video_title: Option<String>,
}

/// Normalized command; a missing subcommand means `interactions`
pub(crate) fn resolve_command(cmd: Option<&Commands>) -> Commands {
    cmd.cloned()
        .unwrap_or_else(|| Commands::Interactions(InteractionArgs::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_defaults_to_interactions() {
        match resolve_command(None) {
            Commands::Interactions(args) => {
                assert!(args.team.is_none());
                assert!(args.category.is_none());
                assert!(args.user.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_command_is_kept() {
        assert!(matches!(
            resolve_command(Some(&Commands::Matrix)),
            Commands::Matrix
        ));
    }
}
