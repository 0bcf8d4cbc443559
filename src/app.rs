use std::collections::BTreeSet;

use crate::cli::{Cli, Commands, OutputFormat, resolve_command};
use crate::core::{
    AnalysisView, ExpandState, FetchOutcome, LogFilter, NodeKey, VisibleRow,
    interaction_leaf_total, total_watch_time,
};
use crate::error::{AppError, SourceError};
use crate::output::{
    TableOptions, interactions_csv, interactions_json, matrix_csv, matrix_json,
    render_interaction_table, render_matrix_table, render_watch_table, watch_csv, watch_json,
};
use crate::source::{
    ApiSource, FileSource, Source, load_interactions, load_matrix, load_watch_logs,
};
use crate::utils::{Timezone, parse_date};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) filter: LogFilter,
    pub(crate) timezone: Timezone,
    /// Nodes named with `--expand`, already deduplicated
    pub(crate) requested: ExpandState,
}

impl CommandContext<'_> {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            use_color: self.cli.use_color(),
            timezone: self.timezone,
        }
    }
}

/// Run one fetch through the view's request guard
fn fetch_into<R>(
    view: &mut AnalysisView<R>,
    load: impl FnOnce() -> Result<Vec<R>, SourceError>,
) -> Result<(), AppError> {
    let request = view.begin_fetch();
    match load() {
        Ok(records) => {
            if view.complete(request, records) == FetchOutcome::Stale {
                tracing::warn!("fetch result superseded by a newer request");
            }
            tracing::debug!(
                records = view.records().len(),
                loading = view.is_loading(),
                "fetch applied"
            );
            Ok(())
        }
        Err(err) => {
            view.fail(request);
            Err(err.into())
        }
    }
}

/// Every toggleable key in a loaded tree
fn tree_keys(all: ExpandState) -> BTreeSet<NodeKey> {
    all.keys().cloned().collect()
}

/// Open the requested nodes on a freshly loaded view. `available` holds
/// every key the current tree has.
fn apply_expansion<R>(
    view: &mut AnalysisView<R>,
    ctx: &CommandContext<'_>,
    available: &BTreeSet<NodeKey>,
) {
    if ctx.cli.expand_all {
        for key in available {
            view.toggle(key);
        }
        return;
    }
    if ctx.requested.is_empty() {
        return;
    }
    for key in ctx.requested.keys() {
        if !available.contains(key) {
            tracing::warn!(%key, "no such node in the current logs");
        }
        view.toggle(key);
    }
    tracing::debug!(expanded = view.expand_state().keys().count(), "applied expand keys");
}

/// Requested keys that exist in the tree but sit under a collapsed parent
fn hidden_keys<'a>(
    requested: &'a ExpandState,
    available: &BTreeSet<NodeKey>,
    rows: &[VisibleRow],
) -> Vec<&'a NodeKey> {
    let shown: BTreeSet<&NodeKey> = rows.iter().filter_map(|row| row.key.as_ref()).collect();
    requested
        .keys()
        .filter(|key| available.contains(*key) && !shown.contains(key))
        .collect()
}

fn note_hidden_keys(ctx: &CommandContext<'_>, available: &BTreeSet<NodeKey>, rows: &[VisibleRow]) {
    for key in hidden_keys(&ctx.requested, available, rows) {
        tracing::debug!(%key, "expanded node is hidden by a collapsed parent");
    }
}

fn handle_interactions(source: &dyn Source, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let mut view = AnalysisView::new();
    fetch_into(&mut view, || {
        load_interactions(source, &ctx.filter, ctx.timezone)
    })?;

    let order = ctx.cli.child_order();
    let tree = view.tree(order);
    let total = interaction_leaf_total(&tree);
    match ctx.cli.output_format() {
        OutputFormat::Json => println!("{}", interactions_json(&tree, total)?),
        OutputFormat::Csv => print!("{}", interactions_csv(&tree)),
        OutputFormat::Table => {
            let available = tree_keys(ExpandState::all_interactions(&tree));
            apply_expansion(&mut view, ctx, &available);
            let rows = view.visible_rows(order);
            note_hidden_keys(ctx, &available, &rows);
            print!(
                "{}",
                render_interaction_table(&rows, total, ctx.table_options())
            );
        }
    }
    Ok(())
}

fn handle_watch(source: &dyn Source, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let mut view = AnalysisView::new();
    fetch_into(&mut view, || {
        load_watch_logs(source, &ctx.filter, ctx.timezone)
    })?;

    let tree = view.tree();
    match ctx.cli.output_format() {
        OutputFormat::Json => println!("{}", watch_json(&tree)?),
        OutputFormat::Csv => print!("{}", watch_csv(&tree)),
        OutputFormat::Table => {
            let total = total_watch_time(&tree);
            let available = tree_keys(ExpandState::all_watch(&tree));
            apply_expansion(&mut view, ctx, &available);
            let rows = view.visible_rows();
            note_hidden_keys(ctx, &available, &rows);
            print!("{}", render_watch_table(&rows, total, ctx.table_options()));
        }
    }
    Ok(())
}

fn handle_matrix(source: &dyn Source, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let matrix = load_matrix(source)?;
    match ctx.cli.output_format() {
        OutputFormat::Json => println!("{}", matrix_json(&matrix)?),
        OutputFormat::Csv => print!("{}", matrix_csv(&matrix)),
        OutputFormat::Table => print!("{}", render_matrix_table(&matrix, ctx.cli.use_color())),
    }
    Ok(())
}

/// Search filter from the global date range and the subcommand's own flags
pub(crate) fn build_filter(cli: &Cli, command: &Commands) -> Result<LogFilter, AppError> {
    let mut filter = LogFilter {
        since: cli.since.as_deref().map(parse_date).transpose()?,
        until: cli.until.as_deref().map(parse_date).transpose()?,
        ..LogFilter::default()
    };
    match command {
        Commands::Interactions(args) => {
            filter.team = args.team.clone();
            filter.category = args.category.clone();
            filter.user_id = args.user.clone();
        }
        Commands::Watch(args) => {
            filter.user_id = args.user.clone();
            filter.video_title = args.video_title.clone();
        }
        Commands::Matrix => {}
    }
    Ok(filter)
}

fn build_source(cli: &Cli) -> Box<dyn Source> {
    match &cli.input {
        Some(path) => Box::new(FileSource::new(path.clone())),
        None => Box::new(ApiSource::new(
            cli.api_url(),
            cli.token.clone(),
            cli.timeout(),
        )),
    }
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let command = resolve_command(cli.command.as_ref());
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let requested = cli
        .expand
        .iter()
        .map(|spec| NodeKey::parse(spec))
        .collect::<Result<ExpandState, AppError>>()?;

    let ctx = CommandContext {
        cli,
        filter: build_filter(cli, &command)?,
        timezone,
        requested,
    };
    let source = build_source(cli);
    tracing::debug!(source = %source.display_name(), ?command, "running command");

    match command {
        Commands::Interactions(_) => handle_interactions(source.as_ref(), &ctx),
        Commands::Watch(_) => handle_watch(source.as_ref(), &ctx),
        Commands::Matrix => handle_matrix(source.as_ref(), &ctx),
    }
}
