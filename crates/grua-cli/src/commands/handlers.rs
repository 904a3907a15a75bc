use anyhow::{Context, Result, anyhow, bail};
use grua_console::autocomplete::{InputEvent, Rect};
use grua_console::editors::{ClassesEditor, RulesEditor, VariablesEditor};
use grua_console::models::SearchableRecord;
use grua_console::search::{Matcher, SearchIndex};
use grua_console::sync::{MasterZone, MasterZoneSync};
use grua_console::{ConsoleClient, PatternMode, Transport};
use serde::Serialize;

use super::support::{ensure_loaded, print_json, report_commit};
use crate::cli::{DatasetArg, SearchArgs, SyncArgs};

#[derive(Debug, Serialize)]
pub(super) struct SuggestionLine {
    pub id: String,
    pub label: String,
    pub marked: String,
}

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    dataset: &'static str,
    query: &'a str,
    pattern_mode: &'static str,
    suggestions: Vec<SuggestionLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

pub(super) fn handle_search<T: Transport>(client: &ConsoleClient<T>, args: &SearchArgs) -> Result<()> {
    let records = match args.dataset {
        DatasetArg::Classes => client.list_classes(args.environment.as_deref()),
        DatasetArg::Certname => client.list_nodes(args.master_zone.as_deref()),
        DatasetArg::Facts => client.list_facts(args.master_zone.as_deref()),
    }
    .with_context(|| format!("failed to fetch dataset {}", args.dataset.key()))?;

    let mode = client.config().pattern_mode;
    let suggestions = filter_dataset(mode, args.dataset, records, &args.query)?;
    let message = suggestions
        .is_empty()
        .then_some(grua_console::autocomplete::NOTHING_FOUND_LABEL);
    print_json(&SearchOutput {
        dataset: args.dataset.key(),
        query: &args.query,
        pattern_mode: mode.as_str(),
        suggestions,
        message,
    })
}

pub(super) fn filter_dataset(
    mode: PatternMode,
    dataset: DatasetArg,
    records: Vec<SearchableRecord>,
    query: &str,
) -> Result<Vec<SuggestionLine>> {
    let mut index = SearchIndex::new();
    index.load(dataset.key(), records);
    let suggestions = Matcher::new(mode)
        .filter(query, index.query(dataset.key()), dataset.display_field())
        .with_context(|| format!("invalid search pattern {query:?}"))?;
    Ok(suggestions
        .into_iter()
        .map(|suggestion| SuggestionLine {
            marked: suggestion.render_marked(),
            id: suggestion.record_id.to_string(),
            label: suggestion.label,
        })
        .collect())
}

#[derive(Debug, Serialize)]
struct ClassLine {
    class: String,
    class_id: Option<String>,
    parameters: Vec<(String, String)>,
    available_parameters: Vec<String>,
}

pub(super) fn handle_classes_show<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    environment: Option<String>,
) -> Result<()> {
    let mut editor = ClassesEditor::new(group, environment, client.config());
    editor.load(client);
    ensure_loaded(editor.chrome())?;

    let classes: Vec<ClassLine> = editor
        .blocks()
        .map(|(_, block)| ClassLine {
            class: block.name.clone(),
            class_id: block.class_id.as_ref().map(ToString::to_string),
            parameters: block
                .rows
                .rows()
                .map(|row| (row.get("parameter").to_string(), row.get("value").to_string()))
                .collect(),
            available_parameters: block
                .form
                .options()
                .iter()
                .filter(|option| !option.disabled)
                .map(|option| option.spec.name.clone())
                .collect(),
        })
        .collect();
    print_json(&classes)
}

pub(super) fn handle_rules_show<T: Transport>(client: &ConsoleClient<T>, group: &str) -> Result<()> {
    let editor = load_rules(client, group, None)?;
    let facts: Vec<_> = editor.rules().map(|(_, rule)| rule).collect();
    let nodes: Vec<_> = editor.pinned().map(|(_, row)| row.get("node")).collect();
    print_json(&serde_json::json!({
        "match_type": editor.match_type(),
        "facts": facts,
        "nodes": nodes,
        "pinned_count": editor.pinned_count(),
    }))
}

/// Pins `certname` the way the page does: type it, click the matching
/// suggestion, press pin.
pub(super) fn handle_rules_pin<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    certname: &str,
    master_zone: Option<String>,
) -> Result<()> {
    let mut editor = load_rules(client, group, master_zone)?;
    editor.node_event(InputEvent::Focus {
        bounds: Rect::default(),
        scroll_y: 0.0,
    });
    editor.node_event(InputEvent::KeyUp {
        text: certname.to_string(),
    });
    let record_id = editor
        .node_input()
        .list()
        .items()
        .iter()
        .find(|suggestion| suggestion.label == certname)
        .map(|suggestion| suggestion.record_id.clone())
        .ok_or_else(|| anyhow!("node {certname} is unknown or already pinned"))?;
    editor.node_event(InputEvent::SuggestionClicked { record_id });
    editor.pin_node()?;

    let outcome = editor.commit(client);
    report_commit(outcome, editor.chrome())
}

pub(super) fn handle_rules_unpin<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    certname: &str,
) -> Result<()> {
    let mut editor = load_rules(client, group, None)?;
    let Some(row) = editor.find_pinned(certname) else {
        bail!("node {certname} is not pinned to {group}");
    };
    editor.unpin_node(row)?;

    let outcome = editor.commit(client);
    report_commit(outcome, editor.chrome())
}

fn load_rules<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    master_zone: Option<String>,
) -> Result<RulesEditor> {
    let mut editor = RulesEditor::new(group, master_zone, client.config());
    editor.load(client);
    ensure_loaded(editor.chrome())?;
    Ok(editor)
}

pub(super) fn handle_variables_show<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
) -> Result<()> {
    let editor = load_variables(client, group)?;
    let rows: Vec<_> = editor.rows().map(|(_, row)| &row.fields).collect();
    print_json(&rows)
}

pub(super) fn handle_variables_set<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let mut editor = load_variables(client, group)?;
    let existing: Vec<_> = editor.find(key).collect();
    for row in existing {
        editor.remove_variable(row)?;
    }
    editor.set_key(key);
    editor.set_value(value);
    editor.add_variable()?;

    let outcome = editor.commit(client);
    report_commit(outcome, editor.chrome())
}

pub(super) fn handle_variables_unset<T: Transport>(
    client: &ConsoleClient<T>,
    group: &str,
    key: &str,
) -> Result<()> {
    let mut editor = load_variables(client, group)?;
    let existing: Vec<_> = editor.find(key).collect();
    if existing.is_empty() {
        bail!("variable {key} is not set on {group}");
    }
    for row in existing {
        editor.remove_variable(row)?;
    }

    let outcome = editor.commit(client);
    report_commit(outcome, editor.chrome())
}

fn load_variables<T: Transport>(client: &ConsoleClient<T>, group: &str) -> Result<VariablesEditor> {
    let mut editor = VariablesEditor::new(group);
    editor.load(client);
    ensure_loaded(editor.chrome())?;
    Ok(editor)
}

pub(super) fn handle_sync<T: Transport>(client: &ConsoleClient<T>, args: &SyncArgs) -> Result<()> {
    let zone = MasterZone {
        id: args.master_id.clone(),
        label: args.label.clone().unwrap_or_else(|| args.master_id.clone()),
    };
    let mut sync = MasterZoneSync::new();
    let outcome = sync.trigger(client, &zone);
    let text = sync
        .banner()
        .map(|banner| banner.text.clone())
        .unwrap_or_default();
    match outcome {
        Ok(()) => print_json(&sync.banner()),
        Err(err) => Err(anyhow!(text).context(format!("sync failed ({})", err.code()))),
    }
}
