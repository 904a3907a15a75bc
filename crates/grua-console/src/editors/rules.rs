use crate::autocomplete::{AutocompleteController, InputEvent, Selection};
use crate::client::{ConsoleClient, Transport};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, GENERIC_FAILURE_MESSAGE, Result};
use crate::models::{ActivationState, FactRule, MatchType, RuleOperator, RulesDocument};
use crate::page::{BannerKind, CommitPolicy, EditableList, PageChrome, PendingRow, RowRef};
use crate::search::{DATASET_CERTNAME, DATASET_FACTS, Matcher, SearchIndex};

use super::{RULES_UPDATED, load_dataset};

const POLICY: CommitPolicy = CommitPolicy {
    rearm_on_failure: true,
};

const FIELD_NODE: &str = "node";

/// Rules page of a group: fact rules, match type and pinned nodes.
#[derive(Debug)]
pub struct RulesEditor {
    group: String,
    master_zone: Option<String>,
    index: SearchIndex,
    matcher: Matcher,
    fact_input: AutocompleteController,
    operator: Option<RuleOperator>,
    value: String,
    node_input: AutocompleteController,
    match_type: MatchType,
    rules: EditableList<FactRule>,
    pinned: EditableList,
    chrome: PageChrome,
}

impl RulesEditor {
    pub fn new(
        group: impl Into<String>,
        master_zone: Option<String>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            group: group.into(),
            master_zone,
            index: SearchIndex::new(),
            matcher: Matcher::new(config.pattern_mode),
            fact_input: AutocompleteController::new(DATASET_FACTS, config.list_width_pad),
            operator: None,
            value: String::new(),
            node_input: AutocompleteController::with_display_field(
                DATASET_CERTNAME,
                "certname",
                config.list_width_pad,
            ),
            match_type: MatchType::default(),
            rules: EditableList::new(),
            pinned: EditableList::new(),
            chrome: PageChrome::new(),
        }
    }

    /// Loads the group rules, then the node dataset with pinned nodes
    /// disabled, and the fact dataset.
    pub fn load<T: Transport>(&mut self, client: &ConsoleClient<T>) {
        self.chrome.show_loader();
        let master_zone = self.master_zone.as_deref();

        match client.get_rules(&self.group) {
            Ok(document) => {
                self.match_type = document.match_type;
                self.rules.clear();
                for rule in &document.facts {
                    self.rules.push(rule.clone());
                }
                self.pinned.clear();
                for node in &document.nodes {
                    self.pinned.push(PendingRow::new([(FIELD_NODE, node.as_str())]));
                }

                load_dataset(&mut self.index, DATASET_CERTNAME, client.list_nodes(master_zone));
                for node in &document.nodes {
                    self.index.set_state_by_field(
                        DATASET_CERTNAME,
                        "certname",
                        node,
                        ActivationState::Disabled,
                    );
                }
            }
            Err(_) => {
                self.chrome.show_banner(BannerKind::Danger, GENERIC_FAILURE_MESSAGE);
            }
        }
        self.chrome.hide_loader();

        load_dataset(&mut self.index, DATASET_FACTS, client.list_facts(master_zone));
    }

    pub fn fact_event(&mut self, event: InputEvent) -> Option<Selection> {
        self.fact_input.handle(event, &self.index, &self.matcher)
    }

    pub fn set_operator(&mut self, operator: Option<RuleOperator>) {
        self.operator = operator;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Adding a rule needs a fact, an operator and a value.
    #[must_use]
    pub fn can_add_rule(&self) -> bool {
        !self.fact_input.input_text().is_empty() && self.operator.is_some() && !self.value.is_empty()
    }

    /// Appends a rule row; fact and value inputs are cleared, the operator
    /// stays.
    pub fn add_rule(&mut self) -> Result<RowRef> {
        let Some(operator) = self.operator.filter(|_| self.can_add_rule()) else {
            return Err(ConsoleError::Validation(
                "fact, operator and value are required".to_string(),
            ));
        };
        let row_ref = self.rules.push(FactRule {
            fact: self.fact_input.input_text().to_string(),
            operator,
            value: self.value.clone(),
        });
        self.fact_input.reset();
        self.value.clear();
        self.chrome.mark_dirty();
        Ok(row_ref)
    }

    pub fn remove_rule(&mut self, row_ref: RowRef) -> Result<()> {
        self.rules
            .remove(row_ref)
            .ok_or_else(|| ConsoleError::NotFound("rule row".to_string()))?;
        self.chrome.mark_dirty();
        Ok(())
    }

    pub fn node_event(&mut self, event: InputEvent) -> Option<Selection> {
        self.node_input.handle(event, &self.index, &self.matcher)
    }

    #[must_use]
    pub fn can_pin(&self) -> bool {
        self.node_input.selection().is_some()
    }

    /// Pins the clicked node and disables it in the node dataset.
    pub fn pin_node(&mut self) -> Result<RowRef> {
        let Some(selection) = self.node_input.selection().cloned() else {
            return Err(ConsoleError::Validation(
                "pick a node from the suggestions first".to_string(),
            ));
        };
        self.index.set_state_by_field(
            DATASET_CERTNAME,
            "certname",
            &selection.label,
            ActivationState::Disabled,
        );
        let row = PendingRow::new([(FIELD_NODE, selection.label.as_str())])
            .with_source(selection.record_id);
        let row_ref = self.pinned.push(row);
        self.node_input.reset();
        self.chrome.mark_dirty();
        Ok(row_ref)
    }

    /// Unpins a node and makes it selectable again.
    pub fn unpin_node(&mut self, row_ref: RowRef) -> Result<()> {
        let row = self
            .pinned
            .remove(row_ref)
            .ok_or_else(|| ConsoleError::NotFound("pinned node".to_string()))?;
        self.index.set_state_by_field(
            DATASET_CERTNAME,
            "certname",
            row.get(FIELD_NODE),
            ActivationState::Enabled,
        );
        self.chrome.mark_dirty();
        Ok(())
    }

    /// Row of a pinned certname, if it is pinned.
    #[must_use]
    pub fn find_pinned(&self, certname: &str) -> Option<RowRef> {
        self.pinned
            .iter()
            .find(|(_, row)| row.get(FIELD_NODE) == certname)
            .map(|(row_ref, _)| row_ref)
    }

    #[must_use]
    pub fn pinned_count(&self) -> usize {
        self.pinned.len()
    }

    pub fn set_match_type(&mut self, match_type: MatchType) {
        self.match_type = match_type;
        self.chrome.mark_dirty();
    }

    pub fn begin_commit(&mut self) -> Result<RulesDocument> {
        self.chrome.begin_commit()?;
        Ok(RulesDocument {
            match_type: self.match_type,
            facts: self.rules.rows().cloned().collect(),
            nodes: self
                .pinned
                .rows()
                .map(|row| row.get(FIELD_NODE).to_string())
                .collect(),
        })
    }

    /// Failures show the messages the backend returned.
    pub fn finish_commit(&mut self, outcome: &Result<()>) {
        let outcome = outcome.as_ref().map(|_| ()).map_err(ConsoleError::banner_text);
        self.chrome.finish_commit(outcome, RULES_UPDATED, POLICY);
    }

    pub fn commit<T: Transport>(&mut self, client: &ConsoleClient<T>) -> Result<()> {
        let document = self.begin_commit()?;
        let outcome = client.put_rules(&self.group, &document);
        self.finish_commit(&outcome);
        outcome
    }

    pub fn close_all(&mut self) {
        self.fact_input.close();
        self.node_input.close();
    }

    pub fn rules(&self) -> impl Iterator<Item = (RowRef, &FactRule)> {
        self.rules.iter()
    }

    pub fn pinned(&self) -> impl Iterator<Item = (RowRef, &PendingRow)> {
        self.pinned.iter()
    }

    #[must_use]
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    #[must_use]
    pub fn fact_input(&self) -> &AutocompleteController {
        &self.fact_input
    }

    #[must_use]
    pub fn node_input(&self) -> &AutocompleteController {
        &self.node_input
    }

    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    #[must_use]
    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn dismiss_banner(&mut self) {
        self.chrome.dismiss_banner();
    }
}
