use serde::Serialize;

use crate::autocomplete::{AutocompleteController, InputEvent, Selection};
use crate::client::{ConsoleClient, Transport};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, GENERIC_FAILURE_MESSAGE, Result};
use crate::models::{
    ActivationState, ClassAssignment, ConfigurationDocument, ParameterAssignment, ParameterSpec,
    RecordId,
};
use crate::page::{BannerKind, CommitPolicy, EditableList, PageChrome, PendingRow, RowRef};
use crate::search::{DATASET_CLASSES, Matcher, SearchIndex};

use super::parameter_form::ParameterForm;
use super::{CLASSES_UPDATED, load_dataset};

const POLICY: CommitPolicy = CommitPolicy {
    rearm_on_failure: true,
};

const FIELD_PARAMETER: &str = "parameter";
const FIELD_VALUE: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockRef(u64);

/// One assigned class: its parameter form and the parameter rows.
#[derive(Debug, Clone, Serialize)]
pub struct ClassBlock {
    pub class_id: Option<RecordId>,
    pub name: String,
    pub form: ParameterForm,
    pub rows: EditableList,
}

impl ClassBlock {
    fn new(class_id: Option<RecordId>, name: String, form: ParameterForm) -> Self {
        Self {
            class_id,
            name,
            form,
            rows: EditableList::new(),
        }
    }

    fn push_parameter(&mut self, parameter: &str, value: &str) -> RowRef {
        self.rows
            .push(PendingRow::new([(FIELD_PARAMETER, parameter), (FIELD_VALUE, value)]))
    }

    fn assignment(&self) -> ClassAssignment {
        ClassAssignment {
            puppet_class: self.name.clone(),
            parameters: self
                .rows
                .rows()
                .map(|row| ParameterAssignment {
                    parameter: row.get(FIELD_PARAMETER).to_string(),
                    value: serde_json::Value::String(row.get(FIELD_VALUE).to_string()),
                    raw_value: row.get(FIELD_VALUE).to_string(),
                })
                .collect(),
        }
    }
}

/// Classes page of a group.
#[derive(Debug)]
pub struct ClassesEditor {
    group: String,
    environment: Option<String>,
    index: SearchIndex,
    matcher: Matcher,
    picker: AutocompleteController,
    blocks: Vec<(BlockRef, ClassBlock)>,
    next_block: u64,
    chrome: PageChrome,
}

impl ClassesEditor {
    pub fn new(
        group: impl Into<String>,
        environment: Option<String>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            group: group.into(),
            environment,
            index: SearchIndex::new(),
            matcher: Matcher::new(config.pattern_mode),
            picker: AutocompleteController::new(DATASET_CLASSES, config.list_width_pad),
            blocks: Vec::new(),
            next_block: 0,
            chrome: PageChrome::new(),
        }
    }

    /// Loads the classes dataset, then the group configuration and the
    /// parameter specs of every assigned class.
    pub fn load<T: Transport>(&mut self, client: &ConsoleClient<T>) {
        self.chrome.show_loader();
        load_dataset(
            &mut self.index,
            DATASET_CLASSES,
            client.list_classes(self.environment.as_deref()),
        );

        let document = match client.get_configuration(&self.group) {
            Ok(document) => document,
            Err(_) => {
                self.chrome.show_banner(BannerKind::Danger, GENERIC_FAILURE_MESSAGE);
                self.chrome.hide_loader();
                return;
            }
        };

        self.blocks.clear();
        for assignment in document.classes {
            self.index.set_state_by_field(
                DATASET_CLASSES,
                "name",
                &assignment.puppet_class,
                ActivationState::Disabled,
            );
            let class_id = self
                .index
                .find_by_field(DATASET_CLASSES, "name", &assignment.puppet_class)
                .map(|record| record.id.clone());
            let specs = match &class_id {
                Some(id) => self.fetch_specs(client, id),
                None => Vec::new(),
            };
            let used: Vec<String> = assignment
                .parameters
                .iter()
                .map(|parameter| parameter.parameter.clone())
                .collect();

            let mut block = ClassBlock::new(
                class_id,
                assignment.puppet_class.clone(),
                ParameterForm::new(specs, &used),
            );
            for parameter in &assignment.parameters {
                block.push_parameter(&parameter.parameter, &parameter.display_value());
            }
            self.insert_block(block);
        }
        self.chrome.hide_loader();
    }

    fn fetch_specs<T: Transport>(
        &mut self,
        client: &ConsoleClient<T>,
        class_id: &RecordId,
    ) -> Vec<ParameterSpec> {
        client
            .list_parameters(class_id.as_str())
            .unwrap_or_else(|_| {
                self.chrome.show_banner(BannerKind::Danger, GENERIC_FAILURE_MESSAGE);
                Vec::new()
            })
    }

    /// Feeds an event to the class picker.
    pub fn picker_event(&mut self, event: InputEvent) -> Option<Selection> {
        self.picker.handle(event, &self.index, &self.matcher)
    }

    /// "Add class" is enabled only while the picker holds a clicked
    /// suggestion.
    #[must_use]
    pub fn can_add_class(&self) -> bool {
        self.picker.selection().is_some()
    }

    /// Appends a block for the picked class and disables it in the index.
    pub fn add_class<T: Transport>(&mut self, client: &ConsoleClient<T>) -> Result<BlockRef> {
        let Some(selection) = self.picker.selection().cloned() else {
            return Err(ConsoleError::Validation(
                "pick a class from the suggestions first".to_string(),
            ));
        };
        let specs = client
            .list_parameters(selection.record_id.as_str())
            .inspect_err(|_| {
                self.chrome.show_banner(BannerKind::Danger, GENERIC_FAILURE_MESSAGE);
            })?;

        self.index.set_state_by_field(
            DATASET_CLASSES,
            "name",
            &selection.label,
            ActivationState::Disabled,
        );
        let block = ClassBlock::new(
            Some(selection.record_id),
            selection.label,
            ParameterForm::new(specs, &[]),
        );
        let block_ref = self.insert_block(block);
        self.chrome.mark_dirty();
        self.picker.reset();
        Ok(block_ref)
    }

    /// Removes a block and makes its class selectable again.
    pub fn remove_class(&mut self, block_ref: BlockRef) -> Option<ClassBlock> {
        let position = self
            .blocks
            .iter()
            .position(|(candidate, _)| *candidate == block_ref)?;
        let (_, block) = self.blocks.remove(position);
        self.index.set_state_by_field(
            DATASET_CLASSES,
            "name",
            &block.name,
            ActivationState::Enabled,
        );
        self.chrome.mark_dirty();
        Some(block)
    }

    pub fn select_parameter(&mut self, block_ref: BlockRef, name: &str) -> Result<()> {
        self.block_mut(block_ref)?.form.select(name)
    }

    /// Returns the sanitized value shown in the input.
    pub fn input_parameter_value(&mut self, block_ref: BlockRef, raw: &str) -> Result<String> {
        Ok(self.block_mut(block_ref)?.form.input(raw).to_string())
    }

    pub fn add_parameter(&mut self, block_ref: BlockRef) -> Result<RowRef> {
        let block = self.block_mut(block_ref)?;
        let (name, value) = block.form.take_entry()?;
        let row_ref = block.push_parameter(&name, &value);
        self.chrome.mark_dirty();
        Ok(row_ref)
    }

    /// Removes a parameter row and re-enables its option.
    pub fn remove_parameter(&mut self, block_ref: BlockRef, row_ref: RowRef) -> Result<()> {
        let block = self.block_mut(block_ref)?;
        let row = block
            .rows
            .remove(row_ref)
            .ok_or_else(|| ConsoleError::NotFound("parameter row".to_string()))?;
        block.form.release(row.get(FIELD_PARAMETER));
        self.chrome.mark_dirty();
        Ok(())
    }

    /// Locks the commit action and serializes every block.
    pub fn begin_commit(&mut self) -> Result<ConfigurationDocument> {
        self.chrome.begin_commit()?;
        Ok(ConfigurationDocument {
            classes: self.blocks.iter().map(|(_, block)| block.assignment()).collect(),
        })
    }

    pub fn finish_commit(&mut self, outcome: &Result<()>) {
        let outcome = match outcome {
            Ok(()) => Ok(()),
            Err(_) => Err(GENERIC_FAILURE_MESSAGE.to_string()),
        };
        self.chrome.finish_commit(outcome, CLASSES_UPDATED, POLICY);
    }

    /// Runs both commit steps. A backend failure is shown in the banner and
    /// also returned.
    pub fn commit<T: Transport>(&mut self, client: &ConsoleClient<T>) -> Result<()> {
        let document = self.begin_commit()?;
        let outcome = client.put_configuration(&self.group, &document);
        self.finish_commit(&outcome);
        outcome
    }

    /// Hides the suggestion list, as a click elsewhere on the page does.
    pub fn close_all(&mut self) {
        self.picker.close();
    }

    fn insert_block(&mut self, block: ClassBlock) -> BlockRef {
        let block_ref = BlockRef(self.next_block);
        self.next_block += 1;
        self.blocks.push((block_ref, block));
        block_ref
    }

    fn block_mut(&mut self, block_ref: BlockRef) -> Result<&mut ClassBlock> {
        self.blocks
            .iter_mut()
            .find(|(candidate, _)| *candidate == block_ref)
            .map(|(_, block)| block)
            .ok_or_else(|| ConsoleError::NotFound("class block".to_string()))
    }

    #[must_use]
    pub fn block(&self, block_ref: BlockRef) -> Option<&ClassBlock> {
        self.blocks
            .iter()
            .find(|(candidate, _)| *candidate == block_ref)
            .map(|(_, block)| block)
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockRef, &ClassBlock)> {
        self.blocks.iter().map(|(block_ref, block)| (*block_ref, block))
    }

    #[must_use]
    pub fn picker(&self) -> &AutocompleteController {
        &self.picker
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
