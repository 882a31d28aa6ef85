use serde::{Deserialize, Serialize};

use crate::batch::WriteBatch;
use crate::document::{DocumentError, DocumentStore, DocumentsExt};
use crate::ordered::{assign_order, sort_by_order, Identified, Ordered};
use crate::scope::NestedList;
use crate::Document;

/// A group in the prompt builder (e.g. "Lighting"), holding its options inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "prompt_categories")]
pub struct PromptCategory {
    #[document(id)]
    pub id: String,
    pub name: String,
    #[document(order)]
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub options: Vec<PromptOption>,
}

/// One choice inside a prompt category; `value` is the text spliced into
/// the generated prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptOption {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub order: u32,
}

impl PromptOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            order: 0,
        }
    }
}

impl Identified for PromptOption {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Ordered for PromptOption {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl NestedList for PromptCategory {
    type Item = PromptOption;

    const FIELD: &'static str = "options";

    fn items(&self) -> &[PromptOption] {
        &self.options
    }

    fn items_mut(&mut self) -> &mut Vec<PromptOption> {
        &mut self.options
    }
}

impl PromptCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: 0,
            options: Vec::new(),
        }
    }

    /// Add an option, placing it with the creation rule of this nested list.
    pub fn add_option(&mut self, mut option: PromptOption, explicit: Option<u32>) -> &PromptOption {
        assign_order(&mut option, &self.options, explicit);
        self.options.push(option);
        let last = self.options.len() - 1;
        &self.options[last]
    }

    /// Remove an option. The gap it leaves stays until the next reorder.
    pub fn remove_option(&mut self, id: &str) -> Option<PromptOption> {
        let index = self.options.iter().position(|option| option.id == id)?;
        Some(self.options.remove(index))
    }

    pub fn option(&self, id: &str) -> Option<&PromptOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Options in display order.
    pub fn sorted_options(&self) -> Vec<PromptOption> {
        let mut options = self.options.clone();
        sort_by_order(&mut options);
        options
    }

    /// Prompt fragment built from the chosen option ids, in display order.
    pub fn compose(&self, chosen: &[&str]) -> String {
        self.sorted_options()
            .into_iter()
            .filter(|option| chosen.contains(&option.id.as_str()))
            .map(|option| option.value)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Add an option to a stored prompt category, rewriting its option list.
pub fn append_option<S: DocumentStore>(
    store: &S,
    category_id: &str,
    option: PromptOption,
    explicit: Option<u32>,
) -> Result<PromptOption, DocumentError> {
    let mut category = store.documents::<PromptCategory>().require(category_id)?;

    let added = category.add_option(option, explicit).clone();
    WriteBatch::new()
        .patch::<PromptCategory, _>(category_id, PromptCategory::FIELD, &category.options)
        .commit(store)?;

    Ok(added)
}

/// Remove an option from a stored prompt category. Returns whether it existed.
pub fn remove_option<S: DocumentStore>(
    store: &S,
    category_id: &str,
    option_id: &str,
) -> Result<bool, DocumentError> {
    let Some(mut category) = store
        .get_document::<PromptCategory>(category_id)?
        .map(|versioned| versioned.data)
    else {
        return Ok(false);
    };

    if category.remove_option(option_id).is_none() {
        return Ok(false);
    }

    WriteBatch::new()
        .patch::<PromptCategory, _>(category_id, PromptCategory::FIELD, &category.options)
        .commit(store)?;
    Ok(true)
}
