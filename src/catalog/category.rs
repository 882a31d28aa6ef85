use serde::{Deserialize, Serialize};

use crate::batch::WriteBatch;
use crate::document::{DocumentError, DocumentStore, DocumentsExt};
use crate::Document;

/// Top-level grouping of filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "categories")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "subcategories")]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An image filter the app offers, described by the prompt sent to the
/// image model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "filters")]
pub struct Filter {
    pub id: String,
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

pub fn subcategories_of<S: DocumentStore>(
    store: &S,
    category_id: &str,
) -> Result<Vec<Subcategory>, DocumentError> {
    let mut found = store
        .documents::<Subcategory>()
        .find(&|sub| sub.category_id == category_id)?;
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

pub fn filters_of<S: DocumentStore>(
    store: &S,
    category_id: &str,
) -> Result<Vec<Filter>, DocumentError> {
    let mut found = store
        .documents::<Filter>()
        .find(&|filter| filter.category_id == category_id)?;
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

/// Delete a category with its subcategories and filters in one batch.
///
/// Returns the number of documents removed, 0 when the category is unknown.
pub fn delete_category<S: DocumentStore>(store: &S, category_id: &str) -> Result<usize, DocumentError> {
    if !store.documents::<Category>().exists(category_id)? {
        return Ok(0);
    }

    let subcategories = subcategories_of(store, category_id)?;
    let filters = filters_of(store, category_id)?;

    let batch = subcategories
        .iter()
        .fold(WriteBatch::new(), |batch, sub| batch.delete::<Subcategory>(&sub.id));
    let batch = filters
        .iter()
        .fold(batch, |batch, filter| batch.delete::<Filter>(&filter.id))
        .delete::<Category>(category_id);

    let removed = batch.len();
    batch.commit(store)?;
    tracing::debug!(category_id, removed, "category deleted");
    Ok(removed)
}
