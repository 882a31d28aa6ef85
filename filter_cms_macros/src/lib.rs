mod document;

use proc_macro::TokenStream;

/// Derive macro implementing `filter_cms::Document` (and `filter_cms::Ordered`
/// when a field carries `#[document(order)]`).
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "onboarding_sliders")]
/// pub struct OnboardingSlide {
///     #[document(id)]
///     pub id: String,
///     pub title: String,
///     #[document(order)]
///     pub order: u32,
/// }
/// ```
///
/// Defaults when attributes are omitted:
/// - collection: snake_case struct name + "s"
/// - id field: the field named `id`
/// - no `Ordered` impl unless a field is marked `#[document(order)]`
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
