//! Catalog - the content the dashboard edits.
//!
//! | Page             | Document          | Ordered scope                      |
//! |------------------|-------------------|------------------------------------|
//! | Categories       | `Category`        | -                                  |
//! | Subcategories    | `Subcategory`     | -                                  |
//! | Filters          | `Filter`          | -                                  |
//! | Onboarding       | `OnboardingSlide` | flat (`onboarding_sliders`)        |
//! | Prompt builder   | `PromptCategory`  | flat (`prompt_categories`)         |
//! | Prompt options   | `PromptOption`    | nested (`PromptCategory.options`)  |

mod category;
mod onboarding;
mod prompt;

pub use category::{delete_category, filters_of, subcategories_of, Category, Filter, Subcategory};
pub use onboarding::OnboardingSlide;
pub use prompt::{append_option, remove_option, PromptCategory, PromptOption};

/// Fresh sortable identifier for a new document.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}
