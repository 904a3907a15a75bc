//! Client-side dataset index and query matching behind the autocomplete inputs.

mod index;
mod matcher;

pub use index::{DATASET_CERTNAME, DATASET_CLASSES, DATASET_FACTS, SearchIndex};
pub use matcher::{LabelFragment, Matcher, Suggestion};

#[cfg(test)]
mod tests;
