//! Field options and the OptionItem trait.

use serde::{Deserialize, Serialize};

/// A selectable option: the value that gets committed and the label shown
/// for it.
///
/// Options are supplied externally as an ordered list. Uniqueness of
/// `value` is assumed but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// The value sent to the endpoint on commit.
    pub value: String,
    /// The text displayed for this option.
    pub label: String,
}

impl FieldOption {
    /// Create an option from a value and a label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Trait for anything that can be turned into a selectable option row.
///
/// # Example
///
/// ```ignore
/// struct Priority {
///     id: u32,
///     name: String,
/// }
///
/// impl OptionItem for Priority {
///     fn option_value(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn option_label(&self) -> String {
///         self.name.clone()
///     }
/// }
/// ```
pub trait OptionItem {
    /// The value that gets committed when this option is chosen.
    fn option_value(&self) -> String;

    /// The text displayed for this option.
    fn option_label(&self) -> String;
}

impl OptionItem for FieldOption {
    fn option_value(&self) -> String {
        self.value.clone()
    }

    fn option_label(&self) -> String {
        self.label.clone()
    }
}

// Value doubles as the label for plain strings
impl OptionItem for String {
    fn option_value(&self) -> String {
        self.clone()
    }

    fn option_label(&self) -> String {
        self.clone()
    }
}

impl OptionItem for &str {
    fn option_value(&self) -> String {
        (*self).to_string()
    }

    fn option_label(&self) -> String {
        (*self).to_string()
    }
}

// Implement for (value, label) tuples
impl<S1, S2> OptionItem for (S1, S2)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    fn option_value(&self) -> String {
        self.0.as_ref().to_string()
    }

    fn option_label(&self) -> String {
        self.1.as_ref().to_string()
    }
}

impl<T: OptionItem> From<&T> for FieldOption {
    fn from(item: &T) -> Self {
        Self {
            value: item.option_value(),
            label: item.option_label(),
        }
    }
}
