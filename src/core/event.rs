//! Event trait for the triggers that request a state change.

use std::fmt::Debug;

/// A named trigger requesting a state change.
///
/// Events are usually a plain enum generated with
/// [`event_enum!`](crate::event_enum), which gives callers a closed set of
/// names checked at compile time. `String` and `&'static str` also implement
/// the trait for machines whose events are only known at runtime.
///
/// # Example
///
/// ```rust
/// use stateable::core::Event;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum ArticleEvent {
///     Publish,
///     Archive,
/// }
///
/// impl Event for ArticleEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Publish => "publish",
///             Self::Archive => "archive",
///         }
///     }
/// }
///
/// assert_eq!(ArticleEvent::Publish.name(), "publish");
/// ```
pub trait Event: Clone + PartialEq + Debug + Send + Sync {
    /// Name used in logs, errors and transition records.
    fn name(&self) -> &str;
}

impl Event for String {
    fn name(&self) -> &str {
        self
    }
}

impl Event for &'static str {
    fn name(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_events_are_named_by_contents() {
        assert_eq!(String::from("publish").name(), "publish");
        assert_eq!("archive".name(), "archive");
    }

    #[test]
    fn string_and_str_events_compare_by_value() {
        assert_eq!(String::from("publish"), String::from("publish"));
        assert_ne!("publish", "archive");
    }
}
