//! Macros for declaring state and event enums.

/// Generate a state enum and its `State` implementation.
///
/// Each variant's name is its `stringify!`-ed identifier.
///
/// # Example
///
/// ```
/// use stateable::state_enum;
/// use stateable::core::State;
///
/// state_enum! {
///     pub enum ArticleState {
///         Draft,
///         Published,
///         Archived,
///         Rejected,
///     }
///     final: [Archived, Rejected]
///     error: [Rejected]
/// }
///
/// assert_eq!(ArticleState::Draft.name(), "Draft");
/// assert!(ArticleState::Rejected.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an event enum and its `Event` implementation.
///
/// This is the closed, compile-time set of events a domain type accepts.
///
/// # Example
///
/// ```
/// use stateable::event_enum;
/// use stateable::core::Event;
///
/// event_enum! {
///     pub enum ArticleEvent {
///         Publish,
///         Archive,
///     }
/// }
///
/// assert_eq!(ArticleEvent::Publish.name(), "Publish");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};

    state_enum! {
        enum TestState {
            Draft,
            Published,
            Archived,
            Rejected,
        }
        final: [Archived, Rejected]
        error: [Rejected]
    }

    event_enum! {
        enum TestEvent {
            Publish,
            Reject,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Draft;
        assert_eq!(state.name(), "Draft");
        assert!(!state.is_final());
        assert!(!state.is_error());

        assert!(TestState::Archived.is_final());
        assert!(!TestState::Archived.is_error());

        assert!(TestState::Rejected.is_final());
        assert!(TestState::Rejected.is_error());
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        assert!(!MinimalState::One.is_final());
        assert!(!MinimalState::Two.is_error());
    }

    #[test]
    fn event_enum_macro_generates_trait() {
        assert_eq!(TestEvent::Publish.name(), "Publish");
        assert_eq!(TestEvent::Reject.name(), "Reject");
        assert_ne!(TestEvent::Publish, TestEvent::Reject);
    }

    #[test]
    fn event_enum_supports_visibility() {
        event_enum! {
            pub enum PublicEvent {
                Go,
            }
        }

        assert_eq!(PublicEvent::Go.name(), "Go");
    }
}
