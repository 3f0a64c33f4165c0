//! Macros for declaring flow states and events.

/// Generate a `State` implementation for a plain enum.
///
/// # Example
///
/// ```
/// use navflow::flow_states;
///
/// flow_states! {
///     pub enum SignupState {
///         EnteringEmail,
///         EnteringPassword,
///         Registered,
///     }
///     final: [Registered]
/// }
/// ```
#[macro_export]
macro_rules! flow_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
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
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a plain enum.
///
/// # Example
///
/// ```
/// use navflow::flow_events;
///
/// flow_events! {
///     pub enum SignupEvent {
///         EmailProvided,
///         BackClicked,
///     }
/// }
/// ```
#[macro_export]
macro_rules! flow_events {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
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
