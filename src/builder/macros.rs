//! Macros for ergonomic key-enum declaration.

/// Generate a key enum with its [`StateKey`](crate::core::StateKey)
/// implementation and the derives the engine requires.
///
/// # Example
///
/// ```
/// use stratagem::state_key;
///
/// state_key! {
///     pub enum TankState {
///         Patrol,
///         Pursue,
///         Engage,
///         Surrender,
///     }
/// }
/// ```
#[macro_export]
macro_rules! state_key {
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
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKey for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
