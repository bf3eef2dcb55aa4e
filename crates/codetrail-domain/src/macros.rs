//! Entity and identifier macros shared across `entities`.

/// Define a strong-typed UUID identifier for a domain entity.
///
/// Generates a newtype wrapping [`uuid::Uuid`] with `Display`/`From`/`Into`,
/// serde support and deterministic v5 derivation via `from_name`, so the same
/// logical id (e.g. a file path within a project) always maps to the same id.
#[macro_export]
macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Display,
            derive_more::From,
            derive_more::Into,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[display("{_0}")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random UUID v4 identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Derive a deterministic v5 UUID from a human-readable name,
            /// namespaced per identifier type so two types never collide.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                let ns =
                    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, stringify!($name).as_bytes());
                Self(uuid::Uuid::new_v5(&ns, name.as_bytes()))
            }

            /// Parse from any string: tries UUID first, falls back to `from_name`.
            #[must_use]
            pub fn from_string(s: &str) -> Self {
                match uuid::Uuid::parse_str(s) {
                    Ok(u) => Self(u),
                    Err(_) => Self::from_name(s),
                }
            }

            /// Access the inner [`uuid::Uuid`].
            #[must_use]
            pub fn inner(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_id!(TestId, "id used only by macro tests");

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TestId::from_name("a"), TestId::from_name("a"));
        assert_ne!(TestId::from_name("a"), TestId::from_name("b"));
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(TestId::new(), TestId::new());
    }
}
