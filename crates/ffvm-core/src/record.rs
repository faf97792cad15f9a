//! Declaration macros for traversable types
//!
//! [`record!`](crate::record) attaches annotation tags (and optional display
//! names) to the fields of a struct. Every listed field must implement
//! [`Field`](crate::traversal::Field), which holds for any
//! `Serialize + DeserializeOwned` type that is itself
//! [`Actable`](crate::traversal::Actable).
//!
//! ```
//! use ffvm_core::record;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Address {
//!     city: String,
//!     #[serde(rename = "zip")]
//!     postal_code: String,
//! }
//!
//! record!(Address {
//!     city: "upper,not_empty",
//!     postal_code: "len=5" as "zip",
//! });
//!
//! let mut address = Address { city: "Lyon".into(), postal_code: "690".into() };
//! let issues = ffvm_core::validate(&mut address).unwrap();
//! assert_eq!(address.city, "LYON");
//! assert_eq!(issues[0].field, "zip");
//! ```

/// Implement [`Record`](crate::traversal::Record) and
/// [`Actable`](crate::traversal::Actable) for a struct
///
/// Syntax: `record!(Type { field, field: "tag", field: "tag" as "display", field as "display" })`.
/// Fields must be listed in declaration order.
///
/// A macro cannot read serde attributes, so the display name is written twice:
/// once as `#[serde(rename = "...")]` on the field and once after `as` here.
/// [`display_name_mismatches`](crate::traversal::shape::display_name_mismatches)
/// reports the names that drifted apart and fits in a unit test. Fields left
/// out of the list are neither visited nor considered when deciding whether a
/// record holds its zero value.
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $field:ident $( : $tag:literal )? $( as $alias:literal )? ),* $(,)? }) => {
        impl $crate::traversal::Record for $ty {
            fn fields(&self) -> &'static [$crate::traversal::FieldSpec] {
                const FIELDS: &[$crate::traversal::FieldSpec] = &[
                    $(
                        $crate::traversal::FieldSpec {
                            name: ::std::stringify!($field),
                            tag: $crate::__ffvm_optional!($($tag)?),
                            alias: $crate::__ffvm_optional!($($alias)?),
                        }
                    ),*
                ];
                FIELDS
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::traversal::Field> {
                ::std::vec![ $( &mut self.$field as &mut dyn $crate::traversal::Field ),* ]
            }
        }

        impl $crate::traversal::Actable for $ty {
            fn node(&mut self) -> $crate::traversal::Node<'_> {
                $crate::traversal::Node::Record(self)
            }
        }
    };
}

/// Mark leaf types (enums, newtypes, foreign types) as scalars
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// enum Color { Red, Green }
///
/// ffvm_core::scalar_actable!(Color);
/// ```
#[macro_export]
macro_rules! scalar_actable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::traversal::Actable for $ty {
                fn node(&mut self) -> $crate::traversal::Node<'_> {
                    $crate::traversal::Node::Scalar
                }
            }
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ffvm_optional {
    () => {
        ::std::option::Option::None
    };
    ($value:literal) => {
        ::std::option::Option::Some($value)
    };
}
