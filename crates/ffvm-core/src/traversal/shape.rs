//! Value shapes the traverser understands
//!
//! Rust has no runtime reflection, so every traversable type describes its own
//! shape through [`Actable::node`]. Records are declared with the
//! [`record!`](crate::record) macro, leaf types with
//! [`scalar_actable!`](crate::scalar_actable); standard containers are covered
//! here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::Hash;
use std::rc::Rc;

/// Declared field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as written in the type
    pub name: &'static str,
    /// Annotation tag, if the field has one
    pub tag: Option<&'static str>,
    /// Display name owned by the serialization naming convention
    pub alias: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            tag: None,
            alias: None,
        }
    }

    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }
}

/// Shape of a value, borrowed for one traversal step
pub enum Node<'a> {
    /// Record with declared fields
    Record(&'a mut dyn Record),
    /// Optional value; `None` when absent
    Optional(Option<&'a mut dyn Actable>),
    /// Owned indirection, always present
    Boxed(&'a mut dyn Actable),
    /// Shared interior-mutable value, borrowed while visited
    Shared {
        cell: &'a RefCell<dyn Actable + 'a>,
        type_name: &'static str,
    },
    /// Elements in index order
    Sequence(Vec<&'a mut dyn Actable>),
    /// Entries keyed by the string form of their key, sorted
    Map(Vec<(String, &'a mut dyn Actable)>),
    /// Leaf value without further structure
    Scalar,
}

impl Node<'_> {
    /// Short shape name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Record(_) => "record",
            Node::Optional(_) => "optional",
            Node::Boxed(_) => "boxed",
            Node::Shared { .. } => "shared",
            Node::Sequence(_) => "sequence",
            Node::Map(_) => "map",
            Node::Scalar => "scalar",
        }
    }
}

/// A value the traverser can walk
pub trait Actable {
    fn node(&mut self) -> Node<'_>;
}

/// A record type with annotated fields
///
/// Implemented by the [`record!`](crate::record) macro. `fields` and
/// `fields_mut` must list the same fields in the same order.
pub trait Record: Actable + 'static {
    /// Declared fields, in declaration order
    fn fields(&self) -> &'static [FieldSpec];

    /// Mutable access to every declared field, in declaration order
    fn fields_mut(&mut self) -> Vec<&mut dyn Field>;

    /// Identity used to key the pipeline cache
    fn record_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Display names of `sample` that its serialized form does not use as keys
///
/// Issue paths use the names given after `as` in [`record!`](crate::record),
/// while serialization uses serde's own naming. An empty result means the two
/// agree for every renamed field.
pub fn display_name_mismatches<R>(sample: &R) -> Result<Vec<&'static str>, serde_json::Error>
where
    R: Record + Serialize,
{
    let snapshot = serde_json::to_value(sample)?;
    let keys = snapshot.as_object();
    Ok(sample
        .fields()
        .iter()
        .filter_map(|spec| spec.alias)
        .filter(|alias| !keys.map_or(false, |keys| keys.contains_key(*alias)))
        .collect())
}

/// A record field: traversable and convertible to and from the dynamic value model
pub trait Field {
    /// Serialize the current value for mappers and validators
    fn snapshot(&self) -> Result<Value, serde_json::Error>;

    /// Replace the current value with a mapped one
    fn assign(&mut self, value: Value) -> Result<(), serde_json::Error>;

    fn as_actable(&mut self) -> &mut dyn Actable;

    fn field_type(&self) -> &'static str;
}

impl<T> Field for T
where
    T: Actable + Serialize + DeserializeOwned,
{
    fn snapshot(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn assign(&mut self, value: Value) -> Result<(), serde_json::Error> {
        *self = serde_json::from_value(value)?;
        Ok(())
    }

    fn as_actable(&mut self) -> &mut dyn Actable {
        self
    }

    fn field_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

crate::scalar_actable!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64, (), Value,
);

impl<T: Actable> Actable for Option<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Optional(self.as_mut().map(|inner| inner as &mut dyn Actable))
    }
}

impl<T: Actable> Actable for Box<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Boxed(&mut **self)
    }
}

impl<T: Actable> Actable for Rc<RefCell<T>> {
    fn node(&mut self) -> Node<'_> {
        Node::Shared {
            cell: &**self,
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl<T: Actable> Actable for Vec<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|item| item as &mut dyn Actable).collect())
    }
}

impl<T: Actable> Actable for VecDeque<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|item| item as &mut dyn Actable).collect())
    }
}

impl<T: Actable, const N: usize> Actable for [T; N] {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|item| item as &mut dyn Actable).collect())
    }
}

fn sorted_entries<'a, K, V, I>(entries: I) -> Node<'a>
where
    K: Display + 'a,
    V: Actable + 'a,
    I: Iterator<Item = (&'a K, &'a mut V)>,
{
    let mut entries: Vec<(String, &'a mut dyn Actable)> = entries
        .map(|(key, value)| (key.to_string(), value as &mut dyn Actable))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Node::Map(entries)
}

impl<K, V, S> Actable for HashMap<K, V, S>
where
    K: Display + Eq + Hash,
    V: Actable,
{
    fn node(&mut self) -> Node<'_> {
        sorted_entries(self.iter_mut())
    }
}

impl<K, V> Actable for BTreeMap<K, V>
where
    K: Display + Ord,
    V: Actable,
{
    fn node(&mut self) -> Node<'_> {
        sorted_entries(self.iter_mut())
    }
}
