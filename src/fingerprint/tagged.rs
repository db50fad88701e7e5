//! Fingerprint-tagged JSON values.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::hash::Fingerprint;

/// A JSON value whose containers each carry the fingerprint of their contents.
///
/// The fingerprint lives beside the data rather than inside it: serializing a
/// `TaggedValue` yields exactly the plain JSON it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    /// Null, bool, number or string. Never tagged.
    Scalar(Value),
    Array {
        items: Vec<TaggedValue>,
        fingerprint: Fingerprint,
    },
    Object {
        entries: BTreeMap<String, TaggedValue>,
        fingerprint: Fingerprint,
    },
}

impl TaggedValue {
    /// Fingerprint of this node, `None` for scalars.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        match self {
            TaggedValue::Scalar(_) => None,
            TaggedValue::Array { fingerprint, .. } | TaggedValue::Object { fingerprint, .. } => {
                Some(*fingerprint)
            }
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, TaggedValue::Scalar(_))
    }

    /// Property lookup on an object node.
    pub fn get(&self, key: &str) -> Option<&TaggedValue> {
        match self {
            TaggedValue::Object { entries, .. } => entries.get(key),
            _ => None,
        }
    }

    /// Element lookup on an array node.
    pub fn at(&self, index: usize) -> Option<&TaggedValue> {
        match self {
            TaggedValue::Array { items, .. } => items.get(index),
            _ => None,
        }
    }

    /// Plain JSON copy with every tag stripped.
    pub fn to_value(&self) -> Value {
        match self {
            TaggedValue::Scalar(value) => value.clone(),
            TaggedValue::Array { items, .. } => {
                Value::Array(items.iter().map(TaggedValue::to_value).collect())
            }
            TaggedValue::Object { entries, .. } => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Consuming variant of [`TaggedValue::to_value`].
    pub fn into_value(self) -> Value {
        match self {
            TaggedValue::Scalar(value) => value,
            TaggedValue::Array { items, .. } => {
                Value::Array(items.into_iter().map(TaggedValue::into_value).collect())
            }
            TaggedValue::Object { entries, .. } => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Recompute every tag from scratch with the given seed.
    ///
    /// Existing tags are discarded, never layered.
    pub fn retag(&self, seed: u32) -> TaggedValue {
        Fingerprinter::new(seed).tag(self.to_value())
    }
}

impl Serialize for TaggedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaggedValue::Scalar(value) => value.serialize(serializer),
            TaggedValue::Array { items, .. } => serializer.collect_seq(items),
            TaggedValue::Object { entries, .. } => serializer.collect_map(entries),
        }
    }
}

/// Tags values using a fixed hash seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fingerprinter {
    seed: u32,
}

impl Fingerprinter {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Fingerprint of the compact JSON rendering of `value`.
    pub fn fingerprint(&self, value: &Value) -> Fingerprint {
        Fingerprint::compute(&value.to_string(), self.seed)
    }

    /// Tag every container in `value`, bottom-up.
    pub fn tag(&self, value: Value) -> TaggedValue {
        self.tag_node(value).0
    }

    /// Returns the tagged node together with its compact JSON so parents can
    /// reuse the children's rendering instead of serializing again.
    fn tag_node(&self, value: Value) -> (TaggedValue, String) {
        match value {
            Value::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                let mut json = String::from("[");
                for (index, element) in elements.into_iter().enumerate() {
                    let (item, item_json) = self.tag_node(element);
                    if index > 0 {
                        json.push(',');
                    }
                    json.push_str(&item_json);
                    items.push(item);
                }
                json.push(']');

                let fingerprint = Fingerprint::compute(&json, self.seed);
                (TaggedValue::Array { items, fingerprint }, json)
            }
            Value::Object(properties) => {
                let mut entries = BTreeMap::new();
                let mut rendered = Vec::with_capacity(properties.len());
                for (key, property) in properties {
                    let (entry, entry_json) = self.tag_node(property);
                    rendered.push((key.clone(), entry_json));
                    entries.insert(key, entry);
                }
                rendered.sort_by(|a, b| a.0.cmp(&b.0));

                let mut json = String::from("{");
                for (index, (key, entry_json)) in rendered.iter().enumerate() {
                    if index > 0 {
                        json.push(',');
                    }
                    json.push_str(&Value::from(key.as_str()).to_string());
                    json.push(':');
                    json.push_str(entry_json);
                }
                json.push('}');

                let fingerprint = Fingerprint::compute(&json, self.seed);
                (TaggedValue::Object { entries, fingerprint }, json)
            }
            scalar => {
                let json = scalar.to_string();
                (TaggedValue::Scalar(scalar), json)
            }
        }
    }
}

/// Tag `value` with the default seed.
pub fn tag(value: Value) -> TaggedValue {
    Fingerprinter::default().tag(value)
}

/// Strip every tag from `value`.
pub fn untag(value: &TaggedValue) -> Value {
    value.to_value()
}
