use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::{
    chart::{aff, model::Chart},
    digest::bag::ArgBag,
    digest::value::ArgValue,
    foundation::core::{LocalizedString, Position},
    foundation::error::{ShardError, ShardResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Declared kind of an argument.
pub enum ArgKind {
    String,
    Int,
    Long,
    Double,
    Boolean,
    StringArray,
    IntArray,
    LongArray,
    DoubleArray,
    BooleanArray,
    Timing,
    Position,
    Chart,
}

impl ArgKind {
    /// Type tag as advertised, e.g. `STRING_ARRAY`.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::StringArray => "STRING_ARRAY",
            Self::IntArray => "INT_ARRAY",
            Self::LongArray => "LONG_ARRAY",
            Self::DoubleArray => "DOUBLE_ARRAY",
            Self::BooleanArray => "BOOLEAN_ARRAY",
            Self::Timing => "TIMING",
            Self::Position => "POSITION",
            Self::Chart => "CHART",
        }
    }

    /// Whether `value` is a resolved value of this kind.
    pub fn accepts(self, value: &ArgValue) -> bool {
        value.kind_name() == self.name()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One declared argument.
pub struct ArgItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ArgKind,
    /// Default offered to the calling environment; may be a placeholder.
    pub default_value: Option<ArgValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
}

impl ArgItem {
    pub fn new(id: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            id: id.into(),
            kind,
            default_value: None,
            name: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn named(mut self, name: impl Into<LocalizedString>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Ordered argument declarations of a shard. Order is display order only.
pub struct ArgSchema {
    items: Vec<ArgItem>,
}

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn item(mut self, item: ArgItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(&self) -> &[ArgItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ArgItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Reject schemas that declare the same id twice.
    pub fn ensure_unique_ids(&self) -> ShardResult<()> {
        let mut seen = BTreeSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(ShardError::validation(format!(
                    "argument `{}` is declared more than once",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Ids declared by the schema but absent from `bag`.
    pub fn missing_ids(&self, bag: &ArgBag) -> BTreeSet<String> {
        self.items
            .iter()
            .filter(|i| !bag.contains_key(&i.id))
            .map(|i| i.id.clone())
            .collect()
    }

    /// Check that `bag` holds a resolved value of the declared kind for every item.
    ///
    /// Missing ids are reported together in one [`ShardError::MissingArgument`]. Placeholders and
    /// editor timings are [`ShardError::Validation`] errors.
    pub fn validate(&self, bag: &ArgBag) -> ShardResult<()> {
        let missing = self.missing_ids(bag);
        if !missing.is_empty() {
            let ids: Vec<&str> = missing.iter().map(String::as_str).collect();
            return Err(ShardError::missing(ids.join(", ")));
        }
        for item in &self.items {
            let value = &bag[&item.id];
            if restriction::is_restriction(value) {
                return Err(unresolved(&item.id));
            }
            if !item.kind.accepts(value) {
                return Err(ShardError::type_mismatch(
                    item.id.clone(),
                    item.kind.name(),
                    value.kind_name(),
                ));
            }
        }
        Ok(())
    }

    /// Concrete (non-placeholder) defaults keyed by id.
    pub fn defaults(&self) -> BTreeMap<String, ArgValue> {
        self.items
            .iter()
            .filter_map(|i| match &i.default_value {
                Some(v) if !restriction::is_restriction(v) => Some((i.id.clone(), v.clone())),
                _ => None,
            })
            .collect()
    }

    /// Convert a raw JSON argument object into a bag, item by item.
    ///
    /// Keys not declared by the schema are ignored. With `apply_defaults`, absent keys fall back to
    /// concrete defaults; placeholders are never substituted.
    pub fn marshal(
        &self,
        raw: &serde_json::Map<String, Value>,
        apply_defaults: bool,
    ) -> ShardResult<ArgBag> {
        let mut bag = ArgBag::new();
        for item in &self.items {
            let value = match raw.get(&item.id) {
                Some(v) => {
                    let value = marshal_value(item, v)?;
                    if restriction::is_restriction(&value) {
                        return Err(unresolved(&item.id));
                    }
                    value
                }
                None => match &item.default_value {
                    Some(d) if apply_defaults && !restriction::is_restriction(d) => d.clone(),
                    _ => return Err(ShardError::missing(item.id.clone())),
                },
            };
            bag.insert(item.id.clone(), value);
        }
        Ok(bag)
    }
}

fn unresolved(id: &str) -> ShardError {
    ShardError::validation(format!("argument `{id}` is an unresolved placeholder"))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn marshal_value(item: &ArgItem, raw: &Value) -> ShardResult<ArgValue> {
    let mismatch = || ShardError::type_mismatch(item.id.clone(), item.kind.name(), json_kind(raw));

    // Already wire-encoded values are accepted as long as they are resolved and of the right kind.
    if let Value::Object(obj) = raw
        && item.kind != ArgKind::Chart
    {
        if obj.contains_key("placeholder") {
            return Err(unresolved(&item.id));
        }
        let value: ArgValue =
            serde_json::from_value(raw.clone()).map_err(|e| ShardError::serde(e.to_string()))?;
        if !item.kind.accepts(&value) {
            return Err(ShardError::type_mismatch(
                item.id.clone(),
                item.kind.name(),
                value.kind_name(),
            ));
        }
        return Ok(value);
    }

    let value = match item.kind {
        ArgKind::String => ArgValue::String(raw.as_str().ok_or_else(mismatch)?.to_string()),
        ArgKind::Int => ArgValue::Int(int(raw).ok_or_else(mismatch)?),
        ArgKind::Long => ArgValue::Long(raw.as_i64().ok_or_else(mismatch)?),
        ArgKind::Double => ArgValue::Double(raw.as_f64().ok_or_else(mismatch)?),
        ArgKind::Boolean => ArgValue::Boolean(raw.as_bool().ok_or_else(mismatch)?),
        ArgKind::StringArray => ArgValue::StringArray(
            array(raw, |v| v.as_str().map(str::to_string)).ok_or_else(mismatch)?,
        ),
        ArgKind::IntArray => ArgValue::IntArray(array(raw, int).ok_or_else(mismatch)?),
        ArgKind::LongArray => ArgValue::LongArray(array(raw, Value::as_i64).ok_or_else(mismatch)?),
        ArgKind::DoubleArray => {
            ArgValue::DoubleArray(array(raw, Value::as_f64).ok_or_else(mismatch)?)
        }
        ArgKind::BooleanArray => {
            ArgValue::BooleanArray(array(raw, Value::as_bool).ok_or_else(mismatch)?)
        }
        ArgKind::Timing => ArgValue::Timing(raw.as_i64().ok_or_else(mismatch)?),
        ArgKind::Position => match array(raw, Value::as_f64).ok_or_else(mismatch)?.as_slice() {
            [x, y] => ArgValue::Position(Position::new(*x, *y)),
            _ => return Err(mismatch()),
        },
        ArgKind::Chart => match raw {
            Value::String(text) => ArgValue::of_chart(aff::parse(text)?),
            Value::Object(_) => ArgValue::of_chart(
                serde_json::from_value::<Chart>(raw.clone())
                    .map_err(|e| ShardError::serde(e.to_string()))?,
            ),
            _ => return Err(mismatch()),
        },
    };
    Ok(value)
}

fn int(v: &Value) -> Option<i32> {
    v.as_i64().and_then(|n| i32::try_from(n).ok())
}

fn array<T>(v: &Value, f: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    v.as_array()?.iter().map(f).collect()
}

/// Defaults that defer resolution to the calling environment.
///
/// Editor timings are encoded as negative timings below [`restriction::EDITOR_TIMING_BASE`];
/// song-level values are named placeholders.
pub mod restriction {
    use crate::{digest::value::ArgValue, foundation::core::Timing};

    /// Timing that stands for "the editor's current timing".
    pub const EDITOR_TIMING_BASE: Timing = -600_000;

    pub const SONG_BPM: &str = "songBpm";
    pub const SONG_GLOBAL_OFFSET: &str = "songGlobalOffset";
    pub const SONG_LENGTH: &str = "songLength";

    pub fn editor_current_timing() -> ArgValue {
        ArgValue::of_timing_at(EDITOR_TIMING_BASE)
    }

    /// The editor's current timing plus `delay` milliseconds.
    pub fn editor_delay_timing(delay: Timing) -> ArgValue {
        ArgValue::of_timing_at(EDITOR_TIMING_BASE - delay)
    }

    pub fn song_bpm() -> ArgValue {
        ArgValue::of_placeholder(SONG_BPM)
    }

    pub fn song_global_offset() -> ArgValue {
        ArgValue::of_placeholder(SONG_GLOBAL_OFFSET)
    }

    pub fn song_length() -> ArgValue {
        ArgValue::of_placeholder(SONG_LENGTH)
    }

    /// Whether `value` must be resolved by the calling environment before use.
    pub fn is_restriction(value: &ArgValue) -> bool {
        match value {
            ArgValue::Placeholder(_) => true,
            ArgValue::Timing(t) => *t <= EDITOR_TIMING_BASE,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/digest/schema.rs"]
mod tests;
