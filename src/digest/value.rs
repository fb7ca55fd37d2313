use crate::{
    chart::model::Chart,
    foundation::core::{Position, Timing},
    foundation::error::{ShardError, ShardResult},
};

/// One argument's runtime value.
///
/// Exactly one payload is active. `Timing` is a long that means "chart time", and `Position` is a
/// two-element double array; both keep their meaning on the wire by encoding under their own
/// field names. `Placeholder` names a value the calling environment must resolve and only appears
/// as a schema default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "WireValue", into = "WireValue")]
pub enum ArgValue {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    StringArray(Vec<String>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    Chart(Box<Chart>),
    Timing(Timing),
    Position(Position),
    Placeholder(String),
}

impl ArgValue {
    pub fn of_string(v: impl Into<String>) -> Self {
        Self::String(v.into())
    }

    pub fn of_int(v: i32) -> Self {
        Self::Int(v)
    }

    pub fn of_long(v: i64) -> Self {
        Self::Long(v)
    }

    pub fn of_double(v: f64) -> Self {
        Self::Double(v)
    }

    pub fn of_boolean(v: bool) -> Self {
        Self::Boolean(v)
    }

    pub fn of_chart(chart: Chart) -> Self {
        Self::Chart(Box::new(chart))
    }

    pub fn of_timing_at(timing: Timing) -> Self {
        Self::Timing(timing)
    }

    pub fn of_position(x: f64, y: f64) -> Self {
        Self::Position(Position::new(x, y))
    }

    pub fn of_placeholder(name: impl Into<String>) -> Self {
        Self::Placeholder(name.into())
    }

    /// Name of the active payload kind, matching the schema type tags.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "STRING",
            Self::Int(_) => "INT",
            Self::Long(_) => "LONG",
            Self::Double(_) => "DOUBLE",
            Self::Boolean(_) => "BOOLEAN",
            Self::StringArray(_) => "STRING_ARRAY",
            Self::IntArray(_) => "INT_ARRAY",
            Self::LongArray(_) => "LONG_ARRAY",
            Self::DoubleArray(_) => "DOUBLE_ARRAY",
            Self::BooleanArray(_) => "BOOLEAN_ARRAY",
            Self::Chart(_) => "CHART",
            Self::Timing(_) => "TIMING",
            Self::Position(_) => "POSITION",
            Self::Placeholder(_) => "PLACEHOLDER",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    fn mismatch(&self, expected: &'static str) -> ShardError {
        ShardError::type_mismatch("<value>", expected, self.kind_name())
    }

    pub fn as_string(&self) -> ShardResult<&str> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(self.mismatch("STRING")),
        }
    }

    pub fn as_int(&self) -> ShardResult<i32> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => Err(self.mismatch("INT")),
        }
    }

    /// Plain longs and timings both read as longs.
    pub fn as_long(&self) -> ShardResult<i64> {
        match self {
            Self::Long(v) | Self::Timing(v) => Ok(*v),
            _ => Err(self.mismatch("LONG")),
        }
    }

    pub fn as_double(&self) -> ShardResult<f64> {
        match self {
            Self::Double(v) => Ok(*v),
            _ => Err(self.mismatch("DOUBLE")),
        }
    }

    pub fn as_boolean(&self) -> ShardResult<bool> {
        match self {
            Self::Boolean(v) => Ok(*v),
            _ => Err(self.mismatch("BOOLEAN")),
        }
    }

    pub fn as_string_array(&self) -> ShardResult<&[String]> {
        match self {
            Self::StringArray(v) => Ok(v),
            _ => Err(self.mismatch("STRING_ARRAY")),
        }
    }

    pub fn as_int_array(&self) -> ShardResult<&[i32]> {
        match self {
            Self::IntArray(v) => Ok(v),
            _ => Err(self.mismatch("INT_ARRAY")),
        }
    }

    pub fn as_long_array(&self) -> ShardResult<&[i64]> {
        match self {
            Self::LongArray(v) => Ok(v),
            _ => Err(self.mismatch("LONG_ARRAY")),
        }
    }

    /// Plain double arrays and positions (as `[x, y]`) both read as double arrays.
    pub fn as_double_array(&self) -> ShardResult<Vec<f64>> {
        match self {
            Self::DoubleArray(v) => Ok(v.clone()),
            Self::Position(p) => Ok(p.to_array().to_vec()),
            _ => Err(self.mismatch("DOUBLE_ARRAY")),
        }
    }

    pub fn as_boolean_array(&self) -> ShardResult<&[bool]> {
        match self {
            Self::BooleanArray(v) => Ok(v),
            _ => Err(self.mismatch("BOOLEAN_ARRAY")),
        }
    }

    pub fn as_chart(&self) -> ShardResult<&Chart> {
        match self {
            Self::Chart(v) => Ok(v),
            _ => Err(self.mismatch("CHART")),
        }
    }

    pub fn as_timing(&self) -> ShardResult<Timing> {
        match self {
            Self::Timing(v) => Ok(*v),
            _ => Err(self.mismatch("TIMING")),
        }
    }

    pub fn as_position(&self) -> ShardResult<Position> {
        match self {
            Self::Position(v) => Ok(*v),
            _ => Err(self.mismatch("POSITION")),
        }
    }

    pub fn as_placeholder(&self) -> ShardResult<&str> {
        match self {
            Self::Placeholder(v) => Ok(v),
            _ => Err(self.mismatch("PLACEHOLDER")),
        }
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Position> for ArgValue {
    fn from(v: Position) -> Self {
        Self::Position(v)
    }
}

/// Wire shape: an object with one of these fields set.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    int_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    long_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string_array_value: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    int_array_value: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    long_array_value: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    double_array_value: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boolean_array_value: Option<Vec<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chart_value: Option<Box<Chart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position_value: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timing_value: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
}

impl From<ArgValue> for WireValue {
    fn from(v: ArgValue) -> Self {
        let mut w = WireValue::default();
        match v {
            ArgValue::String(v) => w.string_value = Some(v),
            ArgValue::Int(v) => w.int_value = Some(v),
            ArgValue::Long(v) => w.long_value = Some(v),
            ArgValue::Double(v) => w.double_value = Some(v),
            ArgValue::Boolean(v) => w.boolean_value = Some(v),
            ArgValue::StringArray(v) => w.string_array_value = Some(v),
            ArgValue::IntArray(v) => w.int_array_value = Some(v),
            ArgValue::LongArray(v) => w.long_array_value = Some(v),
            ArgValue::DoubleArray(v) => w.double_array_value = Some(v),
            ArgValue::BooleanArray(v) => w.boolean_array_value = Some(v),
            ArgValue::Chart(v) => w.chart_value = Some(v),
            ArgValue::Timing(v) => w.timing_value = Some(v),
            ArgValue::Position(v) => w.position_value = Some(v),
            ArgValue::Placeholder(v) => w.placeholder = Some(v),
        }
        w
    }
}

impl TryFrom<WireValue> for ArgValue {
    type Error = ShardError;

    fn try_from(w: WireValue) -> Result<Self, Self::Error> {
        let candidates = [
            w.position_value.map(ArgValue::Position),
            w.timing_value.map(ArgValue::Timing),
            w.placeholder.map(ArgValue::Placeholder),
            w.string_value.map(ArgValue::String),
            w.int_value.map(ArgValue::Int),
            w.long_value.map(ArgValue::Long),
            w.double_value.map(ArgValue::Double),
            w.boolean_value.map(ArgValue::Boolean),
            w.string_array_value.map(ArgValue::StringArray),
            w.int_array_value.map(ArgValue::IntArray),
            w.long_array_value.map(ArgValue::LongArray),
            w.double_array_value.map(ArgValue::DoubleArray),
            w.boolean_array_value.map(ArgValue::BooleanArray),
            w.chart_value.map(ArgValue::Chart),
        ];
        // Semantic tags win over the primitive fields they are layered on.
        candidates
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ShardError::serde("argument value has no payload field"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/digest/value.rs"]
mod tests;
