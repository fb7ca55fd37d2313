use std::collections::BTreeMap;

use crate::{
    chart::model::Chart,
    digest::value::ArgValue,
    foundation::core::{ControllerBrand, Position, Timing},
    foundation::error::{ShardError, ShardResult},
};

/// Argument id to value, built once per generation request.
pub type ArgBag = BTreeMap<String, ArgValue>;

/// The arguments a shard was fed with, plus the identity of the caller that fed them.
///
/// Every `digest_*` accessor fails with [`ShardError::MissingArgument`] when the id is absent or
/// holds a different kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Digestion {
    brand: ControllerBrand,
    args: ArgBag,
}

impl Digestion {
    pub fn new(brand: ControllerBrand, args: ArgBag) -> Self {
        Self { brand, args }
    }

    pub fn brand(&self) -> &ControllerBrand {
        &self.brand
    }

    pub fn args(&self) -> &ArgBag {
        &self.args
    }

    fn read<'a, T>(
        &'a self,
        id: &str,
        f: impl FnOnce(&'a ArgValue) -> ShardResult<T>,
    ) -> ShardResult<T> {
        let value = self.args.get(id).ok_or_else(|| ShardError::missing(id))?;
        f(value).map_err(|_| ShardError::missing(id))
    }

    pub fn digest_string(&self, id: &str) -> ShardResult<&str> {
        self.read(id, ArgValue::as_string)
    }

    pub fn digest_int(&self, id: &str) -> ShardResult<i32> {
        self.read(id, ArgValue::as_int)
    }

    pub fn digest_long(&self, id: &str) -> ShardResult<i64> {
        self.read(id, ArgValue::as_long)
    }

    pub fn digest_double(&self, id: &str) -> ShardResult<f64> {
        self.read(id, ArgValue::as_double)
    }

    pub fn digest_boolean(&self, id: &str) -> ShardResult<bool> {
        self.read(id, ArgValue::as_boolean)
    }

    pub fn digest_string_array(&self, id: &str) -> ShardResult<&[String]> {
        self.read(id, ArgValue::as_string_array)
    }

    pub fn digest_int_array(&self, id: &str) -> ShardResult<&[i32]> {
        self.read(id, ArgValue::as_int_array)
    }

    pub fn digest_long_array(&self, id: &str) -> ShardResult<&[i64]> {
        self.read(id, ArgValue::as_long_array)
    }

    pub fn digest_double_array(&self, id: &str) -> ShardResult<Vec<f64>> {
        self.read(id, ArgValue::as_double_array)
    }

    pub fn digest_boolean_array(&self, id: &str) -> ShardResult<&[bool]> {
        self.read(id, ArgValue::as_boolean_array)
    }

    /// Only values fed as timings qualify; plain longs are rejected.
    pub fn digest_timing(&self, id: &str) -> ShardResult<Timing> {
        self.read(id, ArgValue::as_timing)
    }

    /// Only values fed as positions qualify; plain double arrays are rejected.
    pub fn digest_position(&self, id: &str) -> ShardResult<Position> {
        self.read(id, ArgValue::as_position)
    }

    pub fn digest_chart(&self, id: &str) -> ShardResult<&Chart> {
        self.read(id, ArgValue::as_chart)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/digest/bag.rs"]
mod tests;
