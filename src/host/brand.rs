use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::core::ControllerBrand;
use crate::foundation::error::{ShardError, ShardResult};

static BRAND: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\w+)/([\d.]+)").ok());

/// Parse a caller identity out of a free-form string such as a `User-Agent` header.
///
/// The first `name/version` pair wins: `ArcadePlus/0.5.3 (Linux)` yields `ArcadePlus` / `0.5.3`.
pub fn parse_brand(raw: &str) -> ShardResult<ControllerBrand> {
    let re = BRAND
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("controller brand pattern failed to compile"))?;
    let caps = re.captures(raw).ok_or_else(|| {
        ShardError::validation(format!(
            "unable to detect controller brand in `{raw}`, expected `name/version`"
        ))
    })?;
    Ok(ControllerBrand::new(&caps[1], &caps[2]))
}

impl std::str::FromStr for ControllerBrand {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_brand(s)
    }
}
