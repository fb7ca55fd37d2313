/// Absolute chart time in milliseconds.
pub type Timing = i64;

/// A point in the chart's 2D arc coordinate space.
///
/// Encoded on the wire as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_with(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Position {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        p.to_array()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Identity of the client driving a session (`name/version`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ControllerBrand {
    /// Client application name.
    pub name: String,
    /// Client version string.
    pub version: String,
}

impl ControllerBrand {
    /// Build a brand from its two parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ControllerBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Display text with optional translations.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    /// English text, always present.
    pub en: String,
    /// Simplified Chinese text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh_hans: Option<String>,
}

impl LocalizedString {
    /// English-only display text.
    pub fn new(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh_hans: None,
        }
    }

    /// Attach a Simplified Chinese translation.
    pub fn zh_hans(mut self, text: impl Into<String>) -> Self {
        self.zh_hans = Some(text.into());
        self
    }
}

impl From<&str> for LocalizedString {
    fn from(en: &str) -> Self {
        Self::new(en)
    }
}
