use crate::foundation::core::{Position, Timing};

/// Timing-group attribute that stops the group's notes from accepting input.
pub const NO_INPUT: &str = "noinput";

/// Beats-per-measure used by the scoped blocks of synthesized animations.
pub const ANIMATION_BEATS: f64 = 999.0;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Chart-level settings written to the header of the textual chart.
pub struct ChartConfig {
    /// Audio offset in milliseconds.
    pub audio_offset: i64,
    /// Additional `Key:Value` header lines, kept in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl ChartConfig {
    /// Config with the given audio offset and no extra header lines.
    pub fn with_audio_offset(audio_offset: i64) -> Self {
        Self {
            audio_offset,
            extra: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A complete chart: header config, the main timing group, and scoped sub-groups.
///
/// Sub-groups are kept in insertion order; their order is preserved by serialization.
pub struct Chart {
    /// Header configuration.
    pub config: ChartConfig,
    /// Main timeline.
    pub main: TimingGroup,
    /// Scoped timing blocks.
    #[serde(default)]
    pub groups: Vec<TimingGroup>,
}

impl Chart {
    /// Empty chart with the given header config.
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            main: TimingGroup::default(),
            groups: Vec::new(),
        }
    }

    /// Append a tempo marker to the main timeline.
    pub fn timing(&mut self, offset: Timing, bpm: f64, beats: f64) -> &mut Self {
        self.main.timing(offset, bpm, beats);
        self
    }

    /// Append a note to the main timeline.
    pub fn add_note(&mut self, note: Note) -> &mut Self {
        self.main.add_note(note);
        self
    }

    /// Open a scoped timing block, fill it with `build`, and commit it to the chart.
    pub fn timing_group<I, S>(&mut self, attrs: I, build: impl FnOnce(&mut TimingGroup)) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = TimingGroup::with_attrs(attrs);
        build(&mut group);
        self.commit_group(group)
    }

    /// Commit an already built scoped block. Returns its index.
    pub fn commit_group(&mut self, group: TimingGroup) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// Move all scoped blocks of `other` into this chart.
    pub fn merge_groups(&mut self, other: Chart) {
        self.groups.extend(other.groups);
    }

    /// Total number of notes across the main timeline and all scoped blocks.
    pub fn note_count(&self) -> usize {
        self.main.notes.len() + self.groups.iter().map(|g| g.notes.len()).sum::<usize>()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A bounded block of tempo markers plus the notes they govern.
pub struct TimingGroup {
    /// Group attributes such as [`NO_INPUT`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<String>,
    /// Tempo markers in insertion order.
    pub timings: Vec<TimingPoint>,
    /// Notes in insertion order.
    pub notes: Vec<Note>,
}

impl TimingGroup {
    /// Empty group carrying `attrs`.
    pub fn with_attrs<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attrs: attrs.into_iter().map(Into::into).collect(),
            timings: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Append a tempo marker.
    pub fn timing(&mut self, offset: Timing, bpm: f64, beats: f64) -> &mut Self {
        self.timings.push(TimingPoint { offset, bpm, beats });
        self
    }

    /// Append a note.
    pub fn add_note(&mut self, note: Note) -> &mut Self {
        self.notes.push(note);
        self
    }

    /// Whether the group carries `attr`.
    pub fn has_attr(&self, attr: &str) -> bool {
        self.attrs.iter().any(|a| a == attr)
    }

    /// Interval during which notes of this group are visible, derived from its tempo markers.
    ///
    /// The window opens at the first zero-tempo marker and closes at the next marker with a
    /// positive tempo. Returns `None` when the markers do not describe such a window.
    pub fn visible_window(&self) -> Option<(Timing, Timing)> {
        let open = self.timings.iter().position(|t| t.bpm == 0.0)?;
        let close = self.timings[open + 1..].iter().find(|t| t.bpm > 0.0)?;
        Some((self.timings[open].offset, close.offset))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One tempo marker.
pub struct TimingPoint {
    /// Marker time in milliseconds.
    pub offset: Timing,
    /// Tempo; negative and zero values are legal and used for visibility tricks.
    pub bpm: f64,
    /// Beats per measure.
    pub beats: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// A primitive chart event.
pub enum Note {
    /// Instantaneous ground note.
    Tap {
        /// Hit time.
        time: Timing,
        /// Lane index.
        lane: i32,
    },
    /// Held ground interval.
    Hold {
        /// Start time.
        time: Timing,
        /// End time.
        #[serde(rename = "endTime")]
        end_time: Timing,
        /// Lane index.
        lane: i32,
    },
    /// Curved sky interval.
    Arc(ArcNote),
}

impl Note {
    /// Time at which this note starts.
    pub fn time(&self) -> Timing {
        match self {
            Self::Tap { time, .. } | Self::Hold { time, .. } => *time,
            Self::Arc(arc) => arc.time,
        }
    }

    /// Time at which this note ends (equal to [`Note::time`] for taps).
    pub fn end_time(&self) -> Timing {
        match self {
            Self::Tap { time, .. } => *time,
            Self::Hold { end_time, .. } => *end_time,
            Self::Arc(arc) => arc.end_time,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Curved interval between two positions.
pub struct ArcNote {
    /// Start time.
    pub time: Timing,
    /// End time.
    pub end_time: Timing,
    /// Start position.
    pub start: Position,
    /// Easing-curve tag.
    pub curve: ArcCurve,
    /// End position.
    pub end: Position,
    /// Color index.
    pub color: ArcColor,
    /// Hit-sound name (`none` by default).
    pub hit_sound: String,
    /// Trace arcs are decorative and carry arctaps.
    pub trace: bool,
    /// Arctap times riding on this arc.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arctaps: Vec<Timing>,
}

impl ArcNote {
    /// Arc with default hit sound and no arctaps.
    pub fn new(
        time: Timing,
        end_time: Timing,
        start: Position,
        curve: ArcCurve,
        end: Position,
        color: ArcColor,
        trace: bool,
    ) -> Self {
        Self {
            time,
            end_time,
            start,
            curve,
            end,
            color,
            hit_sound: "none".to_string(),
            trace,
            arctaps: Vec::new(),
        }
    }

    /// Add an arctap at `time`.
    pub fn arctap(mut self, time: Timing) -> Self {
        self.arctaps.push(time);
        self
    }

    /// A 1 ms trace arc at `position` carrying a single arctap at `time`.
    pub fn quick_arctap(time: Timing, position: Position) -> Self {
        Self::new(
            time.saturating_sub(1),
            time,
            position,
            ArcCurve::S,
            position,
            ArcColor::BLUE,
            true,
        )
        .arctap(time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Easing-curve tag of an arc.
pub enum ArcCurve {
    B,
    S,
    Si,
    So,
    SiSi,
    SiSo,
    SoSi,
    SoSo,
}

impl ArcCurve {
    /// Tag used by the textual chart format.
    pub fn tag(self) -> &'static str {
        match self {
            Self::B => "b",
            Self::S => "s",
            Self::Si => "si",
            Self::So => "so",
            Self::SiSi => "sisi",
            Self::SiSo => "siso",
            Self::SoSi => "sosi",
            Self::SoSo => "soso",
        }
    }

    /// Parse a textual tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "b" => Self::B,
            "s" => Self::S,
            "si" => Self::Si,
            "so" => Self::So,
            "sisi" => Self::SiSi,
            "siso" => Self::SiSo,
            "sosi" => Self::SoSi,
            "soso" => Self::SoSo,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Arc color index.
pub struct ArcColor(pub u8);

impl ArcColor {
    /// Blue arc.
    pub const BLUE: Self = Self(0);
    /// Red arc.
    pub const RED: Self = Self(1);
    /// Green arc.
    pub const GREEN: Self = Self(2);
}

#[cfg(test)]
#[path = "../../tests/unit/chart/model.rs"]
mod tests;
