use serde::{Deserialize, Serialize};

/// Render-time configuration of a single field, as supplied by the owning form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    pub id: String,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub disabled: bool,
    pub uppercase: bool,
    #[serde(alias = "multiple")]
    pub multiline: bool,
    pub rich_text: bool,
    pub format: Vec<FormatSegment>,
    pub styles: FieldStyles,
    pub tooltip: Option<String>,
    pub with_label: bool,
    pub history_track: bool,
    /// Date-time recorded for the last tracked change, `YYYY-MM-DD HH:MM`.
    pub history_track_value: Option<String>,
}

impl FieldConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self.with_label = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Rich text only takes effect together with `multiline`.
    pub fn rich_text(mut self, rich_text: bool) -> Self {
        self.rich_text = rich_text;
        self
    }

    pub fn with_format(mut self, format: Vec<FormatSegment>) -> Self {
        self.format = format;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_styles(mut self, styles: FieldStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn history_track(mut self, enabled: bool) -> Self {
        self.history_track = enabled;
        self
    }

    pub fn with_history_track_value(mut self, value: impl Into<String>) -> Self {
        self.history_track_value = Some(value.into());
        self
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::from_flags(self.multiline, self.rich_text)
    }

    /// Text shown while the value is empty.
    pub fn placeholder_text(&self) -> &str {
        [self.placeholder.as_str(), self.label.as_str()]
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or(self.id.as_str())
    }

    pub fn display_label(&self) -> String {
        let label = if self.label.is_empty() {
            self.id.as_str()
        } else {
            self.label.as_str()
        };
        if self.required {
            format!("*{label}")
        } else {
            label.to_string()
        }
    }
}

/// Capability set a field renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    MultilineText,
    RichText,
}

impl RenderMode {
    pub fn from_flags(multiline: bool, rich_text: bool) -> Self {
        match (multiline, rich_text) {
            (true, true) => RenderMode::RichText,
            (true, false) => RenderMode::MultilineText,
            (false, _) => RenderMode::PlainText,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    #[serde(deserialize_with = "de_length")]
    pub character_length: usize,
    #[serde(default)]
    pub delimiter: String,
}

impl FormatSegment {
    pub fn new(kind: SegmentKind, character_length: usize, delimiter: impl Into<String>) -> Self {
        Self {
            kind,
            character_length,
            delimiter: delimiter.into(),
        }
    }

    pub fn numeric(character_length: usize, delimiter: impl Into<String>) -> Self {
        Self::new(SegmentKind::Numeric, character_length, delimiter)
    }

    pub fn alphanumeric(character_length: usize, delimiter: impl Into<String>) -> Self {
        Self::new(SegmentKind::Alphanumeric, character_length, delimiter)
    }

    pub fn alphabetic(character_length: usize, delimiter: impl Into<String>) -> Self {
        Self::new(SegmentKind::Alphabetic, character_length, delimiter)
    }
}

/// Segment type; anything other than `alphanumeric` or `numeric` is a letter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SegmentKind {
    Alphanumeric,
    Numeric,
    Alphabetic,
}

impl From<String> for SegmentKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "alphanumeric" => SegmentKind::Alphanumeric,
            "numeric" => SegmentKind::Numeric,
            _ => SegmentKind::Alphabetic,
        }
    }
}

impl From<SegmentKind> for String {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Alphanumeric => "alphanumeric",
            SegmentKind::Numeric => "numeric",
            SegmentKind::Alphabetic => "alphabetic",
        }
        .to_string()
    }
}

/// Visual overrides applied to the value panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldStyles {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

fn de_length<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Length {
        Number(usize),
        Text(String),
    }

    match Length::deserialize(deserializer)? {
        Length::Number(value) => Ok(value),
        Length::Text(text) => text
            .trim()
            .parse::<usize>()
            .map_err(|_| serde::de::Error::custom(format!("invalid characterLength '{text}'"))),
    }
}
