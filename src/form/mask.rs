use regex::Regex;

use crate::domain::{FormatSegment, SegmentKind};

const ALPHANUMERIC_SLOT: char = '*';
const NUMERIC_SLOT: char = '9';
const ALPHABETIC_SLOT: char = 'a';

/// Build the literal mask pattern for a format.
///
/// Each segment becomes a run of slot characters followed by its delimiter;
/// the last segment's delimiter is dropped.
pub fn build_mask(format: &[FormatSegment]) -> String {
    let last = format.len().saturating_sub(1);
    format
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let slot = match segment.kind {
                SegmentKind::Alphanumeric => ALPHANUMERIC_SLOT,
                SegmentKind::Numeric => NUMERIC_SLOT,
                SegmentKind::Alphabetic => ALPHABETIC_SLOT,
            };
            let mut run = std::iter::repeat_n(slot, segment.character_length).collect::<String>();
            if index != last {
                run.push_str(&segment.delimiter);
            }
            run
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Digit,
    Letter,
    Alphanumeric,
    Literal(char),
}

impl Slot {
    fn from_char(ch: char) -> Self {
        match ch {
            NUMERIC_SLOT => Slot::Digit,
            ALPHABETIC_SLOT => Slot::Letter,
            ALPHANUMERIC_SLOT => Slot::Alphanumeric,
            other => Slot::Literal(other),
        }
    }

    fn accepts(self, ch: char) -> bool {
        match self {
            Slot::Digit => ch.is_ascii_digit(),
            Slot::Letter => ch.is_ascii_alphabetic(),
            Slot::Alphanumeric => ch.is_ascii_alphanumeric(),
            Slot::Literal(_) => false,
        }
    }

    fn regex_fragment(self) -> String {
        match self {
            Slot::Digit => "[0-9]".to_string(),
            Slot::Letter => "[A-Za-z]".to_string(),
            Slot::Alphanumeric => "[A-Za-z0-9]".to_string(),
            Slot::Literal(ch) => regex::escape(&ch.to_string()),
        }
    }
}

/// Keystroke-level constraint for masked inputs.
///
/// The buffer behind a mask always holds the raw value (slot characters only);
/// literals are inserted by [`MaskPattern::render`].
#[derive(Debug, Clone)]
pub struct MaskPattern {
    pattern: String,
    slots: Vec<Slot>,
    matcher: Regex,
}

impl MaskPattern {
    /// Returns `None` for an empty format.
    pub fn from_format(format: &[FormatSegment]) -> Option<Self> {
        if format.is_empty() {
            return None;
        }
        Self::parse(&build_mask(format))
    }

    pub fn parse(pattern: &str) -> Option<Self> {
        let slots: Vec<Slot> = pattern.chars().map(Slot::from_char).collect();
        if !slots.iter().any(|slot| !matches!(slot, Slot::Literal(_))) {
            return None;
        }
        let body: String = slots.iter().map(|slot| slot.regex_fragment()).collect();
        let matcher = Regex::new(&format!("^{body}$")).ok()?;
        Some(Self {
            pattern: pattern.to_string(),
            slots,
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of editable positions.
    pub fn capacity(&self) -> usize {
        self.editable().count()
    }

    /// Whether `ch` may fill the raw position `index`.
    pub fn accepts(&self, index: usize, ch: char) -> bool {
        self.editable()
            .nth(index)
            .is_some_and(|slot| slot.accepts(ch))
    }

    /// Keep only the characters of `input` that fit the mask, in order.
    ///
    /// Literal characters are skipped so that pasting a formatted value
    /// yields the same raw value as typing it.
    pub fn conform(&self, input: &str) -> String {
        let mut raw = String::new();
        let mut slots = self.editable().peekable();
        for ch in input.chars() {
            let Some(slot) = slots.peek() else {
                break;
            };
            if slot.accepts(ch) {
                raw.push(ch);
                slots.next();
            }
        }
        raw
    }

    /// Masked display of a raw value; literals appear only before filled slots.
    pub fn render(&self, raw: &str) -> String {
        let mut out = String::new();
        let mut pending = String::new();
        let mut chars = raw.chars();
        for slot in &self.slots {
            match slot {
                Slot::Literal(ch) => pending.push(*ch),
                _ => match chars.next() {
                    Some(ch) => {
                        out.push_str(&pending);
                        pending.clear();
                        out.push(ch);
                    }
                    None => break,
                },
            }
        }
        out
    }

    /// True when every slot of the mask is filled by `raw`.
    pub fn is_complete(&self, raw: &str) -> bool {
        self.matcher.is_match(&self.render(raw))
    }

    fn editable(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots
            .iter()
            .copied()
            .filter(|slot| !matches!(slot, Slot::Literal(_)))
    }
}
