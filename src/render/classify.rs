//! Line classification and per-row styling.
//!
//! Classification looks at a single trimmed line and nothing else, so the
//! same text always lands in the same class regardless of its neighbours.
use regex::Regex;
use std::sync::LazyLock;

const HEADING_COLON_MAX_CHARS: usize = 60;
const HEADING_UPPER_MAX_CHARS: usize = 80;

static SUBHEADING_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(weather analysis|breakfast|lunch|dinner|tips|alternative)")
        .expect("valid subheading regex")
});

const VENUE_PREFIXES: [&str; 2] = ["Venue:", "Experience ("];

/// Class of a non-blank itinerary line, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Heading,
    SubHeading,
    Venue,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
    Italic,
}

/// RGB color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const DARK_SLATE: Rgb = Rgb(44, 62, 80);
pub const ACCENT_RED: Rgb = Rgb(192, 57, 43);
pub const ACCENT_GREEN: Rgb = Rgb(39, 174, 96);
pub const BRAND: Rgb = Rgb(230, 126, 34);
pub const FOOTER_GRAY: Rgb = Rgb(128, 128, 128);
pub const RULE_GRAY: Rgb = Rgb(200, 200, 200);

/// Font and color for one emitted row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub color: Rgb,
}

/// Vertical spacing attached to a class, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub before: f32,
    pub row_height: f32,
    pub after: f32,
}

/// Classify a trimmed, non-blank line.
pub fn classify(line: &str) -> LineClass {
    let chars = line.chars().count();
    let colon_heading = line.ends_with(':') && chars < HEADING_COLON_MAX_CHARS;
    if colon_heading || (is_upper_case(line) && chars < HEADING_UPPER_MAX_CHARS) {
        return LineClass::Heading;
    }
    if SUBHEADING_PREFIX.is_match(line) {
        return LineClass::SubHeading;
    }
    if VENUE_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return LineClass::Venue;
    }
    LineClass::Body
}

// At least one cased character and no lower-case ones.
fn is_upper_case(text: &str) -> bool {
    let mut saw_upper = false;
    for ch in text.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            saw_upper = true;
        }
    }
    saw_upper
}

impl LineClass {
    pub fn style(self) -> RowStyle {
        match self {
            LineClass::Heading => RowStyle {
                weight: FontWeight::Bold,
                size: 14.0,
                color: DARK_SLATE,
            },
            LineClass::SubHeading => RowStyle {
                weight: FontWeight::Bold,
                size: 12.0,
                color: ACCENT_RED,
            },
            LineClass::Venue => RowStyle {
                weight: FontWeight::Bold,
                size: 11.0,
                color: ACCENT_GREEN,
            },
            LineClass::Body => RowStyle {
                weight: FontWeight::Regular,
                size: 10.0,
                color: BLACK,
            },
        }
    }

    pub fn spacing(self) -> Spacing {
        match self {
            LineClass::Heading => Spacing {
                before: 3.0,
                row_height: 8.0,
                after: 2.0,
            },
            LineClass::SubHeading => Spacing {
                before: 2.0,
                row_height: 7.0,
                after: 1.0,
            },
            LineClass::Venue => Spacing {
                before: 0.0,
                row_height: 6.0,
                after: 1.0,
            },
            LineClass::Body => Spacing {
                before: 0.0,
                row_height: 5.0,
                after: 0.0,
            },
        }
    }

    /// Only body text is word-wrapped.
    pub fn wraps(self) -> bool {
        matches!(self, LineClass::Body)
    }
}
