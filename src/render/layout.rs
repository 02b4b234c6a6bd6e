//! Page layout for a rendered itinerary.
//!
//! The layout pass turns itinerary text into positioned pages without touching
//! PDF objects. Units are millimetres on an A4 page, measured from the top.
use super::classify::{classify, FontWeight, LineClass, RowStyle, BRAND, FOOTER_GRAY};
use super::wrap::{wrap_words, WRAP_WIDTH};

/// Literal marker between per-location sections.
pub const SECTION_SEPARATOR: &str = "---------------";

/// Title printed in every page header unless overridden.
pub const DEFAULT_TITLE: &str = "Weather-Aware Foodie Tour";

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const BOTTOM_MARGIN: f32 = 15.0;

/// Rows may not extend below this line.
pub const PAGE_BREAK_Y: f32 = PAGE_HEIGHT - BOTTOM_MARGIN;

const HEADER_ROW_HEIGHT: f32 = 10.0;
const HEADER_GAP: f32 = 10.0;
const FOOTER_ROW_HEIGHT: f32 = 10.0;

/// First usable cursor position below the header.
pub const CONTENT_TOP: f32 = MARGIN + HEADER_ROW_HEIGHT + HEADER_GAP;

const BLANK_LINE_GAP: f32 = 3.0;
const PARAGRAPH_GAP: f32 = 2.0;
const SECTION_GAP: f32 = 5.0;
/// Vertical room reserved for a section rule.
const RULE_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A single line of text with its box on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub style: RowStyle,
    pub align: Align,
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// One emitted text row; wrapped body lines produce several.
    Row {
        section: usize,
        class: LineClass,
        text: PlacedText,
    },
    /// Vertical space left by a blank input line.
    Spacer {
        section: usize,
        top: f32,
        height: f32,
    },
    /// Full-width separator between two sections.
    Rule { y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub header: PlacedText,
    pub footer: PlacedText,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    /// Number of non-blank sections that were laid out.
    pub section_count: usize,
}

impl Layout {
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|page| page.elements.iter())
    }

    pub fn row_count(&self) -> usize {
        self.elements()
            .filter(|element| matches!(element, Element::Row { .. }))
            .count()
    }

    pub fn rule_count(&self) -> usize {
        self.elements()
            .filter(|element| matches!(element, Element::Rule { .. }))
            .count()
    }
}

/// Advance the cursor by one row.
///
/// Returns the cursor after the row and whether the row had to move to a
/// fresh page because it would have crossed the bottom margin.
pub fn next_cursor(current: f32, row_height: f32) -> (f32, bool) {
    if current + row_height > PAGE_BREAK_Y {
        (CONTENT_TOP + row_height, true)
    } else {
        (current + row_height, false)
    }
}

/// Lay out `text` using the default header title.
pub fn layout(text: &str) -> Layout {
    layout_with_title(text, DEFAULT_TITLE)
}

pub fn layout_with_title(text: &str, title: &str) -> Layout {
    let mut builder = LayoutBuilder::new(title);
    let sections: Vec<&str> = text
        .split(SECTION_SEPARATOR)
        .filter(|section| !section.trim().is_empty())
        .collect();

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            builder.gap(SECTION_GAP);
            builder.rule();
            builder.gap(SECTION_GAP);
        }
        builder.section(index, section);
    }
    builder.finish(sections.len())
}

struct LayoutBuilder<'a> {
    title: &'a str,
    pages: Vec<Page>,
    cursor: f32,
}

impl<'a> LayoutBuilder<'a> {
    fn new(title: &'a str) -> Self {
        let mut builder = Self {
            title,
            pages: Vec::new(),
            cursor: CONTENT_TOP,
        };
        builder.new_page();
        builder
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            header: PlacedText {
                text: self.title.to_string(),
                style: RowStyle {
                    weight: FontWeight::Bold,
                    size: 20.0,
                    color: BRAND,
                },
                align: Align::Center,
                top: MARGIN,
                height: HEADER_ROW_HEIGHT,
            },
            footer: PlacedText {
                text: format!("Page {number}"),
                style: RowStyle {
                    weight: FontWeight::Italic,
                    size: 8.0,
                    color: FOOTER_GRAY,
                },
                align: Align::Center,
                top: PAGE_BREAK_Y,
                height: FOOTER_ROW_HEIGHT,
            },
            elements: Vec::new(),
        });
        self.cursor = CONTENT_TOP;
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn section(&mut self, section: usize, text: &str) {
        let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
        // Leading and trailing blank lines belong to the separator, not the section.
        let start = lines.iter().position(|line| !line.is_empty()).unwrap_or(0);
        let end = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |last| last + 1);
        let lines = &lines[start..end];

        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                let top = self.cursor;
                self.gap(BLANK_LINE_GAP);
                self.push(Element::Spacer {
                    section,
                    top,
                    height: self.cursor - top,
                });
                continue;
            }
            let next = lines.get(index + 1);
            let paragraph_ends = !matches!(next, Some(next) if !next.is_empty());
            self.line(section, line, paragraph_ends);
        }
    }

    fn line(&mut self, section: usize, line: &str, paragraph_ends: bool) {
        let class = classify(line);
        let style = class.style();
        let spacing = class.spacing();
        let rows = if class.wraps() {
            wrap_words(line, WRAP_WIDTH)
        } else {
            vec![line.to_string()]
        };

        self.gap(spacing.before);
        for row in rows {
            self.row(section, class, row, style, spacing.row_height);
        }
        self.gap(spacing.after);
        if paragraph_ends {
            self.gap(PARAGRAPH_GAP);
        }
    }

    fn row(
        &mut self,
        section: usize,
        class: LineClass,
        text: String,
        style: RowStyle,
        height: f32,
    ) {
        let (cursor, page_break) = next_cursor(self.cursor, height);
        if page_break {
            self.new_page();
        }
        self.cursor = cursor;
        self.push(Element::Row {
            section,
            class,
            text: PlacedText {
                text,
                style,
                align: Align::Left,
                top: cursor - height,
                height,
            },
        });
    }

    // Gaps never open a page on their own; the next row does.
    fn gap(&mut self, height: f32) {
        self.cursor = (self.cursor + height).min(PAGE_BREAK_Y);
    }

    // A rule that would touch the footer moves to the top of a fresh page.
    fn rule(&mut self) {
        let (cursor, page_break) = next_cursor(self.cursor, RULE_HEIGHT);
        if page_break {
            self.new_page();
        }
        self.cursor = cursor;
        self.push(Element::Rule {
            y: cursor - RULE_HEIGHT,
        });
    }

    fn finish(self, section_count: usize) -> Layout {
        Layout {
            pages: self.pages,
            section_count,
        }
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
