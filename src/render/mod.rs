//! Itinerary-to-PDF renderer.
//!
//! Rendering is a pure function of the itinerary text: lines are classified,
//! laid out onto pages, then serialized. No I/O happens here.

use anyhow::Result;
use serde::Serialize;

pub mod classify;
pub mod layout;
mod pdf;
pub mod wrap;

pub use classify::{classify, LineClass};
pub use layout::{layout, layout_with_title, Element, Layout, DEFAULT_TITLE, SECTION_SEPARATOR};

/// Rendering summary used for logs and `--json` output.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub sections: usize,
    pub rows: usize,
    pub rules: usize,
    pub bytes: usize,
}

/// Rendered PDF bytes plus a summary of the layout.
pub struct RenderedItinerary {
    pub pdf: Vec<u8>,
    pub summary: RenderSummary,
}

/// Render an itinerary with the given header title.
pub fn render_itinerary(text: &str, title: &str) -> Result<RenderedItinerary> {
    let layout = layout_with_title(text, title);
    let pdf = pdf::write_pdf(&layout)?;
    let summary = RenderSummary {
        pages: layout.pages.len(),
        sections: layout.section_count,
        rows: layout.row_count(),
        rules: layout.rule_count(),
        bytes: pdf.len(),
    };
    tracing::debug!(
        pages = summary.pages,
        sections = summary.sections,
        rows = summary.rows,
        bytes = summary.bytes,
        "itinerary rendered"
    );
    Ok(RenderedItinerary { pdf, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_layout() {
        let text = "PARIS:\nCroissants at dawn.\n---------------\nLYON:\nQuenelles at dusk.";
        let rendered = render_itinerary(text, DEFAULT_TITLE).expect("render");
        assert_eq!(
            rendered.summary,
            RenderSummary {
                pages: 1,
                sections: 2,
                rows: 4,
                rules: 1,
                bytes: rendered.pdf.len(),
            }
        );
        assert!(rendered.pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn empty_itinerary_renders_blank_page() {
        let rendered = render_itinerary("", DEFAULT_TITLE).expect("render");
        assert_eq!(rendered.summary.pages, 1);
        assert_eq!(rendered.summary.rows, 0);
        assert_eq!(rendered.summary.rules, 0);
    }
}
