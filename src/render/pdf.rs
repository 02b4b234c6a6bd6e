//! PDF serialization of a [`Layout`] using the base-14 Helvetica family.
use super::classify::{FontWeight, Rgb, BLACK, RULE_GRAY};
use super::layout::{Align, Element, Layout, PlacedText, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

const PT_PER_MM: f32 = 72.0 / 25.4;

// Average advance widths (per unit of font size) used for centering.
const REGULAR_ADVANCE: f32 = 0.50;
const BOLD_ADVANCE: f32 = 0.55;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";

/// Serialize `layout` into PDF bytes.
pub fn write_pdf(layout: &Layout) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = base_font(&mut doc, "Helvetica");
    let bold = base_font(&mut doc, "Helvetica-Bold");
    let italic = base_font(&mut doc, "Helvetica-Oblique");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular,
            FONT_BOLD => bold,
            FONT_ITALIC => italic,
        },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let mut ops = Vec::new();
        push_text(&mut ops, &page.header);
        set_fill(&mut ops, BLACK);
        for element in &page.elements {
            match element {
                Element::Row { text, .. } => push_text(&mut ops, text),
                Element::Rule { y } => push_rule(&mut ops, *y),
                Element::Spacer { .. } => {}
            }
        }
        push_text(&mut ops, &page.footer);

        let content = Content { operations: ops };
        let encoded = content.encode().context("encode page content")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH * PT_PER_MM),
                Object::Real(PAGE_HEIGHT * PT_PER_MM),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).context("serialize PDF document")?;
    Ok(bytes)
}

fn base_font(doc: &mut Document, name: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => name,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn font_key(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Regular => FONT_REGULAR,
        FontWeight::Bold => FONT_BOLD,
        FontWeight::Italic => FONT_ITALIC,
    }
}

fn set_fill(ops: &mut Vec<Operation>, color: Rgb) {
    ops.push(Operation::new("rg", rgb_operands(color)));
}

fn rgb_operands(Rgb(r, g, b): Rgb) -> Vec<Object> {
    [r, g, b]
        .into_iter()
        .map(|channel| Object::Real(f32::from(channel) / 255.0))
        .collect()
}

fn push_text(ops: &mut Vec<Operation>, placed: &PlacedText) {
    let size = placed.style.size;
    let encoded = encode_win_ansi(&placed.text);
    let x_mm = match placed.align {
        Align::Left => MARGIN,
        Align::Center => {
            let width_mm = text_width_pt(encoded.len(), placed.style.weight, size) / PT_PER_MM;
            ((PAGE_WIDTH - width_mm) / 2.0).max(MARGIN)
        }
    };
    // Vertically centered in its box, measured from the page bottom.
    let baseline_mm = placed.top + placed.height / 2.0 + 0.3 * size / PT_PER_MM;
    let x = x_mm * PT_PER_MM;
    let y = (PAGE_HEIGHT - baseline_mm) * PT_PER_MM;

    set_fill(ops, placed.style.color);
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![font_key(placed.style.weight).into(), Object::Real(size)],
    ));
    ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encoded, StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn push_rule(ops: &mut Vec<Operation>, y_mm: f32) {
    let y = (PAGE_HEIGHT - y_mm) * PT_PER_MM;
    ops.push(Operation::new("RG", rgb_operands(RULE_GRAY)));
    ops.push(Operation::new("w", vec![Object::Real(0.5)]));
    ops.push(Operation::new(
        "m",
        vec![Object::Real(MARGIN * PT_PER_MM), Object::Real(y)],
    ));
    ops.push(Operation::new(
        "l",
        vec![Object::Real((PAGE_WIDTH - MARGIN) * PT_PER_MM), Object::Real(y)],
    ));
    ops.push(Operation::new("S", vec![]));
}

fn text_width_pt(chars: usize, weight: FontWeight, size: f32) -> f32 {
    let advance = match weight {
        FontWeight::Bold => BOLD_ADVANCE,
        FontWeight::Regular | FontWeight::Italic => REGULAR_ADVANCE,
    };
    chars as f32 * advance * size
}

/// Map text onto the WinAnsi code page used by the base-14 fonts.
///
/// Typographic punctuation maps to its WinAnsi slot; anything else outside
/// Latin-1 becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{20ac}' => 0x80,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
