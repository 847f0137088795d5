//! Paginated PDF renderer (A4, built-in Helvetica).
//!
//! Line items flow across pages; the totals block is rendered exactly
//! once, on the final page. Page layout is planned up front by
//! [`plan_pages`], a pure function, so pagination behavior is testable
//! without parsing PDF bytes.

use crate::document::{InvoiceDocument, PartyBlock};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 195.0;
const MARGIN_BOTTOM: f32 = 20.0;
/// Table top on continuation pages.
const CONT_TOP: f32 = 280.0;
const TABLE_HEADER_HEIGHT: f32 = 10.0;
const ROW_HEIGHT: f32 = 6.0;
const SECONDARY_HEIGHT: f32 = 4.5;

// Table column x positions.
const COL_DESC: f32 = MARGIN_LEFT;
const COL_QTY: f32 = 120.0;
const COL_RATE: f32 = 142.0;
const COL_AMOUNT: f32 = 172.0;

/// Row placement across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Line-item row ranges, one per page, in order.
    pub pages: Vec<Range<usize>>,
    /// Whether the totals/notes tail needs a page of its own after the
    /// last row page.
    pub tail_on_new_page: bool,
}

/// Plan which rows land on which page.
///
/// `first_page_space` is the vertical room for rows on page one (below the
/// header and party blocks); `continuation_space` the room on later pages.
/// `tail_height` is the height of the terminal totals/notes block, which
/// must fit below the final row.
pub fn plan_pages(
    row_heights: &[f32],
    first_page_space: f32,
    continuation_space: f32,
    tail_height: f32,
) -> PagePlan {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut space = first_page_space;
    let mut used = 0.0;

    for (i, height) in row_heights.iter().enumerate() {
        // An oversized row at the top of a page is still placed there.
        if used + height > space && i > start {
            pages.push(start..i);
            start = i;
            space = continuation_space;
            used = 0.0;
        }
        used += height;
    }
    pages.push(start..row_heights.len());

    let last_space = if pages.len() == 1 {
        first_page_space
    } else {
        continuation_space
    };
    let tail_on_new_page = used + tail_height > last_space;

    PagePlan {
        pages,
        tail_on_new_page,
    }
}

fn text(layer: &PdfLayerReference, font: &IndirectFontRef, s: &str, size: f32, x: f32, y: f32) {
    layer.use_text(s, size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
            (printpdf::Point::new(Mm(MARGIN_RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn draw_party(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    block: &PartyBlock,
    x: f32,
    mut y: f32,
) -> f32 {
    if block.name.is_none() && block.fields.is_empty() {
        return y;
    }
    text(layer, bold, &format!("{}:", block.title), 11.0, x, y);
    y -= 6.0;
    if let Some(name) = &block.name {
        text(layer, bold, name, 10.0, x, y);
        y -= 5.0;
    }
    for field in &block.fields {
        text(
            layer,
            font,
            &format!("{}: {}", field.label, field.value),
            9.0,
            x,
            y,
        );
        y -= 5.0;
    }
    y
}

fn draw_table_header(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    mut y: f32,
) -> f32 {
    text(layer, bold, "Description", 10.0, COL_DESC, y);
    text(layer, bold, "Qty", 10.0, COL_QTY, y);
    text(layer, bold, "Rate", 10.0, COL_RATE, y);
    text(layer, bold, "Amount", 10.0, COL_AMOUNT, y);
    y -= 3.5;
    divider(layer, y);
    y - 6.5
}

fn tail_height(doc: &InvoiceDocument) -> f32 {
    // divider + three totals lines
    let mut height = 8.0 + 3.0 * 7.0;
    if let Some(notes) = &doc.notes {
        height += 10.0 + 5.0 * notes.lines().count() as f32;
    }
    height
}

/// Render the document tree to PDF bytes.
pub fn render_pdf(doc_tree: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
    let title = format!("Invoice {}", doc_tree.header.invoice_number);
    let (pdf, page1, layer1) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let mut layer = pdf.get_page(page1).get_layer(layer1);

    // Title block, top right.
    text(&layer, &bold, "INVOICE", 22.0, 140.0, 285.0);
    text(
        &layer,
        &bold,
        &doc_tree.header.invoice_number,
        11.0,
        140.0,
        276.5,
    );
    if let Some(name) = &doc_tree.header.invoice_name {
        text(&layer, &font, name, 9.0, 140.0, 271.0);
    }

    // Issuer block, top left.
    let from_bottom = draw_party(&layer, &font, &bold, &doc_tree.from, MARGIN_LEFT, 285.0);

    let mut y = from_bottom.min(266.0) - 4.0;
    divider(&layer, y);
    y -= 8.0;

    // Client block left, invoice details right.
    let details_x = 120.0;
    let mut details_y = y;
    text(
        &layer,
        &font,
        &format!("Date: {}", doc_tree.header.date),
        9.0,
        details_x,
        details_y,
    );
    details_y -= 5.0;
    if let Some(due) = &doc_tree.header.due_date {
        text(
            &layer,
            &font,
            &format!("Due: {}", due),
            9.0,
            details_x,
            details_y,
        );
        details_y -= 5.0;
    }
    text(
        &layer,
        &font,
        &format!("Terms: {}", doc_tree.header.terms),
        9.0,
        details_x,
        details_y,
    );
    details_y -= 5.0;
    text(
        &layer,
        &font,
        &format!("Status: {}", doc_tree.header.status),
        9.0,
        details_x,
        details_y,
    );
    details_y -= 5.0;

    let bill_to_bottom = draw_party(&layer, &font, &bold, &doc_tree.bill_to, MARGIN_LEFT, y);
    y = bill_to_bottom.min(details_y) - 8.0;

    // Line-item table, planned across pages.
    let heights: Vec<f32> = doc_tree
        .lines
        .iter()
        .map(|line| {
            if line.secondary.is_some() {
                ROW_HEIGHT + SECONDARY_HEIGHT
            } else {
                ROW_HEIGHT
            }
        })
        .collect();
    let first_space = y - TABLE_HEADER_HEIGHT - MARGIN_BOTTOM;
    let cont_space = CONT_TOP - TABLE_HEADER_HEIGHT - MARGIN_BOTTOM;
    let plan = plan_pages(&heights, first_space, cont_space, tail_height(doc_tree));

    for (page_index, range) in plan.pages.iter().enumerate() {
        if page_index > 0 {
            let (page, layer_index) =
                pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = pdf.get_page(page).get_layer(layer_index);
            y = CONT_TOP;
        }
        y = draw_table_header(&layer, &bold, y);
        for line in &doc_tree.lines[range.clone()] {
            text(&layer, &font, &line.primary, 10.0, COL_DESC, y);
            text(&layer, &font, &line.quantity, 10.0, COL_QTY, y);
            text(&layer, &font, &line.rate, 10.0, COL_RATE, y);
            text(&layer, &bold, &line.amount, 10.0, COL_AMOUNT, y);
            if let Some(secondary) = &line.secondary {
                y -= SECONDARY_HEIGHT;
                text(&layer, &font, secondary, 8.0, COL_DESC + 3.0, y);
            }
            y -= ROW_HEIGHT;
        }
    }

    if plan.tail_on_new_page {
        let (page, layer_index) = pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        layer = pdf.get_page(page).get_layer(layer_index);
        y = CONT_TOP;
    }

    // Totals, once, on the final page.
    y -= 2.0;
    divider(&layer, y);
    y -= 8.0;
    text(&layer, &font, "Subtotal:", 10.0, COL_RATE, y);
    text(
        &layer,
        &font,
        &doc_tree.totals.subtotal,
        10.0,
        COL_AMOUNT,
        y,
    );
    y -= 7.0;
    text(&layer, &bold, "Total:", 11.0, COL_RATE, y);
    text(&layer, &bold, &doc_tree.totals.total, 11.0, COL_AMOUNT, y);
    y -= 7.0;
    text(&layer, &bold, "Balance Due:", 11.0, COL_RATE, y);
    text(
        &layer,
        &bold,
        &doc_tree.totals.balance_due,
        11.0,
        COL_AMOUNT,
        y,
    );

    if let Some(notes) = &doc_tree.notes {
        y -= 12.0;
        text(&layer, &bold, "Notes:", 10.0, MARGIN_LEFT, y);
        y -= 5.5;
        for line in notes.lines() {
            if y < MARGIN_BOTTOM {
                break;
            }
            text(&layer, &font, line, 9.0, MARGIN_LEFT, y);
            y -= 5.0;
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    pdf.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::invoice::{Invoice, InvoiceStatus, Party, Terms};
    use crate::money::MoneyFormat;
    use crate::totals::{compute_totals, LineItemInput};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn invoice_with_items(count: usize) -> Invoice {
        let rows: Vec<LineItemInput> = (0..count)
            .map(|i| LineItemInput {
                name: None,
                description: format!("Item {}", i + 1),
                rate: Some("10".to_string()),
                quantity: Some("1".to_string()),
            })
            .collect();
        let computed = compute_totals(&rows);
        Invoice {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            invoice_number: "INV-1".to_string(),
            invoice_name: None,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            terms: Terms::SevenDays,
            status: InvoiceStatus::Sent,
            share_token: None,
            from: Party {
                name: Some("Acme".to_string()),
                ..Party::default()
            },
            bill_to: Party {
                name: Some("Globex".to_string()),
                ..Party::default()
            },
            line_items: computed.line_items,
            subtotal: computed.subtotal,
            total: computed.total,
            balance_due: computed.balance_due,
            notes: None,
        }
    }

    #[test]
    fn plan_places_all_rows_exactly_once() {
        let heights = vec![6.0; 40];
        let plan = plan_pages(&heights, 120.0, 230.0, 30.0);
        assert!(plan.pages.len() > 1);
        let mut covered = 0;
        for (i, range) in plan.pages.iter().enumerate() {
            assert_eq!(range.start, covered, "page {} starts at wrong row", i);
            covered = range.end;
        }
        assert_eq!(covered, 40);
    }

    #[test]
    fn plan_single_page_when_everything_fits() {
        let heights = vec![6.0; 5];
        let plan = plan_pages(&heights, 120.0, 230.0, 30.0);
        assert_eq!(plan.pages, vec![0..5]);
        assert!(!plan.tail_on_new_page);
    }

    #[test]
    fn plan_empty_invoice_still_has_one_page() {
        let plan = plan_pages(&[], 120.0, 230.0, 30.0);
        assert_eq!(plan.pages, vec![0..0]);
        assert!(!plan.tail_on_new_page);
    }

    #[test]
    fn plan_pushes_tail_to_new_page_when_last_page_is_full() {
        let heights = vec![6.0; 20];
        let plan = plan_pages(&heights, 126.0, 230.0, 30.0);
        assert_eq!(plan.pages, vec![0..20]);
        assert!(plan.tail_on_new_page);
    }

    #[test]
    fn forty_items_flow_to_a_second_page_with_one_totals_block() {
        let heights = vec![ROW_HEIGHT; 40];
        let first_space = 150.0 - TABLE_HEADER_HEIGHT - MARGIN_BOTTOM;
        let cont_space = CONT_TOP - TABLE_HEADER_HEIGHT - MARGIN_BOTTOM;
        let plan = plan_pages(&heights, first_space, cont_space, 29.0);
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[0].end, plan.pages[1].start);
        assert_eq!(plan.pages[1].end, 40);
        // Totals land once, after the last row of the final page.
        assert!(!plan.tail_on_new_page);
    }

    #[test]
    fn renders_forty_items_to_pdf_bytes() {
        let doc =
            build_document(&invoice_with_items(40), &MoneyFormat::default()).unwrap();
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn renders_empty_invoice_to_pdf_bytes() {
        let doc = build_document(&invoice_with_items(0), &MoneyFormat::default()).unwrap();
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
