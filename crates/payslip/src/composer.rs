//! Single-page slip composition
//!
//! Blocks are drawn top to bottom at fixed positions from [`Layout`]. Only
//! the ledger's height depends on the record; nothing else reflows, so very
//! long identity values can run into neighbouring blocks.

use crate::amount::{format_amount, Amount};
use crate::fields::Field;
use crate::layout::Layout;
use crate::ledger::{net_salary_figure, Column, Ledger, TableLayout};
use crate::record::Record;
use crate::stamp::{StampAsset, StampOverlay};
use crate::Result;
use chrono::NaiveDate;
use lopdf::Document;
use pdf_core::{Align, ImageScaleMode, PageCanvas, StandardFont};

/// A composed content page and the figures printed on it
#[derive(Debug)]
pub struct ComposedSlip {
    /// One-page content document, not yet merged with the template
    pub document: Document,
    pub ledger: Ledger,
    pub net_salary: Amount,
    /// Whether the watermark and seal were drawn
    pub stamped: bool,
}

/// Compose the content page for one record
///
/// `stamp` is drawn as both the watermark and the seal when present; pass
/// `None` to produce an unstamped page.
pub fn compose(
    record: &Record,
    period: &str,
    generated_on: NaiveDate,
    stamp: Option<&StampAsset>,
    layout: &Layout,
) -> Result<ComposedSlip> {
    layout.validate()?;
    let mut canvas = PageCanvas::new(layout.page_width, layout.page_height);

    draw_title(&mut canvas, layout);
    draw_identity(&mut canvas, record, period, layout);

    let ledger = Ledger::from_record(record);
    let table = TableLayout::new(&layout.ledger, layout.ledger_top(), ledger.row_count());
    let cursor = draw_ledger(&mut canvas, &ledger, &table, layout);

    let net_salary = net_salary_figure(record);
    draw_banner(&mut canvas, net_salary, cursor, layout);

    if let Some(stamp) = stamp {
        draw_overlay(&mut canvas, &stamp.watermark(layout, table.width))?;
        draw_seal_section(&mut canvas, stamp, layout)?;
    }

    draw_footer(&mut canvas, generated_on, layout)?;

    Ok(ComposedSlip {
        document: canvas.finish()?,
        ledger,
        net_salary,
        stamped: stamp.is_some(),
    })
}

fn draw_title(canvas: &mut PageCanvas, layout: &Layout) {
    let title = &layout.title;
    canvas.set_font(StandardFont::HelveticaBold, title.font_size);
    canvas.set_fill_color(layout.palette.ink.to_color());
    canvas.insert_text(&title.text, title.x, title.y, Align::Left);
}

fn draw_identity(canvas: &mut PageCanvas, record: &Record, period: &str, layout: &Layout) {
    let identity = &layout.identity;
    let placeholder = identity.placeholder.as_str();

    let lines = [
        (
            "Employee Name:",
            Field::EmployeeName.text(record).unwrap_or(placeholder),
        ),
        (
            "Designation:",
            Field::Designation.text(record).unwrap_or(placeholder),
        ),
        ("Month & Year:", period),
    ];

    canvas.set_fill_color(layout.palette.ink.to_color());
    for (i, (label, value)) in lines.into_iter().enumerate() {
        let y = identity.top + i as f64 * identity.line_gap;
        canvas.set_font(StandardFont::HelveticaBold, identity.font_size);
        canvas.insert_text(label, identity.label_x, y, Align::Left);
        canvas.set_font(StandardFont::Helvetica, identity.font_size);
        canvas.insert_text(value, identity.value_x, y, Align::Left);
    }
}

/// Draw the ledger table, returning the cursor below it
fn draw_ledger(
    canvas: &mut PageCanvas,
    ledger: &Ledger,
    table: &TableLayout,
    layout: &Layout,
) -> f64 {
    let settings = &layout.ledger;
    let palette = &layout.palette;
    let col_w = table.column_width();
    let columns = [
        (Column::Earnings, &ledger.earnings, &settings.earnings_title, &settings.total_earnings_label),
        (
            Column::Deductions,
            &ledger.deductions,
            &settings.deductions_title,
            &settings.total_deductions_label,
        ),
    ];

    // Header
    canvas.set_fill_color(palette.primary.to_color());
    for (column, ..) in &columns {
        canvas.fill_rect(table.column_x(*column), table.top, col_w, table.header_height);
    }
    canvas.set_fill_color(palette.white.to_color());
    canvas.set_font(StandardFont::HelveticaBold, settings.header_font_size);
    for (column, _, title, _) in &columns {
        canvas.insert_text(
            title,
            table.column_x(*column) + settings.padding,
            table.top + settings.header_baseline,
            Align::Left,
        );
    }

    // Data rows; the shorter section leaves its extra rows blank
    for row in 0..table.rows {
        let top = table.row_top(row);
        let shade = if TableLayout::is_shaded(row) {
            palette.shade
        } else {
            palette.white
        };
        canvas.set_fill_color(shade.to_color());
        for (column, ..) in &columns {
            canvas.fill_rect(table.column_x(*column), top, col_w, table.row_height);
        }

        canvas.set_fill_color(palette.ink.to_color());
        canvas.set_font(StandardFont::Helvetica, settings.row_font_size);
        for (column, section, ..) in &columns {
            if let Some(item) = section.items.get(row) {
                draw_amount_row(
                    canvas,
                    table.column_x(*column),
                    col_w,
                    top,
                    &item.label,
                    item.amount,
                    layout,
                );
            }
        }
    }

    // Totals
    let totals_top = table.totals_top();
    canvas.set_fill_color(palette.totals.to_color());
    for (column, ..) in &columns {
        canvas.fill_rect(table.column_x(*column), totals_top, col_w, table.row_height);
    }
    canvas.set_fill_color(palette.ink.to_color());
    canvas.set_font(StandardFont::HelveticaBold, settings.row_font_size);
    for (column, section, _, total_label) in &columns {
        draw_amount_row(
            canvas,
            table.column_x(*column),
            col_w,
            totals_top,
            total_label,
            section.total,
            layout,
        );
    }

    // Borders
    canvas.set_stroke_color(palette.dark.to_color());
    canvas.set_line_width(settings.border_width);
    for (column, ..) in &columns {
        canvas.stroke_rect(table.column_x(*column), table.top, col_w, table.height());
    }

    table.bottom() + settings.gap_after
}

fn draw_amount_row(
    canvas: &mut PageCanvas,
    x: f64,
    width: f64,
    top: f64,
    label: &str,
    amount: Amount,
    layout: &Layout,
) {
    let settings = &layout.ledger;
    let baseline = top + settings.row_baseline;
    canvas.insert_text(label, x + settings.padding, baseline, Align::Left);
    canvas.insert_text(
        &format_amount(amount),
        x + width - settings.padding,
        baseline,
        Align::Right,
    );
}

/// Draw the net salary banner at `top`, returning the cursor below it
fn draw_banner(canvas: &mut PageCanvas, amount: Amount, top: f64, layout: &Layout) -> f64 {
    let banner = &layout.banner;
    let x = layout.ledger.x;
    let width = layout.ledger.width;

    canvas.set_fill_color(layout.palette.primary.to_color());
    canvas.fill_rect(x, top, width, banner.height);

    canvas.set_fill_color(layout.palette.white.to_color());
    canvas.set_font(StandardFont::HelveticaBold, banner.font_size);
    let baseline = top + banner.baseline;
    canvas.insert_text(&banner.label, x + banner.padding, baseline, Align::Left);
    canvas.insert_text(
        &format_amount(amount),
        x + width - banner.padding,
        baseline,
        Align::Right,
    );

    top + banner.height + banner.gap_after
}

fn draw_overlay(canvas: &mut PageCanvas, overlay: &StampOverlay) -> Result<()> {
    canvas.insert_image(
        &overlay.image,
        overlay.x,
        overlay.y,
        overlay.width,
        overlay.height,
        ImageScaleMode::Stretch,
    )?;
    Ok(())
}

/// Signature line, its label and the rotated seal on top
fn draw_seal_section(canvas: &mut PageCanvas, stamp: &StampAsset, layout: &Layout) -> Result<()> {
    let seal = &layout.seal;
    let line_y = layout.from_bottom(seal.line_from_bottom);
    let ink = layout.palette.ink.to_color();

    canvas.set_stroke_color(ink);
    canvas.set_line_width(seal.line_thickness);
    canvas.line((seal.line_x, line_y), (seal.line_x + seal.line_width, line_y));

    canvas.set_fill_color(ink);
    canvas.set_font(StandardFont::HelveticaBold, seal.label_font_size);
    canvas.insert_text(
        &seal.label,
        seal.line_x + seal.label_offset_x,
        line_y + seal.label_drop,
        Align::Left,
    );

    draw_overlay(canvas, &stamp.seal(layout))
}

fn draw_footer(canvas: &mut PageCanvas, generated_on: NaiveDate, layout: &Layout) -> Result<()> {
    let footer = &layout.footer;
    let text = footer.render_date(generated_on)?;

    canvas.set_fill_color(layout.palette.text.to_color());
    canvas.set_font(StandardFont::Helvetica, footer.font_size);
    canvas.insert_text(&text, footer.x, layout.from_bottom(footer.from_bottom), Align::Left);
    Ok(())
}
