// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::{ColumnKind, column_kind};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// XLSX with styled header, banded rows and auto-sized columns.
pub(crate) fn write_xlsx(rows: &[Vec<String>], headers: &[&str], path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let kinds: Vec<ColumnKind> = headers.iter().map(|h| column_kind(h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, values) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in values.iter().enumerate().take(headers.len()) {
            write_xlsx_cell(worksheet, row, col as u16, cell_value(kinds[col], value), band_color)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;
    Ok(())
}

/// Typed value of one cell.
#[derive(Debug, PartialEq)]
enum CellValue<'a> {
    Date(&'static str, f64),
    Number(f64),
    Text(&'a str),
}

/// Dates and numbers only in typed columns; a text column keeps "007" as is.
fn cell_value(kind: ColumnKind, s: &str) -> CellValue<'_> {
    match kind {
        ColumnKind::DateTime => match parse_to_excel_date(s) {
            Some((num_format, serial)) => CellValue::Date(num_format, serial),
            None => CellValue::Text(s),
        },
        ColumnKind::Integer => match s.parse::<i64>() {
            Ok(num) => CellValue::Number(num as f64),
            Err(_) => CellValue::Text(s),
        },
        ColumnKind::Text => CellValue::Text(s),
    }
}

fn write_xlsx_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: CellValue<'_>,
    bg: Color,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    let written = match value {
        CellValue::Date(num_format, serial) => {
            worksheet.write_with_format(row, col, serial, &base.set_num_format(num_format))
        }
        CellValue::Number(num) => {
            worksheet.write_with_format(row, col, num, &base.set_align(FormatAlign::Right))
        }
        CellValue::Text(s) => worksheet.write_with_format(row, col, s, &base),
    };
    written.map_err(to_export_error)?;

    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("XLSX: {e}"))
}
