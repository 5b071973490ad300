// Annotated duplicate report export (xlsx only)
//
// One worksheet holding every roster row in presentation order plus the
// Groupe / Type_doublon columns, colored per group, followed by a legend.

use std::path::Path;
use std::time::Instant;

use log::debug;
use rollcall_dedup::model::{join_causes, GroupId, LabeledRecord};
use rollcall_dedup::DedupResult;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::csv::ROSTER_COLUMNS;
use crate::error::IoError;

pub const SHEET_NAME: &str = "Doublons_Intelligents";

pub const GROUP_COLUMN: &str = "Groupe";
pub const CAUSE_COLUMN: &str = "Type_doublon";

pub const LEGEND_TITLE: &str = "LÉGENDE : Groupes de doublons";
pub const LEGEND_HEADERS: [&str; 3] = ["Groupe", "Type", "Couleur"];

/// Group fills, assigned in group order and reused after the tenth group.
pub const GROUP_PALETTE: [u32; 10] = [
    0xFFE699, 0xFFD966, 0xFFCC80, 0xFFB366, 0xFF9999, 0xFF8080, 0xCC99FF, 0x99CCFF, 0x99FFCC,
    0x66FF99,
];

const HEADER_FILL: u32 = 0x1F4E79;
const MAX_COLUMN_WIDTH: usize = 50;

/// Output column headers, in order.
pub fn column_headers() -> [&'static str; 6] {
    let [m, n, p, s] = ROSTER_COLUMNS;
    [m, n, p, s, GROUP_COLUMN, CAUSE_COLUMN]
}

pub fn group_color(id: GroupId) -> u32 {
    GROUP_PALETTE[(id.saturating_sub(1) as usize) % GROUP_PALETTE.len()]
}

/// Result of an Excel export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Data rows written (header and legend excluded)
    pub rows_exported: usize,
    /// Groups listed in the legend
    pub groups_exported: usize,
    /// Export duration in milliseconds
    pub export_duration_ms: u128,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} row{}, {} group{}",
            self.rows_exported,
            if self.rows_exported == 1 { "" } else { "s" },
            self.groups_exported,
            if self.groups_exported == 1 { "" } else { "s" },
        )
    }
}

/// Cell values of one output row, in column order.
pub fn row_values(row: &LabeledRecord) -> [String; 6] {
    let raw = &row.record.raw;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        text(&raw.matricule),
        text(&raw.nom),
        text(&raw.prenom),
        text(&raw.sexe),
        row.group_label(),
        row.cause_label(),
    ]
}

/// Styling of one data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    pub fill: Option<u32>,
    /// First row of its group.
    pub opens_group: bool,
    /// Last row of its group.
    pub closes_group: bool,
}

/// Band for every row. Rows must be in presentation order, so that each
/// group's rows are contiguous.
pub fn row_bands(rows: &[LabeledRecord]) -> Vec<RowBand> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row.group {
            None => RowBand {
                fill: None,
                opens_group: false,
                closes_group: false,
            },
            Some(id) => RowBand {
                fill: Some(group_color(id)),
                opens_group: i == 0 || rows[i - 1].group != Some(id),
                closes_group: rows.get(i + 1).map_or(true, |next| next.group != Some(id)),
            },
        })
        .collect()
}

/// Column widths: longest value (in chars) plus two, capped at 50.
pub fn column_widths(rows: &[LabeledRecord]) -> [usize; 6] {
    let mut widths = column_headers().map(|h| h.chars().count());
    for row in rows {
        for (width, value) in widths.iter_mut().zip(row_values(row)) {
            *width = (*width).max(value.chars().count());
        }
    }
    widths.map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
}

/// Export the labeled rows and the group legend to `path`.
pub fn export(result: &DedupResult, path: &Path) -> Result<ExportResult, IoError> {
    let start_time = Instant::now();
    let mut stats = ExportResult::default();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    write_header(worksheet)?;
    stats.rows_exported = write_rows(worksheet, &result.rows)?;

    for (col, width) in column_widths(&result.rows).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    let last_col = (column_headers().len() - 1) as u16;
    worksheet.autofilter(0, 0, result.rows.len() as u32, last_col)?;
    worksheet.set_freeze_panes(1, 0)?;

    // Legend starts after one blank row.
    let legend_row = result.rows.len() as u32 + 2;
    stats.groups_exported = write_legend(worksheet, result, legend_row)?;

    workbook.save(path)?;

    stats.export_duration_ms = start_time.elapsed().as_millis();
    debug!("{}: {}", path.display(), stats.summary());
    Ok(stats)
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
}

fn band_format(band: RowBand) -> Format {
    let mut format = Format::new().set_border(FormatBorder::Thin);
    if let Some(fill) = band.fill {
        format = format.set_background_color(Color::RGB(fill));
    }
    if band.opens_group {
        format = format.set_border_top(FormatBorder::Thick);
    }
    if band.closes_group {
        format = format.set_border_bottom(FormatBorder::Thick);
    }
    format
}

fn write_header(worksheet: &mut Worksheet) -> Result<(), IoError> {
    let format = header_format();
    for (col, name) in column_headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &format)?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[LabeledRecord]) -> Result<usize, IoError> {
    for ((i, row), band) in rows.iter().enumerate().zip(row_bands(rows)) {
        let format = band_format(band);
        let excel_row = i as u32 + 1;
        for (col, value) in row_values(row).iter().enumerate() {
            worksheet.write_string_with_format(excel_row, col as u16, value, &format)?;
        }
    }
    Ok(rows.len())
}

fn write_legend(
    worksheet: &mut Worksheet,
    result: &DedupResult,
    first_row: u32,
) -> Result<usize, IoError> {
    let title = Format::new().set_bold();
    worksheet.write_string_with_format(first_row, 0, LEGEND_TITLE, &title)?;

    let header = header_format();
    for (col, name) in LEGEND_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(first_row + 1, col as u16, *name, &header)?;
    }

    let thin = Format::new().set_border(FormatBorder::Thin);
    let mut row = first_row + 2;
    for group in &result.groups {
        let swatch = Format::new()
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(group_color(group.id)));
        worksheet.write_string_with_format(row, 0, &group.label, &thin)?;
        worksheet.write_string_with_format(row, 1, join_causes(&group.causes), &thin)?;
        worksheet.write_blank(row, 2, &swatch)?;
        row += 1;
    }
    Ok(result.groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_dedup::{run, DedupConfig, RawRecord};

    fn sample() -> DedupResult {
        run(
            &DedupConfig::default(),
            vec![
                RawRecord::new("A1", "Dupont", "Jean", "M"),
                RawRecord::new("A1", "DUPONT", "JEAN", "M"),
                RawRecord::new("B2", "Martin", "Luc", "M"),
                RawRecord::new("C3", "Kone", "Awa", "F"),
                RawRecord::new("C4", "KONE", "AWA", "F"),
                RawRecord::new("C4", "Sow", "Ibrahima", "M"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(group_color(1), 0xFFE699);
        assert_eq!(group_color(10), 0x66FF99);
        assert_eq!(group_color(11), 0xFFE699);
        assert_eq!(group_color(23), 0xFFCC80);
    }

    #[test]
    fn test_row_bands_mark_group_edges() {
        let result = sample();
        // G1: A1 pair; G2: Kone/C3, Kone/C4, Sow/C4; then Martin.
        let bands = row_bands(&result.rows);
        assert_eq!(bands.len(), 6);

        assert!(bands[0].opens_group && !bands[0].closes_group);
        assert!(!bands[1].opens_group && bands[1].closes_group);
        assert_eq!(bands[0].fill, Some(0xFFE699));

        assert!(bands[2].opens_group);
        assert!(!bands[3].opens_group && !bands[3].closes_group);
        assert!(bands[4].closes_group);
        assert_eq!(bands[3].fill, Some(0xFFD966));

        assert_eq!(
            bands[5],
            RowBand {
                fill: None,
                opens_group: false,
                closes_group: false
            }
        );
    }

    #[test]
    fn test_single_row_group_band_opens_and_closes() {
        let mut result = sample();
        result.rows.truncate(3);
        result.rows[2].group = Some(7);
        let bands = row_bands(&result.rows);
        assert!(bands[2].opens_group && bands[2].closes_group);
    }

    #[test]
    fn test_column_widths_capped() {
        let mut result = sample();
        result.rows[0].record.raw.nom = Some("X".repeat(80));
        let widths = column_widths(&result.rows);
        assert_eq!(widths[0], "matricule".len() + 2);
        assert_eq!(widths[1], MAX_COLUMN_WIDTH);
        // Cause labels are measured in chars, not bytes.
        assert!(widths[5] <= MAX_COLUMN_WIDTH);
    }

    #[test]
    fn test_row_values_missing_as_empty() {
        let mut result = sample();
        result.rows[0].record.raw.sexe = None;
        let values = row_values(&result.rows[0]);
        assert_eq!(values[3], "");
        assert_eq!(values[4], "G1");
        assert_eq!(values[5], "MATRICULE DUPLIQUÉ");
    }

    #[test]
    fn test_export_summary() {
        let stats = ExportResult {
            rows_exported: 1,
            groups_exported: 2,
            export_duration_ms: 0,
        };
        assert_eq!(stats.summary(), "1 row, 2 groups");
    }
}
