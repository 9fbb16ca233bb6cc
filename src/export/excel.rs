//! Spreadsheet renderer: one worksheet with a report preamble, a styled
//! header row and one data row per provider.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use super::{CellValue, ExportError, RenderedReport, TabularProjection};
use crate::report::ReportPayload;

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Provider Report";
const COLUMN_WIDTH: f64 = 15.0;
const HEADER_FILL: Color = Color::RGB(0xE6E6FA);

/// Render the projection as an xlsx workbook.
pub fn render(
    payload: &ReportPayload,
    projection: &TabularProjection,
) -> Result<RenderedReport, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(HEADER_FILL)
        .set_border(FormatBorder::Thin);
    let data_format = Format::new().set_border(FormatBorder::Thin);

    // Report preamble: title, generation time, total match count.
    sheet.write_string_with_format(0, 0, "Provider Details Report", &title_format)?;
    sheet.write_string(2, 0, "Generated Date:")?;
    sheet.write_string(
        2,
        1,
        payload
            .header
            .generated_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )?;
    sheet.write_string(3, 0, "Total Records:")?;
    sheet.write_number(3, 1, payload.total as f64)?;

    // Column headers.
    let header_row: u32 = 5;
    for (col, name) in projection.header_row.iter().enumerate() {
        sheet.write_string_with_format(header_row, col as u16, name.as_str(), &header_format)?;
    }

    // Data rows.
    for (i, cells) in projection.data_rows.iter().enumerate() {
        let row = header_row + 1 + i as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Number(n) => {
                    sheet.write_number_with_format(row, col, *n, &data_format)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string_with_format(row, col, s.as_str(), &data_format)?;
                }
                CellValue::Empty => {
                    sheet.write_string_with_format(row, col, "", &data_format)?;
                }
            }
        }
    }

    for col in 0..projection.header_row.len() {
        sheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    let bytes = workbook.save_to_buffer()?;
    let file_name = format!(
        "provider_report_{}.xlsx",
        payload.header.generated_at.format("%Y%m%d_%H%M%S")
    );

    Ok(RenderedReport {
        bytes,
        file_name,
        content_type: CONTENT_TYPE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::mapper::project;
    use crate::fields;
    use crate::models::{ProviderDraft, ProviderFilter};
    use crate::providers;
    use crate::report::{generate, ReportRequest};

    fn rendered_fixture() -> RenderedReport {
        let conn = crate::db::open_memory_database().unwrap();
        let draft = ProviderDraft {
            name_local: "โรงพยาบาลกรุงเทพ".to_string(),
            name_en: Some("Bangkok Hospital".to_string()),
            provider_type: "Hospital".to_string(),
            province: "Bangkok".to_string(),
            is_tpa_network: true,
            ..Default::default()
        };
        providers::create(&conn, "P-1", &draft, "tests").unwrap();

        let payload = generate(
            &conn,
            &ReportRequest {
                search_params: ProviderFilter::default(),
                format_type: "excel".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        let resolved = fields::list_active(&conn).unwrap();
        let projection = project(&payload, &resolved);
        render(&payload, &projection).unwrap()
    }

    #[test]
    fn output_is_a_zip_container() {
        let rendered = rendered_fixture();
        // xlsx is a zip archive: PK magic
        assert_eq!(&rendered.bytes[..2], b"PK");
        assert!(rendered.bytes.len() > 500);
    }

    #[test]
    fn file_name_follows_timestamp_pattern() {
        let rendered = rendered_fixture();
        let re = regex::Regex::new(r"^provider_report_\d{8}_\d{6}\.xlsx$").unwrap();
        assert!(
            re.is_match(&rendered.file_name),
            "unexpected file name {}",
            rendered.file_name
        );
    }

    #[test]
    fn content_type_is_xlsx() {
        let rendered = rendered_fixture();
        assert_eq!(
            rendered.content_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn empty_result_set_still_renders() {
        let conn = crate::db::open_memory_database().unwrap();
        let payload = generate(&conn, &ReportRequest::default()).unwrap();
        let resolved = fields::list_active(&conn).unwrap();
        let projection = project(&payload, &resolved);

        let rendered = render(&payload, &projection).unwrap();
        assert!(rendered.bytes.starts_with(b"PK"));
    }
}
