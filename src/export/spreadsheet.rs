use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{ExportFile, ReportData, summary::condition_distribution};

const ANALYSES_HEADER: [&str; 14] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Age",
    "Acne Score",
    "Blackheads Score",
    "Clear Skin Score",
    "Dark Spots Score",
    "Puffy Eyes Score",
    "Wrinkles Score",
    "Dominant Condition",
    "Recommended Products",
    "Created At",
];

const SUMMARY_HEADER: [&str; 3] = ["Condition", "Count", "Percentage"];

fn write_header(sheet: &mut Worksheet, header: &[&str], bold: &Format) -> anyhow::Result<()> {
    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, bold)?;
    }
    Ok(())
}

/// Workbook with an `Analyses` sheet (one row per log) and a `Summary` sheet.
pub fn render_xlsx(data: &ReportData, generated_at: DateTime<Utc>) -> anyhow::Result<ExportFile> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Analyses")?;
        write_header(sheet, &ANALYSES_HEADER, &bold)?;

        for (idx, log) in data.logs.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, log.id as f64)?;
            sheet.write_string(row, 1, log.user_name.as_str())?;
            sheet.write_string(row, 2, log.user_email.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 3, log.user_phone.as_deref().unwrap_or(""))?;
            sheet.write_number(row, 4, log.user_age as f64)?;
            for (offset, (_, score)) in log.scores().iter().enumerate() {
                sheet.write_number(row, 5 + offset as u16, score)?;
            }
            sheet.write_string(row, 11, log.dominant_condition.as_str())?;
            sheet.write_string(row, 12, log.recommended_product_ids.as_str())?;
            sheet.write_string(
                row,
                13,
                log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            )?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_header(sheet, &SUMMARY_HEADER, &bold)?;

        for (idx, entry) in condition_distribution(&data.logs).iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, entry.condition.as_str())?;
            sheet.write_number(row, 1, entry.count as f64)?;
            sheet.write_string(row, 2, format!("{:.2}%", entry.percentage))?;
        }
    }

    Ok(ExportFile {
        filename: format!("analysis-report-{}.xlsx", generated_at.timestamp_millis()),
        content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        bytes: workbook.save_to_buffer()?,
    })
}
