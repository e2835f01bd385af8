use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use log::debug;

use crate::core::error::{DrillError, Result};
use crate::core::model::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
    Xls,
}

impl TableFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(TableFormat::Csv),
            "xlsx" => Some(TableFormat::Xlsx),
            "xls" => Some(TableFormat::Xls),
            _ => None,
        }
    }
}

/// `name` is only used in error messages.
pub fn read_table(bytes: &[u8], format: TableFormat, name: &str) -> Result<Table> {
    let table = match format {
        TableFormat::Csv => read_csv(bytes, name)?,
        TableFormat::Xlsx => {
            let mut workbook =
                Xlsx::new(Cursor::new(bytes)).map_err(|err| DrillError::file_read(name, err))?;
            first_sheet(workbook.worksheet_range_at(0), name)?
        }
        TableFormat::Xls => {
            let mut workbook =
                Xls::new(Cursor::new(bytes)).map_err(|err| DrillError::file_read(name, err))?;
            first_sheet(workbook.worksheet_range_at(0), name)?
        }
    };

    if table.column_count() == 0 {
        return Err(DrillError::file_read(name, "the file has no columns"));
    }
    debug!(
        "{name}: read {} row(s) x {} column(s)",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn read_csv(bytes: &[u8], name: &str) -> Result<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| DrillError::file_read(name, format!("not UTF-8 text ({err})")))?;
    // a UTF-8 BOM would otherwise end up in the first header
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| DrillError::file_read(name, err))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| DrillError::file_read(name, err))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Picks the most frequent of `,` `;` and tab on the header line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

fn first_sheet<E: std::fmt::Display>(
    sheet: Option<std::result::Result<Range<Data>, E>>,
    name: &str,
) -> Result<Table> {
    let range = sheet
        .ok_or_else(|| DrillError::file_read(name, "the workbook has no sheets"))?
        .map_err(|err| DrillError::file_read(name, err))?;
    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows
        .next()
        .map(|cells| cells.into_iter().map(|c| c.trim().to_string()).collect())
        .unwrap_or_default();
    Table {
        headers,
        rows: rows.collect(),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        _ => cell.to_string(),
    }
}
