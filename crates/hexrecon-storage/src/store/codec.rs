//! CSV codec for persisted label tables.
//!
//! Layout: header `Filename,Label,Count`, then one `<path>,<label>,<count>`
//! row per identity. Fields are quoted only when needed; quoted input
//! (as written by tools that quote every field) reads back the same.

use std::io::{Read, Write};
use std::path::Path;

use hexrecon_core::constants::TABLE_HEADER;
use hexrecon_core::{ImageId, Label, LabelRecord, StoreError};

use super::table::LabelTable;

/// Parse a whole table. Any malformed row fails the load; nothing partial
/// is returned.
pub(crate) fn read_table<R: Read>(reader: R, path: &Path) -> Result<LabelTable, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = csv_reader.records();

    let header = match rows.next() {
        Some(row) => row.map_err(|e| csv_error(path, &e))?,
        None => return Err(format_error(path, 1, "empty file, expected a header row")),
    };
    if !header.iter().eq(TABLE_HEADER.iter().copied()) {
        return Err(format_error(
            path,
            1,
            "label table column names must be \"Filename,Label,Count\"",
        ));
    }

    let mut table = LabelTable::default();
    for row in rows {
        let row = row.map_err(|e| csv_error(path, &e))?;
        let line = row.position().map_or(0, |p| p.line());
        if row.len() != TABLE_HEADER.len() {
            return Err(format_error(
                path,
                line,
                &format!("expected 3 fields, found {}", row.len()),
            ));
        }
        let label = Label::parse(&row[1]).map_err(|e| format_error(path, line, &e.to_string()))?;
        let count: u32 = row[2]
            .trim()
            .parse()
            .map_err(|e| format_error(path, line, &format!("bad count {:?}: {e}", &row[2])))?;
        table.force_set(ImageId::new(&row[0]), LabelRecord::new(label, count));
    }
    table.set_generation(0);
    Ok(table)
}

/// Write `rows` as a complete table.
pub(crate) fn write_table<W: Write>(
    writer: W,
    rows: &[(ImageId, LabelRecord)],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(TABLE_HEADER)?;
    for (id, record) in rows {
        let label = record.label.to_string();
        let count = record.count.to_string();
        csv_writer.write_record([id.as_str(), label.as_str(), count.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn format_error(path: &Path, line: u64, message: &str) -> StoreError {
    StoreError::Format {
        path: path.display().to_string(),
        line,
        message: message.to_string(),
    }
}

fn csv_error(path: &Path, err: &csv::Error) -> StoreError {
    let line = err.position().map_or(0, |p| p.line());
    format_error(path, line, &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<LabelTable, StoreError> {
        read_table(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn reads_plain_and_fully_quoted_tables() {
        let plain = parse("Filename,Label,Count\na/0_1.png,12AB,2\nb/0_2.png,0000,0\n").unwrap();
        let quoted =
            parse("\"Filename\",\"Label\",\"Count\"\n\"a/0_1.png\",\"12AB\",\"2\"\n\"b/0_2.png\",\"0000\",\"0\"\n")
                .unwrap();
        assert_eq!(plain.snapshot(), quoted.snapshot());
        assert_eq!(plain.len(), 2);
    }

    #[test]
    fn embedded_commas_survive_a_round_trip() {
        let rows = vec![(
            ImageId::new("dir,with,commas/0_1.png"),
            LabelRecord::new(Label::parse("BEEF").unwrap(), 3),
        )];
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Filename,Label,Count\n"));
        assert!(text.contains("\"dir,with,commas/0_1.png\",BEEF,3\n"));
        assert_eq!(parse(&text).unwrap().snapshot(), rows);
    }

    #[test]
    fn wrong_header_is_a_format_error() {
        let err = parse("File,Label,Count\na,12AB,2\n").unwrap_err();
        assert!(matches!(err, StoreError::Format { line: 1, .. }));
        assert!(matches!(parse(""), Err(StoreError::Format { .. })));
    }

    #[test]
    fn bad_rows_report_their_line() {
        let err = parse("Filename,Label,Count\na,12AB,2\nb,12AB\n").unwrap_err();
        assert!(matches!(err, StoreError::Format { line: 3, .. }));

        let err = parse("Filename,Label,Count\na,12AB,-1\n").unwrap_err();
        assert!(matches!(err, StoreError::Format { line: 2, .. }));

        let err = parse("Filename,Label,Count\na,12ABC,1\n").unwrap_err();
        assert!(matches!(err, StoreError::Format { line: 2, .. }));
    }
}
