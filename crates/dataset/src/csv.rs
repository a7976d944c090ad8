//! CSV export of the final table.
//!
//! Quoting follows the usual CSV rules: fields containing the separator, a
//! quote, or a line break are wrapped in double quotes with embedded quotes
//! doubled. Everything the pipeline produces is plain ASCII apart from
//! usernames and game names, which is exactly where the quoting matters.

use crate::error::Result;
use crate::types::DatasetRow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column order of the exported table
pub const HEADER: [&str; 11] = [
    "game_id",
    "position",
    "rating",
    "username",
    "name",
    "year_published",
    "weight",
    "owners",
    "average_rating",
    "year_registered",
    "last_login",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer
fn write_row<W: Write>(w: &mut W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

fn fields(row: &DatasetRow) -> Vec<String> {
    vec![
        row.game_id.to_string(),
        row.position.to_string(),
        row.rating.to_string(),
        row.username.clone(),
        row.name.clone(),
        row.year_published.to_string(),
        row.weight.to_string(),
        row.owners.to_string(),
        row.average_rating.to_string(),
        row.year_registered.to_string(),
        row.last_login.to_string(),
    ]
}

/// Write the full dataset to `path` with a header row, creating parent
/// directories if needed
pub fn write_dataset(path: &Path, rows: &[DatasetRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    let header: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
    write_row(&mut writer, &header)?;
    for row in rows {
        write_row(&mut writer, &fields(row))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, name: &str) -> DatasetRow {
        DatasetRow {
            game_id: 13,
            position: 205,
            rating: 7.5,
            username: username.to_string(),
            name: name.to_string(),
            year_published: 1995,
            weight: 2.33,
            owners: 120000,
            average_rating: 7.12,
            year_registered: 2008,
            last_login: 2018,
        }
    }

    #[test]
    fn test_plain_fields_are_unquoted() {
        let mut buf = Vec::new();
        write_row(&mut buf, &fields(&row("catan_fan", "Catan"))).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(
            line,
            "13,205,7.5,catan_fan,Catan,1995,2.33,120000,7.12,2008,2018\n"
        );
    }

    #[test]
    fn test_commas_and_quotes_are_escaped() {
        let mut buf = Vec::new();
        write_row(
            &mut buf,
            &fields(&row("a,b", "The \"Settlers\" of Catan")),
        )
        .unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.contains("\"a,b\""));
        assert!(line.contains("\"The \"\"Settlers\"\" of Catan\""));
    }

    #[test]
    fn test_header_matches_field_count() {
        assert_eq!(HEADER.len(), fields(&row("u", "n")).len());
    }
}
