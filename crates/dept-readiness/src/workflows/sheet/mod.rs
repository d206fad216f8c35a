//! Schema-free reading of spreadsheet CSV exports.
//!
//! Both upstream sheets are exported from a spreadsheet tool with banner rows,
//! merged headers and ragged rows, so nothing here assumes a header or a fixed
//! width. Column lookups go through [`cell`] which tolerates short rows.

mod normalizer;

pub(crate) use normalizer::{compact_key, fold_header};

/// Rows of raw cells, one per non-blank input line.
pub type RawGrid = Vec<Vec<String>>;

/// Splits `text` into rows of cells.
///
/// Lines are split on `\n` (with an optional trailing `\r`) before tokenising,
/// so a quoted field never spans lines. Blank lines are dropped. Quoted fields
/// may contain commas and `""` escapes. A quote in the middle of a field toggles
/// quoting for the rest of the line; unbalanced quotes never fail the parse.
pub fn parse_grid(text: &str) -> RawGrid {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    if has_stray_quote(line) {
        return toggle_split(line);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .double_quote(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        // A line that is not valid CSV still carries its text.
        Ok(false) | Err(_) => vec![line.to_string()],
    }
}

/// True when a quote sits somewhere other than the edges of a quoted field.
fn has_stray_quote(line: &str) -> bool {
    let mut chars = line.chars().peekable();
    let mut field_start = true;
    let mut quoted = false;

    while let Some(ch) = chars.next() {
        match (ch, quoted) {
            ('"', false) if field_start => quoted = true,
            ('"', false) => return true,
            ('"', true) => match chars.peek() {
                Some('"') => {
                    chars.next();
                }
                Some(',') | None => quoted = false,
                Some(_) => return true,
            },
            (',', false) => {
                field_start = true;
                continue;
            }
            _ => {}
        }
        field_start = false;
    }
    false
}

/// Quote-toggling split used for lines the CSV reader would shift.
fn toggle_split(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

/// Returns the cell at `index`, or `None` when the row is too short.
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}

/// Strips one pair of surrounding quotes and trims whitespace.
pub fn clean_cell(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_accepts_crlf() {
        let grid = parse_grid("a,b\r\n\r\n   \nc,d\n");
        assert_eq!(grid, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn row_count_matches_non_blank_lines() {
        let text = "header\n\nrow one\n\t\nrow two,\"x\"\nrow three";
        let non_blank = text.lines().filter(|line| !line.trim().is_empty()).count();
        assert_eq!(parse_grid(text).len(), non_blank);
    }

    #[test]
    fn unescapes_quoted_commas_and_quotes() {
        let grid = parse_grid("\"Task, \"\"Urgent\"\"\",Done");
        assert_eq!(grid, vec![vec!["Task, \"Urgent\"", "Done"]]);
    }

    #[test]
    fn keeps_empty_and_trailing_cells() {
        let grid = parse_grid("a,,c,");
        assert_eq!(grid, vec![vec!["a", "", "c", ""]]);
    }

    #[test]
    fn quote_never_spans_lines() {
        let grid = parse_grid("\"open quote,still open\nnext,row");
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1], vec!["next", "row"]);
    }

    #[test]
    fn mid_field_quote_toggles_quoting_for_the_rest_of_the_line() {
        let grid = parse_grid("Dept \"A, B\",x\nnext,row");
        assert_eq!(grid, vec![vec!["Dept A, B", "x"], vec!["next", "row"]]);
    }

    #[test]
    fn quote_after_closing_quote_keeps_later_columns_in_place() {
        let grid = parse_grid("\"Task\" \"one, two\",Done,2025-01-10");
        assert_eq!(grid, vec![vec!["Task one, two", "Done", "2025-01-10"]]);
    }

    #[test]
    fn well_formed_lines_are_not_flagged() {
        assert!(!has_stray_quote("a,\"b, c\",\"d \"\"e\"\"\",f"));
        assert!(!has_stray_quote(""));
        assert!(has_stray_quote("Dept \"A\""));
        assert!(has_stray_quote("\"A\"B,c"));
    }

    #[test]
    fn short_rows_are_bounds_checked() {
        let row = vec!["only".to_string()];
        assert_eq!(cell(&row, 0), Some("only"));
        assert_eq!(cell(&row, 23), None);
    }

    #[test]
    fn clean_cell_strips_quotes_and_whitespace() {
        assert_eq!(clean_cell(Some("\" Finance \"")), "Finance");
        assert_eq!(clean_cell(Some("  HR ")), "HR");
        assert_eq!(clean_cell(None), "");
    }
}
