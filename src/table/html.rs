//! HTML `<table>` extraction using the `scraper` crate.
//!
//! Parsers often deliver tables only as HTML (`text_as_html`). This turns
//! that markup into [`TableData`]: header from the last `<thead>` row, or
//! from a leading all-`<th>` row; body from the remaining `<tr>` rows; the
//! `<caption>`, if any, as the table title.
//! Rows of nested tables are ignored; their text stays in the outer cell.

use scraper::{ElementRef, Html, Selector};

use crate::element::TableData;

/// Upper bound on `colspan` to keep hostile markup from exploding row width.
const MAX_COLSPAN: usize = 64;

/// Extract the first top-level table in `html`. Returns an empty table when
/// the markup contains none.
pub fn table_from_html(html: &str) -> TableData {
    let fragment = Html::parse_fragment(html);
    let table_sel = Selector::parse("table").expect("static selector must parse");

    let table = fragment.select(&table_sel).next();
    match table {
        Some(table) => extract_table(table),
        None => {
            tracing::debug!("no <table> element in table markup");
            TableData::default()
        }
    }
}

/// Extract every top-level table in a document, in document order.
pub fn tables_in_html(html: &str) -> Vec<TableData> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("static selector must parse");

    document
        .select(&table_sel)
        .filter(|t| enclosing_table(*t).is_none())
        .map(extract_table)
        .collect()
}

fn extract_table(table: ElementRef<'_>) -> TableData {
    let tr_sel = Selector::parse("tr").expect("static selector must parse");

    let mut header_rows: Vec<Vec<String>> = Vec::new();
    let mut body: Vec<ElementRef<'_>> = Vec::new();

    for row in table
        .select(&tr_sel)
        .filter(|r| enclosing_table(*r).map(|t| t.id()) == Some(table.id()))
    {
        if parent_is(row, "thead") {
            header_rows.push(row_cells(row, true));
        } else {
            body.push(row);
        }
    }

    let mut header_row = header_rows.pop().unwrap_or_default();
    let mut body = body.as_slice();

    if header_row.is_empty() {
        if let Some((first, rest)) = body.split_first() {
            if is_header_row(*first) {
                header_row = row_cells(*first, true);
                body = rest;
            }
        }
    }

    let rows = body
        .iter()
        .map(|r| row_cells(*r, false))
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    let data = TableData::new(header_row, rows);
    match table_caption(table) {
        Some(caption) => data.with_caption(caption),
        None => data,
    }
}

/// Text of the table's own `<caption>`.
fn table_caption(table: ElementRef<'_>) -> Option<String> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|c| c.value().name() == "caption")
        .map(cell_text)
}

/// Nearest `<table>` ancestor of `el`.
fn enclosing_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

fn parent_is(el: ElementRef<'_>, name: &str) -> bool {
    el.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|p| p.value().name() == name)
}

fn cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
}

fn is_header_row(row: ElementRef<'_>) -> bool {
    let mut any = false;
    for cell in cells(row) {
        if cell.value().name() != "th" {
            return false;
        }
        any = true;
    }
    any
}

/// Cell texts of a row with `colspan` expanded. Header spans repeat the
/// label; body spans pad with empty cells.
fn row_cells(row: ElementRef<'_>, header: bool) -> Vec<String> {
    let mut out = Vec::new();
    for cell in cells(row) {
        let text = cell_text(cell);
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        for i in 0..span {
            if i == 0 || header {
                out.push(text.clone());
            } else {
                out.push(String::new());
            }
        }
    }
    out
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thead_and_tbody() {
        let html = r#"
        <table>
          <thead><tr><th>Year</th><th>Revenue</th></tr></thead>
          <tbody>
            <tr><td>2022</td><td>$1,000</td></tr>
            <tr><td>2023</td><td>$1,200</td></tr>
          </tbody>
        </table>"#;
        let data = table_from_html(html);
        assert_eq!(data.header_row, vec!["Year", "Revenue"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[1], vec!["2023", "$1,200"]);
    }

    #[test]
    fn leading_th_row_becomes_header() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>";
        let data = table_from_html(html);
        assert_eq!(data.header_row, vec!["A", "B"]);
        assert_eq!(data.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn no_header_leaves_header_empty() {
        let html = "<table><tr><td>x</td><td>1</td></tr><tr><td>y</td></tr></table>";
        let data = table_from_html(html);
        assert!(data.header_row.is_empty());
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[1], vec!["y"]);
    }

    #[test]
    fn colspan_expansion() {
        let html = r#"<table>
            <thead><tr><th colspan="2">Period</th><th>Total</th></tr></thead>
            <tr><td colspan="2">H1</td><td>5</td></tr>
        </table>"#;
        let data = table_from_html(html);
        assert_eq!(data.header_row, vec!["Period", "Period", "Total"]);
        assert_eq!(data.rows[0], vec!["H1", "", "5"]);
    }

    #[test]
    fn nested_table_rows_not_flattened() {
        let html = r#"<table>
            <tr><th>Outer</th></tr>
            <tr><td><table><tr><td>inner</td></tr></table></td></tr>
        </table>"#;
        let data = table_from_html(html);
        assert_eq!(data.header_row, vec!["Outer"]);
        assert_eq!(data.rows, vec![vec!["inner".to_string()]]);
    }

    #[test]
    fn whitespace_collapsed_and_empty_rows_skipped() {
        let html = "<table><tr><td>  a \n  b </td></tr><tr><td> </td></tr></table>";
        let data = table_from_html(html);
        assert_eq!(data.rows, vec![vec!["a b".to_string()]]);
    }

    #[test]
    fn caption_kept_as_title() {
        let html = r#"<table>
            <caption> Quarterly revenue
              by region </caption>
            <tr><th>Region</th><th>Revenue</th></tr>
            <tr><td>North</td><td>10</td></tr>
        </table>"#;
        let data = table_from_html(html);
        assert_eq!(data.caption.as_deref(), Some("Quarterly revenue by region"));
        assert_eq!(data.header_row, vec!["Region", "Revenue"]);
        assert_eq!(data.rows.len(), 1);
    }

    #[test]
    fn nested_caption_not_taken() {
        let html = r#"<table>
            <tr><td><table><caption>Inner</caption><tr><td>n</td></tr></table></td></tr>
        </table>"#;
        assert_eq!(table_from_html(html).caption, None);
    }

    #[test]
    fn missing_table_yields_empty() {
        assert_eq!(table_from_html("<p>no table</p>"), TableData::default());
    }

    #[test]
    fn all_tables_in_document() {
        let html = r#"<html><body>
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <p>between</p>
            <table><tr><th>B</th></tr><tr><td><table><tr><td>n</td></tr></table></td></tr></table>
        </body></html>"#;
        let tables = tables_in_html(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].header_row, vec!["A"]);
        assert_eq!(tables[1].header_row, vec!["B"]);
    }
}
