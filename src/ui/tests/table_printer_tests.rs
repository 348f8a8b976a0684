use crate::ui::table_printer::{Table, TablePrinter};

fn render(printer: &TablePrinter, table: &Table<'_>) -> String {
    let mut buf = Vec::new();
    printer.render_table(table, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn table_printer_renders_rows_under_banner() {
    let table = Table {
        title: "Blah",
        headers: &["ID", "NAME"],
        rows: vec![
            vec!["1".to_string(), "Alpha".to_string()],
            vec!["22".to_string(), "Beta".to_string()],
        ],
        ..Table::default()
    };
    let expected = "\
----------
BLAH
----------
ID | NAME
----------
1  | Alpha
22 | Beta
----------
";
    assert_eq!(render(&TablePrinter::new(), &table), expected);
}

#[test]
fn table_printer_computes_table_width() {
    let table = Table {
        headers: &["ID", "NAME"],
        rows: vec![vec!["1".into(), "Bob".into()], vec!["10".into(), "Alice".into()]],
        ..Table::default()
    };
    // 2 + 5 plus one separator of 3.
    assert_eq!(TablePrinter::new().table_width(&table), 10);
}

#[test]
fn table_printer_renders_empty_message() {
    let table = Table {
        title: "Bars",
        headers: &["TASK"],
        empty_message: Some("Nothing here."),
        ..Table::default()
    };
    assert_eq!(
        render(&TablePrinter::new(), &table),
        "-------------\nBARS\n-------------\nNothing here.\n-------------\n"
    );
}

#[test]
fn table_printer_renders_banner_and_indent() {
    let mut buf = Vec::new();
    TablePrinter::new()
        .with_left_pad(2)
        .render_banner("abc", 5, &mut buf)
        .unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "  -----\n  ABC\n  -----\n");
}
