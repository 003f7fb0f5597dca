//! Sheets command implementation.

use saham_report::Report;
use saham_traits::SheetKind;

/// Print every report sheet with its header, in write order.
pub(crate) fn list_sheets() {
    let report = Report::build(&[]);

    for kind in SheetKind::WRITE_ORDER {
        let Some(sheet) = report.sheet(kind) else {
            continue;
        };
        println!("{} ({} columns)", sheet.title(), sheet.width());
        println!("{}", "-".repeat(60));
        for (i, column) in sheet.header.iter().enumerate() {
            println!("  {:>3}. {column}", i + 1);
        }
        println!();
    }
}
