use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use meg_cli::run::RunSummary;
use meg_model::{ConversionResult, SubjectRecord};

pub fn print_summary(summary: &RunSummary) {
    println!("Search root: {}", summary.search_root.display());
    println!("BIDS root: {}", summary.bids_root.display());
    println!("Mapping: {}", summary.mapping_file.display());
    println!("Processing log: {}", summary.processing_log.display());

    let report = &summary.report;
    if report.results.is_empty() {
        println!(
            "No subjects to process ({} matching directories).",
            summary.discovered
        );
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Subject"),
        header_cell("BIDS"),
        header_cell("Sessions"),
        header_cell("Status"),
        header_cell("Outputs"),
        header_cell("Error"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);

    for (result, record) in report.results.iter().zip(&summary.subjects) {
        table.add_row(vec![
            Cell::new(&result.subject)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("sub-{}", result.number)),
            Cell::new(record.session_count()),
            status_cell(result),
            Cell::new(result.outputs.len()),
            error_cell(result.error()),
        ]);
    }
    let sessions: usize = summary.subjects.iter().map(SubjectRecord::session_count).sum();
    let outputs: usize = report.results.iter().map(|r| r.outputs.len()).sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(sessions).add_attribute(Attribute::Bold),
        count_cell(report.failure_count(), Color::Red).add_attribute(Attribute::Bold),
        Cell::new(outputs).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    let skipped = report.log.warning_count();
    if skipped > 0 {
        println!("Skipped directories: {skipped} (see processing log)");
    }
}

fn status_cell(result: &ConversionResult) -> Cell {
    if result.is_success() {
        Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn error_cell(error: Option<&str>) -> Cell {
    match error {
        Some(message) => Cell::new(message).fg(Color::Red),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
