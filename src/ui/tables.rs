use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{format_float, DataTable};
use crate::data::schema::{head, SchemaSummary};
use crate::stats::describe::{DescribeTable, STAT_LABELS};

const ROW_HEIGHT: f32 = 18.0;

/// First `rows` rows of the table, with a leading index column.
pub fn preview_table(ui: &mut Ui, table: &DataTable, rows: usize) {
    let names = table.column_names();
    let rows = head(table, rows);

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(30.0))
            .columns(TableColumn::auto().at_least(60.0).resizable(true), names.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_ui| {});
                for name in &names {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for (idx, cells) in rows.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.weak(idx.to_string());
                        });
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

/// Column name, dtype and non-null count.
pub fn dtypes_grid(ui: &mut Ui, schema: &SchemaSummary) {
    let (rows, _) = schema.shape;
    egui::Grid::new("dtypes_grid")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui: &mut Ui| {
            for (name, dtype) in &schema.dtypes {
                ui.label(name);
                ui.monospace(dtype.to_string());
                ui.weak(format!("{} non-null", rows - schema.missing_count(name)));
                ui.end_row();
            }
        });
}

pub fn missing_grid(ui: &mut Ui, schema: &SchemaSummary) {
    if schema.missing_counts.is_empty() {
        ui.label("No missing values.");
        return;
    }
    egui::Grid::new("missing_grid")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (name, count) in &schema.missing_counts {
                ui.label(name);
                ui.monospace(count.to_string());
                ui.end_row();
            }
        });
}

/// Statistics as rows (count, mean, …) × numeric columns.
pub fn describe_table(ui: &mut Ui, stats: &DescribeTable) {
    if stats.is_empty() {
        ui.label("No numeric columns to describe.");
        return;
    }

    ui.push_id("describe_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(40.0))
            .columns(TableColumn::auto().at_least(70.0).resizable(true), stats.columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_ui| {});
                for summary in &stats.columns {
                    header.col(|ui| {
                        ui.strong(&summary.column);
                    });
                }
            })
            .body(|mut body| {
                for (stat_idx, label) in STAT_LABELS.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(*label);
                        });
                        for summary in &stats.columns {
                            row.col(|ui| {
                                ui.monospace(format_float(summary.values()[stat_idx]));
                            });
                        }
                    });
                }
            });
    });
}
