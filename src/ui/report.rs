use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::data::model::format_float;
use crate::state::Status;
use crate::stats::profile::{ProfileReport, VariableDetails, VariableProfile};

use super::plot::correlation_heatmap;

// ---------------------------------------------------------------------------
// Profiling report panel
// ---------------------------------------------------------------------------

/// Render the report inline. Returns a status to show when the user copied
/// the report.
pub fn profile_report(ui: &mut Ui, report: &ProfileReport) -> Option<Status> {
    let mut status = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.heading(&report.title);
        if ui.small_button("Copy as JSON").clicked() {
            status = Some(match report.to_json() {
                Ok(json) => {
                    ui.ctx().copy_text(json);
                    Status::Info("Profile report copied to clipboard.".to_string())
                }
                Err(e) => Status::Error(format!("{e:#}")),
            });
        }
    });

    egui::CollapsingHeader::new(RichText::new("Overview").strong())
        .id_salt("profile_overview")
        .default_open(true)
        .show(ui, |ui: &mut Ui| overview(ui, report));

    egui::CollapsingHeader::new(RichText::new(format!("Alerts ({})", report.alerts.len())).strong())
        .id_salt("profile_alerts")
        .default_open(!report.alerts.is_empty())
        .show(ui, |ui: &mut Ui| {
            if report.alerts.is_empty() {
                ui.label("No alerts.");
            }
            for alert in &report.alerts {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(alert.kind.to_string())
                            .color(Color32::from_rgb(230, 160, 40)),
                    );
                    ui.label(&alert.message);
                });
            }
        });

    egui::CollapsingHeader::new(RichText::new("Variables").strong())
        .id_salt("profile_variables")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for var in &report.variables {
                egui::CollapsingHeader::new(format!("{}  ({})", var.name, var.dtype))
                    .id_salt(("profile_var", &var.name))
                    .show(ui, |ui: &mut Ui| variable(ui, var));
            }
        });

    egui::CollapsingHeader::new(RichText::new("Correlations").strong())
        .id_salt("profile_correlations")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if report.correlations.len() < 2 {
                ui.label("Fewer than two numeric variables.");
            } else {
                correlation_heatmap(ui, "profile_corr", &report.correlations);
            }
        });

    status
}

fn overview(ui: &mut Ui, report: &ProfileReport) {
    let o = &report.overview;
    egui::Grid::new("profile_overview_grid")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            let mut row = |label: &str, value: String| {
                ui.label(label);
                ui.monospace(value);
                ui.end_row();
            };
            row("Number of variables", o.n_variables.to_string());
            row("Number of observations", o.n_observations.to_string());
            row(
                "Missing cells",
                format!("{} ({:.1}%)", o.missing_cells, o.missing_cells_pct),
            );
            row(
                "Duplicate rows",
                format!("{} ({:.1}%)", o.duplicate_rows, o.duplicate_rows_pct),
            );
            row("Numeric variables", o.n_numeric.to_string());
            row("Categorical variables", o.n_categorical.to_string());
        });
}

fn variable(ui: &mut Ui, var: &VariableProfile) {
    egui::Grid::new(("profile_var_grid", &var.name))
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            let mut row = |label: &str, value: String| {
                ui.label(label);
                ui.monospace(value);
                ui.end_row();
            };
            row("Distinct", format!("{} ({:.1}%)", var.distinct, var.distinct_pct));
            row("Missing", format!("{} ({:.1}%)", var.missing, var.missing_pct));

            match &var.details {
                VariableDetails::Numeric(num) => {
                    let s = &num.summary;
                    row("Mean", format_float(s.mean));
                    row("Std", format_float(s.std));
                    row("Min", format_float(s.min));
                    row("25%", format_float(s.q25));
                    row("Median", format_float(s.q50));
                    row("75%", format_float(s.q75));
                    row("Max", format_float(s.max));
                    row("Zeros", num.zeros.to_string());
                    row("Negative", num.negative.to_string());
                    row("Skewness", format_float(num.skewness));
                }
                VariableDetails::Categorical(cat) => {
                    for (value, count) in &cat.top_values {
                        row(value.as_str(), count.to_string());
                    }
                }
            }
        });

    if let VariableDetails::Numeric(num) = &var.details {
        if let Some(hist) = &num.histogram {
            let bars: Vec<Bar> = hist
                .counts
                .iter()
                .enumerate()
                .map(|(i, &n)| Bar::new(hist.bin_center(i), n as f64).width(hist.width))
                .collect();
            ui.weak(format!("{} values in {} bins", hist.total(), hist.counts.len()));
            Plot::new(("profile_hist", &var.name))
                .height(140.0)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_zoom(false)
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
                });
        }
    }
}
