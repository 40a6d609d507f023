use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::PlotKind;
use crate::data::cleaning::CleaningPolicy;
use crate::data::model::{CategoricalColumn, NumericColumn};
use crate::state::{Session, Status};

// ---------------------------------------------------------------------------
// Left side panel – cleaning and plot controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading("Controls");
    ui.separator();

    if session.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            cleaning_controls(ui, session);
            ui.separator();
            plot_controls(ui, session);
        });
}

fn cleaning_controls(ui: &mut Ui, session: &mut Session) {
    ui.strong("Data Cleaning");
    ui.label("Handle missing values by:");

    let mut selected = session.cleaning;
    for policy in CleaningPolicy::ALL {
        ui.radio_value(&mut selected, policy, policy.to_string());
        ui.indent(("cleaning_help", policy.to_string()), |ui: &mut Ui| {
            ui.weak(policy.description());
        });
    }
    if selected != session.cleaning {
        log::info!("Cleaning policy: {selected}");
        session.set_cleaning(selected);
    }

    if let Some(ds) = &session.dataset {
        if !ds.cleaned.skipped_columns.is_empty() {
            ui.label(
                RichText::new(format!(
                    "No values to average in: {}",
                    ds.cleaned.skipped_columns.join(", ")
                ))
                .color(Color32::YELLOW),
            );
        }
    }
}

fn plot_controls(ui: &mut Ui, session: &mut Session) {
    ui.strong("Visualisation");

    let Some(classes) = session.classes().cloned() else {
        return;
    };
    let available = PlotKind::available(&classes);
    if available.is_empty() {
        ui.label("No numeric columns to plot.");
        return;
    }

    let current = session
        .plot
        .kind
        .map(|k| k.to_string())
        .unwrap_or_default();
    egui::ComboBox::from_label("Plot type")
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for kind in &available {
                ui.selectable_value(&mut session.plot.kind, Some(*kind), kind.to_string());
            }
        });

    let plot = &mut session.plot;
    match plot.kind {
        Some(PlotKind::Histogram) => {
            numeric_picker(ui, "Numeric column", "hist_col", &mut plot.numeric, classes.numeric());
        }
        Some(PlotKind::Boxplot) | Some(PlotKind::Swarmplot) => {
            numeric_picker(ui, "Y axis (numeric)", "group_y", &mut plot.numeric, classes.numeric());
            categorical_picker(
                ui,
                "X axis (categorical)",
                "group_x",
                &mut plot.category,
                classes.categorical(),
                false,
            );
        }
        Some(PlotKind::Scatterplot) => {
            numeric_picker(ui, "X axis", "scatter_x", &mut plot.numeric, classes.numeric());
            numeric_picker(
                ui,
                "Y axis",
                "scatter_y",
                &mut plot.second_numeric,
                classes.numeric(),
            );
            categorical_picker(
                ui,
                "Colour by (optional)",
                "scatter_color",
                &mut plot.color,
                classes.categorical(),
                true,
            );
        }
        Some(PlotKind::CorrelationHeatmap) | None => {}
    }
}

fn numeric_picker(
    ui: &mut Ui,
    label: &str,
    id: &str,
    selected: &mut Option<NumericColumn>,
    options: &[NumericColumn],
) {
    let text = selected.as_ref().map(|c| c.name().to_string()).unwrap_or_default();
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                ui.selectable_value(selected, Some(col.clone()), col.name());
            }
        });
}

fn categorical_picker(
    ui: &mut Ui,
    label: &str,
    id: &str,
    selected: &mut Option<CategoricalColumn>,
    options: &[CategoricalColumn],
    optional: bool,
) {
    let text = selected
        .as_ref()
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| "None".to_string());
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            if optional {
                ui.selectable_value(selected, None, "None");
            }
            for col in options {
                ui.selectable_value(selected, Some(col.clone()), col.name());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut Session) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(session);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &session.dataset {
            let (rows, cols) = ds.schema.shape;
            ui.label(format!("{}  ({rows} rows × {cols} columns)", ds.source_name));
            ui.separator();
        }

        match &session.status {
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        session.open_path(&path);
    }
}
