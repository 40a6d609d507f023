use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{Session, Status};
use crate::ui::{panels, plot, report, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EdaApp {
    pub session: Session,
}

impl EdaApp {
    /// Load the first file dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(path) = &file.path {
            log::info!("Dropped {}", path.display());
            self.session.open_path(path);
        } else if let Some(bytes) = &file.bytes {
            log::info!("Dropped {} ({} bytes)", file.name, bytes.len());
            self.session.open_bytes(&file.name, bytes);
        }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: cleaning and plot controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: tables, report, chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| central_panel(ui, &mut self.session));
        });
    }
}

fn central_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading("EDA & Visualization App");

    let Some(ds) = &session.dataset else {
        ui.add_space(20.0);
        ui.label("Upload a CSV file to get started.");
        ui.weak("Use File → Open… or drop a .csv file onto the window.");
        return;
    };

    ui.separator();
    ui.strong("Dataset Preview");
    tables::preview_table(ui, &ds.raw, session.settings.preview_rows);

    ui.add_space(8.0);
    let (rows, cols) = ds.schema.shape;
    ui.label(format!("Shape: ({rows}, {cols})"));

    ui.add_space(8.0);
    ui.strong("Column Data Types");
    tables::dtypes_grid(ui, &ds.schema);

    ui.add_space(8.0);
    ui.strong("Missing Values");
    tables::missing_grid(ui, &ds.schema);

    ui.separator();
    ui.strong(format!("Data Cleaning: {}", ds.cleaned.policy));
    if let Some(ack) = ds.cleaned.policy.acknowledgment() {
        ui.label(RichText::new(ack).color(Color32::GREEN));
    }

    ui.separator();
    ui.strong("Descriptive Statistics");
    tables::describe_table(ui, &ds.cleaned.stats);

    ui.separator();
    let mut copied: Option<Status> = None;
    match &ds.cleaned.profile {
        Ok(profile) => copied = report::profile_report(ui, profile),
        Err(e) => {
            ui.label(RichText::new(format!("Profiling failed: {e}")).color(Color32::RED));
        }
    }

    ui.separator();
    ui.heading("Data Visualization");
    plot::chart_section(ui, session);

    if copied.is_some() {
        session.status = copied;
    }
}
