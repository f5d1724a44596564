use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{
    MachineType, AIR_TEMPERATURE_BOUNDS, PROCESS_TEMPERATURE_BOUNDS, ROTATIONAL_SPEED_BOUNDS,
    TOOL_WEAR_BOUNDS, TORQUE_BOUNDS,
};
use crate::predict::Outcome;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar – menu, tabs, record counts, status
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_dataset_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (tab, title) in [
            (Tab::Prediction, "🔮 Prediction"),
            (Tab::Exploration, "🔍 Data Exploration"),
            (Tab::About, "ℹ About"),
        ] {
            ui.selectable_value(&mut state.active_tab, tab, title);
        }

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} matching filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – prediction inputs or exploration filters, per tab
// ---------------------------------------------------------------------------

/// Render the left input panel for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(120.0)
                .rounding(4.0),
        );
    });
    ui.add_space(4.0);

    match state.active_tab {
        Tab::Prediction => prediction_inputs(ui, state),
        Tab::Exploration => exploration_filters(ui, state),
        Tab::About => {
            ui.heading("Failsight");
            ui.label("Machine predictive-maintenance dashboard.");
        }
    }
}

/// Bounded input widgets for one prediction, plus the trigger button.
fn prediction_inputs(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Input Features");
    ui.separator();

    machine_type_selector(ui, "predict_type", &mut state.inputs.machine_type);

    ui.add(
        egui::Slider::new(&mut state.inputs.air_temperature, AIR_TEMPERATURE_BOUNDS)
            .step_by(0.1)
            .text("Air Temperature [K]"),
    );
    ui.add(
        egui::Slider::new(
            &mut state.inputs.process_temperature,
            PROCESS_TEMPERATURE_BOUNDS,
        )
        .step_by(0.1)
        .text("Process Temperature [K]"),
    );
    ui.add(
        egui::Slider::new(&mut state.inputs.rotational_speed, ROTATIONAL_SPEED_BOUNDS)
            .step_by(1.0)
            .fixed_decimals(0)
            .text("Rotational Speed [rpm]"),
    );
    ui.add(
        egui::Slider::new(&mut state.inputs.torque, TORQUE_BOUNDS)
            .step_by(0.01)
            .text("Torque [Nm]"),
    );
    ui.add(
        egui::Slider::new(&mut state.inputs.tool_wear, TOOL_WEAR_BOUNDS)
            .step_by(1.0)
            .fixed_decimals(0)
            .text("Tool Wear [min]"),
    );

    ui.add_space(8.0);
    if ui.button("Predict Failure").clicked() {
        state.run_prediction();
    }

    if let Some(outcome) = state.last_outcome {
        ui.add_space(4.0);
        let (text, color) = match outcome {
            Outcome::Failure => ("Prediction: Failure", Color32::RED),
            Outcome::NoFailure => ("Prediction: No Failure", Color32::DARK_GREEN),
        };
        ui.label(RichText::new(text).strong().color(color));
    }
}

/// Machine-type equality plus one inclusive range widget per sensor.
fn exploration_filters(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            machine_type_selector(ui, "filter_type", &mut state.criteria.machine_type);
            ui.separator();

            range_filter(
                ui,
                "Air Temperature [K]",
                &mut state.criteria.air_temperature,
                AIR_TEMPERATURE_BOUNDS,
                0.1,
            );
            range_filter(
                ui,
                "Process Temperature [K]",
                &mut state.criteria.process_temperature,
                PROCESS_TEMPERATURE_BOUNDS,
                0.1,
            );
            range_filter(
                ui,
                "Rotational Speed [rpm]",
                &mut state.criteria.rotational_speed,
                ROTATIONAL_SPEED_BOUNDS,
                1.0,
            );
            range_filter(
                ui,
                "Torque [Nm]",
                &mut state.criteria.torque,
                TORQUE_BOUNDS,
                0.1,
            );
            range_filter(
                ui,
                "Tool Wear [min]",
                &mut state.criteria.tool_wear,
                TOOL_WEAR_BOUNDS,
                1.0,
            );

            ui.add_space(8.0);
            if ui.button("Reset ranges").clicked() {
                let machine_type = state.criteria.machine_type;
                state.criteria = crate::data::filter::FilterCriteria::full_domain(machine_type);
            }
        });

    // Recompute the view after any widget change.
    state.refilter();
}

fn machine_type_selector(ui: &mut Ui, id: &str, selected: &mut MachineType) {
    ui.strong("Machine Type");
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for mt in MachineType::ALL {
                ui.selectable_value(selected, mt, mt.label());
            }
        });
}

/// Two drag values editing an inclusive range, clamped to the sensor's
/// domain and kept ordered.
fn range_filter(
    ui: &mut Ui,
    label: &str,
    range: &mut RangeInclusive<f64>,
    bounds: RangeInclusive<f64>,
    speed: f64,
) {
    let mut lo = *range.start();
    let mut hi = *range.end();

    ui.strong(label);
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::DragValue::new(&mut lo)
                .range(bounds.clone())
                .speed(speed),
        );
        ui.label("to");
        ui.add(egui::DragValue::new(&mut hi).range(bounds).speed(speed));
    });

    if hi < lo {
        hi = lo;
    }
    *range = lo..=hi;
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_dataset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open maintenance dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} observations with failure types {:?}",
                    dataset.len(),
                    dataset.failure_types
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
