use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::color;
use crate::data::model::{NumericColumn, SENSOR_COLUMNS};
use crate::data::stats;
use crate::predict::Outcome;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Prediction tab (central panel)
// ---------------------------------------------------------------------------

/// Operational parameters summary plus the session's prediction history.
pub fn prediction_view(ui: &mut Ui, state: &AppState) {
    ui.heading("Predictive Maintenance Prediction");
    ui.label(
        "Input the operational parameters of the machine in the side panel \
         and get a prediction on whether a failure might occur.",
    );
    ui.separator();

    ui.strong("Operational Parameters");
    egui::Grid::new("parameters_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            let inputs = &state.inputs;
            ui.label("Machine Type");
            ui.label(inputs.machine_type.label());
            ui.end_row();
            ui.label("Air Temperature [K]");
            ui.label(format!("{:.1}", inputs.air_temperature));
            ui.end_row();
            ui.label("Process Temperature [K]");
            ui.label(format!("{:.1}", inputs.process_temperature));
            ui.end_row();
            ui.label("Rotational Speed [rpm]");
            ui.label(format!("{:.0}", inputs.rotational_speed));
            ui.end_row();
            ui.label("Torque [Nm]");
            ui.label(format!("{:.2}", inputs.torque));
            ui.end_row();
            ui.label("Tool Wear [min]");
            ui.label(format!("{:.0}", inputs.tool_wear));
            ui.end_row();
        });

    ui.separator();
    ui.strong("Predictions History");

    if state.prediction_log.is_empty() {
        ui.label("No predictions yet this session.");
        return;
    }

    ui.push_id("history_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(70.0), 6)
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in [
                    "#",
                    "Machine Type",
                    "Air [K]",
                    "Process [K]",
                    "Speed [rpm]",
                    "Torque [Nm]",
                    "Wear [min]",
                    "Prediction",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (i, record) in state.prediction_log.iter().enumerate() {
                    body.row(18.0, |mut row| {
                        let req = &record.request;
                        row.col(|ui| {
                            ui.label(format!("{}", i + 1));
                        });
                        row.col(|ui| {
                            ui.label(req.machine_type.label());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", req.air_temperature));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", req.process_temperature));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.0}", req.rotational_speed));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", req.torque));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.0}", req.tool_wear));
                        });
                        row.col(|ui| {
                            let color = match record.outcome {
                                Outcome::Failure => Color32::RED,
                                Outcome::NoFailure => Color32::DARK_GREEN,
                            };
                            ui.label(RichText::new(record.outcome.label()).color(color));
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Exploration tab (central panel)
// ---------------------------------------------------------------------------

/// Filtered-data head, failure counts, correlation heatmap, per-sensor
/// distributions, and grouped means.
pub fn exploration_view(ui: &mut Ui, state: &AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Exploration");
            ui.label("Effect of the operating variables on machine failures.");
            ui.separator();

            if state.visible_indices.is_empty() {
                ui.label("No records match the current filters.");
                return;
            }

            data_head_table(ui, state);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                failure_bar_chart(&mut cols[0], state);
                correlation_heatmap(&mut cols[1], state);
            });
            ui.separator();

            ui.strong("Sensor distributions by failure type");
            for chunk in SENSOR_COLUMNS.chunks(3) {
                ui.columns(3, |cols: &mut [Ui]| {
                    for (i, column) in chunk.iter().enumerate() {
                        sensor_boxplot(&mut cols[i], state, *column);
                    }
                });
            }
            ui.separator();

            mean_features_table(ui, state);
        });
}

/// First rows of the filtered subset, like a dataframe head.
fn data_head_table(ui: &mut Ui, state: &AppState) {
    const HEAD: usize = 5;

    ui.strong(format!(
        "Filtered records ({} matching, first {} shown)",
        state.visible_indices.len(),
        state.visible_indices.len().min(HEAD)
    ));

    ui.push_id("data_head_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(60.0), 7)
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in [
                    "UDI", "Type", "Air [K]", "Process [K]", "Speed [rpm]", "Torque [Nm]",
                    "Wear [min]", "Target", "Failure Type",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for &idx in state.visible_indices.iter().take(HEAD) {
                    let obs = &state.dataset.observations[idx];
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(format!("{}", obs.udi));
                        });
                        row.col(|ui| {
                            ui.label(obs.machine_type.code());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", obs.air_temperature));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", obs.process_temperature));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.0}", obs.rotational_speed));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", obs.torque));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.0}", obs.tool_wear));
                        });
                        row.col(|ui| {
                            ui.label(if obs.target { "1" } else { "0" });
                        });
                        row.col(|ui| {
                            ui.label(obs.failure_type.label());
                        });
                    });
                }
            });
    });
}

/// Distribution of machine failures in the filtered subset.
fn failure_bar_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Distribution of Machine Failures");

    let counts = stats::failure_counts(&state.dataset, &state.visible_indices);
    if counts.is_empty() {
        ui.label("No failure records in the current selection.");
        return;
    }

    Plot::new("failure_bar_chart")
        .legend(Legend::default())
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            for (i, count) in counts.iter().enumerate() {
                let bar = Bar::new(i as f64, count.count as f64)
                    .width(0.6)
                    .fill(state.color_map.color_for(count.failure_type));
                plot_ui.bar_chart(
                    BarChart::new(vec![bar]).name(count.failure_type.label()),
                );
            }
        });
}

/// Pearson correlation across the numeric columns, painted as a grid.
fn correlation_heatmap(ui: &mut Ui, state: &AppState) {
    ui.strong("Correlation across variables");

    let matrix = stats::correlation_matrix(&state.dataset, &state.visible_indices);
    if matrix.is_empty() {
        ui.label("No records to correlate.");
        return;
    }

    let cell = Vec2::new(50.0, 20.0);
    egui::Grid::new("correlation_grid")
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in &matrix.columns {
                ui.small(col.short_label());
            }
            ui.end_row();

            for (i, row_col) in matrix.columns.iter().enumerate() {
                ui.small(row_col.short_label());
                for (j, col) in matrix.columns.iter().enumerate() {
                    let r = matrix.values[i][j];
                    let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                    ui.painter().rect_filled(
                        rect,
                        egui::CornerRadius::same(2),
                        color::correlation_color(r),
                    );
                    let text = if r.is_nan() {
                        "–".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        text,
                        FontId::proportional(10.0),
                        color::correlation_text_color(r),
                    );
                    response.on_hover_text(format!(
                        "{} × {}: {:.3}",
                        row_col.label(),
                        col.label(),
                        r
                    ));
                }
                ui.end_row();
            }
        });
}

/// Boxplot of one sensor column grouped by failure type, with the group
/// means marked in red.
fn sensor_boxplot(ui: &mut Ui, state: &AppState, column: NumericColumn) {
    ui.label(RichText::new(format!("{} vs. Failure", column.label())).strong());

    let groups = stats::sensor_distributions(&state.dataset, &state.visible_indices, column);
    if groups.is_empty() {
        ui.label("No data.");
        return;
    }

    let mut means: Vec<[f64; 2]> = Vec::new();

    Plot::new(format!("boxplot_{}", column.short_label()))
        .legend(Legend::default())
        .height(200.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            for (i, (failure_type, summary)) in groups.iter().enumerate() {
                let x = i as f64;
                let fill = state.color_map.color_for(*failure_type);
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        summary.min,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.max,
                    ),
                )
                .box_width(0.5)
                .fill(fill.gamma_multiply(0.4))
                .stroke(Stroke::new(1.0, fill));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(failure_type.label()));
                means.push([x, summary.mean]);
            }
            plot_ui.points(
                Points::new(means.clone())
                    .color(Color32::RED)
                    .radius(2.5)
                    .name("mean"),
            );
        });
}

/// Mean sensor values per failure type, excluding the no-failure group.
fn mean_features_table(ui: &mut Ui, state: &AppState) {
    ui.strong("Mean feature values per failure type");

    let rows = stats::mean_features(&state.dataset, &state.visible_indices);
    if rows.is_empty() {
        ui.label("No failure records in the current selection.");
        return;
    }

    ui.push_id("mean_features_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(160.0))
            .columns(Column::auto().at_least(80.0), 5)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Failure Type");
                });
                for column in SENSOR_COLUMNS {
                    header.col(|ui| {
                        ui.strong(column.label());
                    });
                }
            })
            .body(|mut body| {
                for row_data in &rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(row_data.failure_type.label());
                        });
                        for mean in row_data.means {
                            row.col(|ui| {
                                ui.label(format!("{mean:.2}"));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// About tab (central panel)
// ---------------------------------------------------------------------------

pub fn about_view(ui: &mut Ui) {
    ui.heading("About the Project");
    ui.add_space(4.0);
    ui.label(
        "Failsight simulates the predictive-maintenance software a factory \
         could use to anticipate machine failures. A pre-trained classifier \
         turns operating parameters into an instant failure prediction, and \
         the exploration tab lets you slice the historical maintenance \
         dataset to see how each variable relates to the observed failure \
         modes.",
    );
    ui.add_space(8.0);
    ui.label(
        "The historical data follows the AI4I 2020 predictive-maintenance \
         schema: machine quality variant, air and process temperature, \
         rotational speed, torque, tool wear, and the recorded failure type.",
    );
}
