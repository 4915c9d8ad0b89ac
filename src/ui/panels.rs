use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::PayloadRange;
use crate::data::model::SiteSelection;
use crate::layout::{Component, Dropdown, RangeSlider, TitleBlock};
use crate::state::AppState;
use crate::ui::plot;

/// A control change collected while the layout is borrowed for drawing.
enum ControlChange {
    Site(SiteSelection),
    Payload(PayloadRange),
}

// ---------------------------------------------------------------------------
// Central panel – the layout, top to bottom
// ---------------------------------------------------------------------------

/// Render every layout component, then feed control changes back through
/// the callback table.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let mut changes = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for component in &state.layout.components {
                match component {
                    Component::Title(title) => title_block(ui, title),
                    Component::Dropdown(dropdown) => {
                        if let Some(site) =
                            site_dropdown(ui, dropdown, &state.inputs.site, &mut state.site_query)
                        {
                            changes.push(ControlChange::Site(site));
                        }
                    }
                    Component::Break => ui.add_space(12.0),
                    Component::Paragraph(text) => {
                        ui.label(text.as_str());
                    }
                    Component::Graph(output) => {
                        plot::graph(ui, *output, state.figures.get(output));
                    }
                    Component::RangeSlider(slider) => {
                        if let Some(range) = payload_slider(ui, slider, state.inputs.payload) {
                            changes.push(ControlChange::Payload(range));
                        }
                    }
                }
            }
        });

    for change in changes {
        match change {
            ControlChange::Site(site) => state.set_site(site),
            ControlChange::Payload(range) => state.set_payload_range(range),
        };
    }
}

fn title_block(ui: &mut Ui, title: &TitleBlock) {
    let [r, g, b] = title.color;
    let text = RichText::new(title.text.as_str())
        .size(title.font_size)
        .color(Color32::from_rgb(r, g, b));
    if title.centered {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(text);
        });
    } else {
        ui.label(text);
    }
}

/// Single-select combo box; when searchable, a text box at the top of the
/// popup narrows the options.
fn site_dropdown(
    ui: &mut Ui,
    dropdown: &Dropdown,
    current: &SiteSelection,
    query: &mut String,
) -> Option<SiteSelection> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(dropdown.id.as_str())
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if dropdown.searchable {
                ui.add(
                    egui::TextEdit::singleline(query).hint_text(dropdown.placeholder.as_str()),
                );
                ui.separator();
            }
            let filter = if dropdown.searchable { query.as_str() } else { "" };
            let options = dropdown.matching_options(filter);
            if options.is_empty() {
                ui.label(RichText::new("No results found").italics());
            }
            for option in options {
                if ui
                    .selectable_label(option == current, option.label())
                    .clicked()
                {
                    picked = Some(option.clone());
                }
            }
        });

    if picked.is_some() {
        query.clear();
    }
    picked
}

/// Two linked handles plus the tick-mark row.
fn payload_slider(ui: &mut Ui, slider: &RangeSlider, current: PayloadRange) -> Option<PayloadRange> {
    let mut low = current.low;
    let mut high = current.high;
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(
                egui::Slider::new(&mut low, slider.min..=slider.max)
                    .step_by(slider.step)
                    .text("min"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut high, slider.min..=slider.max)
                    .step_by(slider.step)
                    .text("max"),
            )
            .changed();
    });

    ui.horizontal(|ui: &mut Ui| {
        let cell = ui.available_width() / slider.marks.len().max(1) as f32;
        for mark in &slider.marks {
            ui.add_sized(
                [cell, 14.0],
                egui::Label::new(RichText::new(mark.label.as_str()).small()),
            );
        }
    });

    changed.then(|| PayloadRange::new(low, high))
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export figures…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded from {} sites",
            state.dataset.len(),
            state.dataset.sites().count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg.as_str()).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export figures")
        .add_filter("JSON", &["json"])
        .set_file_name("figures.json")
        .save_file();

    if let Some(path) = file {
        match state.export_figures(&path) {
            Ok(()) => {
                log::info!("Exported figures to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export figures: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
