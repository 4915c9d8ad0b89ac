use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::callbacks::{CallbackRegistry, InputId, InputValues, OutputId};
use crate::data::filter::PayloadRange;
use crate::data::model::{LaunchDataset, SiteSelection};
use crate::figure::Figure;
use crate::layout::Layout;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table, immutable for the life of the process.
    pub dataset: LaunchDataset,

    /// Static component tree.
    pub layout: Layout,

    callbacks: CallbackRegistry,

    /// Current control values.
    pub inputs: InputValues,

    /// Latest figure of every output.
    pub figures: BTreeMap<OutputId, Figure>,

    /// Text typed into the searchable dropdown.
    pub site_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the layout and subscription table, seed the controls with the
    /// layout defaults and render every output once.
    pub fn new(dataset: LaunchDataset) -> Self {
        let layout = Layout::build(&dataset);
        let inputs = InputValues {
            site: layout
                .dropdown()
                .map(|d| d.default.clone())
                .unwrap_or(SiteSelection::All),
            payload: layout
                .range_slider()
                .map(|s| s.default)
                .unwrap_or_else(|| PayloadRange::new(dataset.min_payload(), dataset.max_payload())),
        };
        let callbacks = CallbackRegistry::standard();
        for cb in callbacks.callbacks() {
            log::debug!("{} <- {:?}", cb.output, cb.inputs);
        }
        for output in layout.graphs() {
            if !callbacks.callbacks().iter().any(|cb| cb.output == output) {
                log::warn!("no callback renders {output}");
            }
        }
        let figures = callbacks.render_all(&dataset, &inputs).into_iter().collect();

        Self {
            dataset,
            layout,
            callbacks,
            inputs,
            figures,
            site_query: String::new(),
            status_message: None,
        }
    }

    /// Dropdown changed. Returns the outputs that were re-rendered.
    pub fn set_site(&mut self, site: SiteSelection) -> Vec<OutputId> {
        if self.inputs.site == site {
            return Vec::new();
        }
        self.inputs.site = site;
        self.on_input_change(InputId::SiteDropdown)
    }

    /// Slider moved. Returns the outputs that were re-rendered.
    pub fn set_payload_range(&mut self, range: PayloadRange) -> Vec<OutputId> {
        let range = match self.layout.range_slider() {
            Some(slider) => slider.constrain(range),
            None => range,
        };
        if self.inputs.payload == range {
            return Vec::new();
        }
        self.inputs.payload = range;
        self.on_input_change(InputId::PayloadSlider)
    }

    fn on_input_change(&mut self, changed: InputId) -> Vec<OutputId> {
        let updates = self.callbacks.dispatch(&self.dataset, &self.inputs, changed);
        let outputs = updates.iter().map(|(id, _)| *id).collect();
        self.figures.extend(updates);
        outputs
    }

    /// Write the current figures, keyed by output id, as pretty JSON.
    pub fn export_figures(&self, path: &Path) -> Result<()> {
        let by_name: BTreeMap<&str, &Figure> = self
            .figures
            .iter()
            .map(|(id, fig)| (id.as_str(), fig))
            .collect();
        let json = serde_json::to_string_pretty(&by_name).context("serialising figures")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{update_pie_chart, update_scatter_chart};
    use crate::data::model::tests::small_dataset;

    #[test]
    fn starts_with_layout_defaults_and_both_figures() {
        let state = AppState::new(small_dataset());
        assert_eq!(state.inputs.site, SiteSelection::All);
        assert_eq!(state.inputs.payload, PayloadRange::new(500.0, 2000.0));
        assert_eq!(state.figures.len(), 2);
        let scatter = state.figures.get(&OutputId::SuccessPayloadScatterChart).unwrap();
        assert_eq!(scatter.point_count(), 3);
    }

    #[test]
    fn site_change_rerenders_both_charts() {
        let mut state = AppState::new(small_dataset());
        let updated = state.set_site(SiteSelection::from("SiteB"));
        assert_eq!(
            updated,
            vec![OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart]
        );
        assert_eq!(
            state.figures.get(&OutputId::SuccessPieChart),
            Some(&update_pie_chart(&state.dataset, &SiteSelection::from("SiteB")))
        );
        assert_eq!(
            state.figures.get(&OutputId::SuccessPayloadScatterChart).unwrap().title,
            "Payload vs. Success for SiteB"
        );
    }

    #[test]
    fn slider_change_leaves_pie_untouched() {
        let mut state = AppState::new(small_dataset());
        let pie_before = state.figures.get(&OutputId::SuccessPieChart).cloned();

        let updated = state.set_payload_range(PayloadRange::new(0.0, 1000.0));
        assert_eq!(updated, vec![OutputId::SuccessPayloadScatterChart]);
        assert_eq!(state.figures.get(&OutputId::SuccessPieChart).cloned(), pie_before);

        let expected =
            update_scatter_chart(&state.dataset, &SiteSelection::All, PayloadRange::new(0.0, 1000.0));
        assert_eq!(state.figures.get(&OutputId::SuccessPayloadScatterChart), Some(&expected));
    }

    #[test]
    fn unchanged_values_dispatch_nothing() {
        let mut state = AppState::new(small_dataset());
        assert!(state.set_site(SiteSelection::All).is_empty());
        let current = state.inputs.payload;
        assert!(state.set_payload_range(current).is_empty());
    }

    #[test]
    fn slider_values_are_constrained() {
        let mut state = AppState::new(small_dataset());
        state.set_payload_range(PayloadRange::new(9000.0, 4000.0));
        assert_eq!(state.inputs.payload, PayloadRange::new(4000.0, 4000.0));
    }

    #[test]
    fn export_writes_figures_keyed_by_output() {
        let state = AppState::new(small_dataset());
        let path = std::env::temp_dir().join(format!(
            "launch-dash-{}-figures.json",
            std::process::id()
        ));
        state.export_figures(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let pie = &json["success-pie-chart"];
        assert_eq!(pie["data"]["kind"], "pie");
        assert_eq!(pie["title"], "Total Success Launches by Site");
        assert_eq!(pie["data"]["slices"].as_array().map(Vec::len), Some(2));
        let scatter = &json["success-payload-scatter-chart"];
        assert_eq!(scatter["data"]["kind"], "scatter");
        assert_eq!(scatter["data"]["x_label"], "Payload Mass (kg)");
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let state = AppState::new(small_dataset());
        let path = std::env::temp_dir()
            .join("launch-dash-no-such-dir")
            .join("figures.json");
        assert!(state.export_figures(&path).is_err());
    }
}
