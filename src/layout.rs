use crate::callbacks::{InputId, OutputId};
use crate::data::filter::PayloadRange;
use crate::data::model::{LaunchDataset, SiteSelection};

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";
pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10000.0;
pub const SLIDER_STEP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Static UI description
// ---------------------------------------------------------------------------

/// The dashboard's components, top to bottom. Built once from the dataset
/// metadata and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Title(TitleBlock),
    Dropdown(Dropdown),
    /// Vertical spacer.
    Break,
    Paragraph(String),
    Graph(OutputId),
    RangeSlider(RangeSlider),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleBlock {
    pub text: String,
    pub color: [u8; 3],
    pub font_size: f32,
    pub centered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub id: InputId,
    pub options: Vec<SiteSelection>,
    pub default: SiteSelection,
    pub placeholder: String,
    /// Typing filters the option list.
    pub searchable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSlider {
    pub id: InputId,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    pub default: PayloadRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

impl Layout {
    pub fn build(dataset: &LaunchDataset) -> Self {
        let marks = (0u32..)
            .map(|i| SLIDER_MIN + SLIDER_STEP * f64::from(i))
            .take_while(|v| *v <= SLIDER_MAX)
            .map(|value| SliderMark {
                value,
                label: format!("{value}"),
            })
            .collect();

        Layout {
            components: vec![
                Component::Title(TitleBlock {
                    text: DASHBOARD_TITLE.to_string(),
                    color: [0x50, 0x3D, 0x36],
                    font_size: 40.0,
                    centered: true,
                }),
                Component::Dropdown(Dropdown {
                    id: InputId::SiteDropdown,
                    options: dataset.site_list().to_vec(),
                    default: SiteSelection::All,
                    placeholder: "Select a Launch Site Here".to_string(),
                    searchable: true,
                }),
                Component::Break,
                Component::Graph(OutputId::SuccessPieChart),
                Component::Break,
                Component::Paragraph("Payload range (Kg):".to_string()),
                Component::RangeSlider(RangeSlider {
                    id: InputId::PayloadSlider,
                    min: SLIDER_MIN,
                    max: SLIDER_MAX,
                    step: SLIDER_STEP,
                    marks,
                    default: PayloadRange::new(dataset.min_payload(), dataset.max_payload()),
                }),
                Component::Graph(OutputId::SuccessPayloadScatterChart),
            ],
        }
    }

    pub fn dropdown(&self) -> Option<&Dropdown> {
        self.components.iter().find_map(|c| match c {
            Component::Dropdown(d) => Some(d),
            _ => None,
        })
    }

    pub fn range_slider(&self) -> Option<&RangeSlider> {
        self.components.iter().find_map(|c| match c {
            Component::RangeSlider(s) => Some(s),
            _ => None,
        })
    }

    /// Chart outputs in display order.
    pub fn graphs(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.components.iter().filter_map(|c| match c {
            Component::Graph(id) => Some(*id),
            _ => None,
        })
    }
}

impl Dropdown {
    /// Options whose label contains `query`, case-insensitively.
    pub fn matching_options<'a>(&'a self, query: &str) -> Vec<&'a SiteSelection> {
        let query = query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|opt| query.is_empty() || opt.label().to_lowercase().contains(&query))
            .collect()
    }
}

impl RangeSlider {
    /// Keep the selection inside the control bounds with `low <= high`.
    pub fn constrain(&self, range: PayloadRange) -> PayloadRange {
        let high = range.high.clamp(self.min, self.max);
        let low = range.low.clamp(self.min, high);
        PayloadRange::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::small_dataset;
    use crate::data::model::ALL_SITES;

    #[test]
    fn layout_has_controls_and_graphs_in_order() {
        let layout = Layout::build(&small_dataset());
        assert!(matches!(
            &layout.components[0],
            Component::Title(t) if t.text == DASHBOARD_TITLE && t.centered
        ));
        let graphs: Vec<OutputId> = layout.graphs().collect();
        assert_eq!(
            graphs,
            vec![OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart]
        );
    }

    #[test]
    fn dropdown_lists_all_sites_first_and_defaults_to_it() {
        let layout = Layout::build(&small_dataset());
        let dropdown = layout.dropdown().unwrap();
        let labels: Vec<&str> = dropdown.options.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec![ALL_SITES, "SiteA", "SiteB"]);
        assert_eq!(dropdown.default, SiteSelection::All);
        assert!(dropdown.searchable);
    }

    #[test]
    fn dropdown_search_is_case_insensitive() {
        let layout = Layout::build(&small_dataset());
        let dropdown = layout.dropdown().unwrap();
        let hits: Vec<&str> = dropdown
            .matching_options("siteb")
            .iter()
            .map(|o| o.label())
            .collect();
        assert_eq!(hits, vec!["SiteB"]);
        assert_eq!(dropdown.matching_options("  ").len(), 3);
    }

    #[test]
    fn slider_spans_fixed_bounds_with_marks_and_data_default() {
        let layout = Layout::build(&small_dataset());
        let slider = layout.range_slider().unwrap();
        assert_eq!((slider.min, slider.max, slider.step), (0.0, 10000.0, 1000.0));
        assert_eq!(slider.marks.len(), 11);
        assert_eq!(slider.marks[3].label, "3000");
        assert_eq!(slider.marks.last().unwrap().value, 10000.0);
        assert_eq!(slider.default, PayloadRange::new(500.0, 2000.0));
    }

    #[test]
    fn slider_constrain_orders_and_clamps() {
        let layout = Layout::build(&small_dataset());
        let slider = layout.range_slider().unwrap();
        assert_eq!(
            slider.constrain(PayloadRange::new(-50.0, 12000.0)),
            PayloadRange::new(0.0, 10000.0)
        );
        assert_eq!(
            slider.constrain(PayloadRange::new(7000.0, 3000.0)),
            PayloadRange::new(3000.0, 3000.0)
        );
    }
}
