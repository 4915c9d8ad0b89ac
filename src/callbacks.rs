use std::collections::BTreeMap;
use std::fmt;

use crate::data::filter::{self, PayloadRange};
use crate::data::model::{LaunchDataset, SiteSelection};
use crate::figure::{Figure, PieSlice, ScatterPoint, ScatterSeries};

// ---------------------------------------------------------------------------
// Component identifiers
// ---------------------------------------------------------------------------

/// Input controls whose value changes trigger callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputId {
    SiteDropdown,
    PayloadSlider,
}

impl InputId {
    pub fn as_str(self) -> &'static str {
        match self {
            InputId::SiteDropdown => "site-dropdown",
            InputId::PayloadSlider => "payload-slider",
        }
    }
}

/// Chart outputs whose figure a callback replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputId {
    SuccessPieChart,
    SuccessPayloadScatterChart,
}

impl OutputId {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of every input control.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValues {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

// ---------------------------------------------------------------------------
// Updaters
// ---------------------------------------------------------------------------

/// Pie chart for the selected site.
///
/// "All Sites" shows the mean success rate per site, ordered by site name.
/// A concrete site shows the count of each outcome class in order of first
/// appearance.
pub fn update_pie_chart(dataset: &LaunchDataset, site: &SiteSelection) -> Figure {
    match site {
        SiteSelection::All => {
            let mut groups: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
            for rec in dataset.records() {
                let (successes, total) = groups.entry(rec.launch_site.as_str()).or_default();
                *successes += u32::from(rec.is_success());
                *total += 1;
            }
            let slices = groups
                .into_iter()
                .map(|(name, (successes, total))| PieSlice {
                    label: name.to_string(),
                    value: f64::from(successes) / f64::from(total),
                })
                .collect();
            Figure::pie("Total Success Launches by Site", slices)
        }
        SiteSelection::Site(name) => {
            let mut counts: Vec<(u8, u32)> = Vec::new();
            for rec in filter::by_site(dataset, site) {
                match counts.iter_mut().find(|(class, _)| *class == rec.class) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((rec.class, 1)),
                }
            }
            let slices = counts
                .into_iter()
                .map(|(class, n)| PieSlice {
                    label: class.to_string(),
                    value: f64::from(n),
                })
                .collect();
            Figure::pie(format!("Total Success Launches for {name}"), slices)
        }
    }
}

/// Payload vs. outcome scatter for the selected site and payload range,
/// one series per booster version category in order of first appearance.
pub fn update_scatter_chart(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    payload: PayloadRange,
) -> Figure {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for rec in filter::by_site_and_payload(dataset, site, payload) {
        let point = ScatterPoint {
            x: rec.payload_mass_kg,
            y: f64::from(rec.class),
            launch_site: rec.launch_site.clone(),
        };
        match series
            .iter_mut()
            .find(|s| s.name == rec.booster_version_category)
        {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                name: rec.booster_version_category.clone(),
                points: vec![point],
            }),
        }
    }

    Figure::scatter(
        format!("Payload vs. Success for {site}"),
        "Payload Mass (kg)",
        "class",
        series,
    )
}

// ---------------------------------------------------------------------------
// Subscription table
// ---------------------------------------------------------------------------

pub type Handler = fn(&LaunchDataset, &InputValues) -> Figure;

/// One registered callback: the output it renders and the inputs it listens to.
pub struct Callback {
    pub output: OutputId,
    pub inputs: Vec<InputId>,
    handler: Handler,
}

impl Callback {
    pub fn invoke(&self, dataset: &LaunchDataset, values: &InputValues) -> Figure {
        (self.handler)(dataset, values)
    }
}

/// Output → (handler, inputs) table, built once at startup.
pub struct CallbackRegistry {
    callbacks: Vec<Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// The dashboard's two callbacks: the pie listens to the dropdown, the
    /// scatter to the dropdown and the slider.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(OutputId::SuccessPieChart, &[InputId::SiteDropdown], |ds, v| {
            update_pie_chart(ds, &v.site)
        });
        registry.register(
            OutputId::SuccessPayloadScatterChart,
            &[InputId::SiteDropdown, InputId::PayloadSlider],
            |ds, v| update_scatter_chart(ds, &v.site, v.payload),
        );
        registry
    }

    /// Register `handler` as the renderer of `output`, replacing any previous
    /// registration for that output.
    pub fn register(&mut self, output: OutputId, inputs: &[InputId], handler: Handler) {
        self.callbacks.retain(|cb| cb.output != output);
        self.callbacks.push(Callback {
            output,
            inputs: inputs.to_vec(),
            handler,
        });
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    /// Callbacks subscribed to `input`, in registration order.
    pub fn subscribers(&self, input: InputId) -> impl Iterator<Item = &Callback> {
        self.callbacks
            .iter()
            .filter(move |cb| cb.inputs.contains(&input))
    }

    /// Run every callback subscribed to `changed` with the current values.
    pub fn dispatch(
        &self,
        dataset: &LaunchDataset,
        values: &InputValues,
        changed: InputId,
    ) -> Vec<(OutputId, Figure)> {
        self.subscribers(changed)
            .map(|cb| {
                log::debug!("{changed} changed, updating {}", cb.output);
                (cb.output, cb.invoke(dataset, values))
            })
            .collect()
    }

    /// Initial render: every callback once.
    pub fn render_all(
        &self,
        dataset: &LaunchDataset,
        values: &InputValues,
    ) -> Vec<(OutputId, Figure)> {
        self.callbacks
            .iter()
            .map(|cb| (cb.output, cb.invoke(dataset, values)))
            .collect()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
