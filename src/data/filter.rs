use super::model::{LaunchDataset, LaunchRecord, SiteSelection};

// ---------------------------------------------------------------------------
// Payload range: value of the range slider
// ---------------------------------------------------------------------------

/// Inclusive payload mass interval `[low, high]` in kg.
///
/// Not normalised: an inverted range (`low > high`) simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, payload_kg: f64) -> bool {
        self.low <= payload_kg && payload_kg <= self.high
    }
}

// ---------------------------------------------------------------------------
// Record filters
// ---------------------------------------------------------------------------

/// Records launched from the selected site, in table order.
pub fn by_site<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |rec| site.matches(&rec.launch_site))
}

/// Records whose payload lies inside `range` and whose site passes `site`,
/// in table order.
pub fn by_site_and_payload<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
    range: PayloadRange,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |rec| range.contains(rec.payload_mass_kg))
        .filter(move |rec| site.matches(&rec.launch_site))
}
