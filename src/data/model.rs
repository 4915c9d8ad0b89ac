use std::collections::BTreeSet;
use std::fmt;

/// Label of the synthetic dropdown entry that selects every launch site.
pub const ALL_SITES: &str = "All Sites";

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table), validated at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Payload mass in kg.
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    /// Outcome flag: 1 = success, 0 = failure.
    pub class: u8,
}

impl LaunchRecord {
    pub fn is_success(&self) -> bool {
        self.class == 1
    }
}

// ---------------------------------------------------------------------------
// SiteSelection – value of the site dropdown
// ---------------------------------------------------------------------------

/// The dropdown value: either the synthetic "All Sites" entry or one site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(name) => name,
        }
    }

    /// Whether a record launched from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == site,
        }
    }
}

impl From<&str> for SiteSelection {
    fn from(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable table plus the metadata derived from it once at load.
///
/// Built once at startup and passed by reference to every updater.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    min_payload: f64,
    max_payload: f64,
    /// "All Sites" followed by the distinct sites in discovery order.
    site_list: Vec<SiteSelection>,
}

impl LaunchDataset {
    /// Compute payload bounds and the site list. Returns `None` for an empty
    /// table, which has no bounds.
    pub fn from_records(records: Vec<LaunchRecord>) -> Option<Self> {
        let first = records.first()?;
        let mut min_payload = first.payload_mass_kg;
        let mut max_payload = first.payload_mass_kg;

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut site_list = vec![SiteSelection::All];

        for rec in &records {
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
            if seen.insert(rec.launch_site.as_str()) {
                site_list.push(SiteSelection::Site(rec.launch_site.clone()));
            }
        }

        Some(LaunchDataset {
            records,
            min_payload,
            max_payload,
            site_list,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    pub fn site_list(&self) -> &[SiteSelection] {
        &self.site_list
    }

    /// Concrete sites only (the site list without the "All Sites" entry).
    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.site_list.iter().filter_map(|s| match s {
            SiteSelection::All => None,
            SiteSelection::Site(name) => Some(name.as_str()),
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
