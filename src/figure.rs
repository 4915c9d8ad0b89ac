use serde::Serialize;

// ---------------------------------------------------------------------------
// Chart specifications produced by the updaters
// ---------------------------------------------------------------------------

/// A renderer-independent chart: a title plus the data of one chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub data: FigureData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureData {
    Pie { slices: Vec<PieSlice> },
    Scatter {
        x_label: String,
        y_label: String,
        series: Vec<ScatterSeries>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// Points sharing one colour group (booster version category).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Hover field.
    pub launch_site: String,
}

impl Figure {
    pub fn pie(title: impl Into<String>, slices: Vec<PieSlice>) -> Self {
        Figure {
            title: title.into(),
            data: FigureData::Pie { slices },
        }
    }

    pub fn scatter(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        series: Vec<ScatterSeries>,
    ) -> Self {
        Figure {
            title: title.into(),
            data: FigureData::Scatter {
                x_label: x_label.into(),
                y_label: y_label.into(),
                series,
            },
        }
    }

    /// Slices of a pie figure; empty for other kinds.
    pub fn slices(&self) -> &[PieSlice] {
        match &self.data {
            FigureData::Pie { slices } => slices,
            FigureData::Scatter { .. } => &[],
        }
    }

    /// Series of a scatter figure; empty for other kinds.
    pub fn series(&self) -> &[ScatterSeries] {
        match &self.data {
            FigureData::Scatter { series, .. } => series,
            FigureData::Pie { .. } => &[],
        }
    }

    /// Total number of scatter points across all series.
    pub fn point_count(&self) -> usize {
        self.series().iter().map(|s| s.points.len()).sum()
    }
}
