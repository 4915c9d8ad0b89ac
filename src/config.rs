//! Startup configuration: where the launch table lives and how the window
//! opens.

use std::env;
use std::path::PathBuf;

pub const DATA_PATH_ENV: &str = "LAUNCH_DASH_DATA";
pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

pub const WINDOW_TITLE: &str = "SpaceX Launch Records Dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct DashConfig {
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            window_size: [1100.0, 900.0],
            min_window_size: [600.0, 500.0],
        }
    }
}

impl DashConfig {
    /// First command-line argument, else `$LAUNCH_DASH_DATA`, else the
    /// default file name in the working directory.
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), env::var(DATA_PATH_ENV).ok())
    }

    fn resolve(arg: Option<String>, env_path: Option<String>) -> Self {
        let data_path = arg
            .or(env_path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        Self {
            data_path,
            ..Self::default()
        }
    }
}
