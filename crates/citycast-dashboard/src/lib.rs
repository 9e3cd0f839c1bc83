//! Weather dashboard state and sequencing.
//!
//! [`WeatherViewController`] turns city selections, retries and timer ticks
//! into fetch cycles against a [`citycast_weather::WeatherClient`] and keeps a
//! [`ViewState`] that presentation code renders.

pub mod controller;
pub mod render;
pub mod view_state;

pub use controller::{CycleOutcome, FetchCycle, WeatherViewController, DEFAULT_REFRESH_INTERVAL};
pub use render::render;
pub use view_state::{ActiveView, ViewError, ViewState};
