//! UI-facing summary of the loading/error/data status.

use citycast_weather::{City, ErrorKind, WeatherError, WeatherSnapshot};

/// A failed fetch, as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ViewError {
    /// Non-technical message naming the city; the error's details stay in the logs.
    pub fn from_weather_error(city: City, err: &WeatherError) -> Self {
        Self {
            kind: err.kind(),
            message: format!(
                "Failed to fetch weather data for {}. {}",
                city,
                err.user_message()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected_city: City,
    pub loading: bool,
    pub error: Option<ViewError>,
    /// Last successfully fetched snapshot. Survives failed refreshes.
    pub data: Option<WeatherSnapshot>,
}

/// The branch a renderer should act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveView<'a> {
    Loading,
    Error(&'a ViewError),
    Data(&'a WeatherSnapshot),
    Empty,
}

impl ViewState {
    pub fn new(selected_city: City) -> Self {
        Self {
            selected_city,
            loading: false,
            error: None,
            data: None,
        }
    }

    /// Resolve the active branch: loading > error > data > empty.
    pub fn active(&self) -> ActiveView<'_> {
        if self.loading {
            ActiveView::Loading
        } else if let Some(error) = &self.error {
            ActiveView::Error(error)
        } else if let Some(data) = &self.data {
            ActiveView::Data(data)
        } else {
            ActiveView::Empty
        }
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn finish_with_data(&mut self, snapshot: WeatherSnapshot) {
        self.data = Some(snapshot);
        self.loading = false;
    }

    pub(crate) fn finish_with_error(&mut self, error: ViewError) {
        self.error = Some(error);
        self.loading = false;
    }
}
