//! Plain-text rendering of the active view branch.

use citycast_weather::WeatherSnapshot;

use crate::view_state::{ActiveView, ViewState};

/// Render whichever branch of `state` is active. Empty state renders as an
/// empty string.
pub fn render(state: &ViewState) -> String {
    match state.active() {
        ActiveView::Loading => format!("Loading weather for {}...", state.selected_city.label()),
        ActiveView::Error(error) => format!("{}\nPress r to retry.", error.message),
        ActiveView::Data(snapshot) => render_card(state, snapshot),
        ActiveView::Empty => String::new(),
    }
}

fn render_card(state: &ViewState, snapshot: &WeatherSnapshot) -> String {
    let info = snapshot.current.code().info();
    let mut out = format!(
        "{}\n{} {}°C {}",
        state.selected_city.label(),
        info.icon,
        whole_degrees(snapshot.current.temperature_c),
        info.condition
    );

    if let (Some(high), Some(low)) = (snapshot.today_high(), snapshot.today_low()) {
        out.push_str(&format!(
            "\nH: {}°C L: {}°C",
            whole_degrees(high),
            whole_degrees(low)
        ));
    }

    out
}

/// Round half away from zero, without a "-0".
fn whole_degrees(celsius: f64) -> i64 {
    celsius.round() as i64
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::view_state::ViewError;
    use citycast_weather::{City, CurrentConditions, DailyRange, ErrorKind};

    fn snapshot(temperature_c: f64, weather_code: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                temperature_c,
                weather_code,
                observed_at: chrono::NaiveDate::from_ymd_opt(2026, 10, 15)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
            },
            daily: DailyRange {
                max_c: vec![23.6],
                min_c: vec![12.4],
                dates: vec![chrono::NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()],
            },
        }
    }

    #[test]
    fn test_empty_state_renders_nothing() {
        assert_eq!(render(&ViewState::new(City::Ottawa)), "");
    }

    #[test]
    fn test_loading_line() {
        let mut state = ViewState::new(City::Bogota);
        state.loading = true;
        assert_eq!(render(&state), "Loading weather for Bogota, Colombia...");
    }

    #[test]
    fn test_card() {
        let mut state = ViewState::new(City::Bogota);
        state.data = Some(snapshot(18.5, 2));
        assert_eq!(
            render(&state),
            "Bogota, Colombia\n⛅ 19°C Partly cloudy\nH: 24°C L: 12°C"
        );
    }

    #[test]
    fn test_unknown_code_and_missing_range() {
        let mut state = ViewState::new(City::Ottawa);
        let mut data = snapshot(-0.4, 42);
        data.daily = DailyRange::default();
        state.data = Some(data);
        assert_eq!(render(&state), "Ottawa, Canada\n❓ 0°C Unknown");
    }

    #[test]
    fn test_error_hides_stale_data() {
        let mut state = ViewState::new(City::Ottawa);
        state.data = Some(snapshot(5.0, 0));
        state.error = Some(ViewError {
            kind: ErrorKind::Transport,
            message: "Failed to fetch weather data for Ottawa. Network error.".into(),
        });

        let text = render(&state);
        assert!(text.starts_with("Failed to fetch weather data for Ottawa."));
        assert!(text.contains("retry"));
        assert!(!text.contains("Clear sky"));
    }
}
