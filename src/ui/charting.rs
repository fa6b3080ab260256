use typtea::time_series::WpmSeries;

/// X (seconds) and Y (WPM) bounds for the results chart.
pub fn compute_chart_params(series: &WpmSeries, duration_secs: f64) -> (f64, f64) {
    let overall_duration = series
        .samples()
        .last()
        .map_or(duration_secs, |s| s.secs)
        .max(1.0);

    (overall_duration, series.peak().round().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
