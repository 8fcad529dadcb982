use jiff::{SignedDuration, Span, SpanRelativeTo};

/// Accepts `30s`, `5m`, `1h 30m`, `PT1H30M` or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let input = input.trim();

    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
        .ok_or_else(|| format!("Invalid duration \"{input}\""))?;

    if duration.is_negative() {
        return Err(format!("Duration \"{input}\" must not be negative"));
    }

    Ok(duration)
}

/// Penalty weight in seconds of travel time.
pub fn parse_penalty(input: &str) -> Result<f64, String> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid penalty \"{input}\""))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("Penalty \"{input}\" must be finite and non-negative"));
    }

    Ok(value)
}
