use loopscore_core::format::OutputFormat;

/// Parse output format from string
pub fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse a 0-100 score
pub fn parse_score(s: &str) -> std::result::Result<f64, String> {
    let score: f64 = s
        .parse()
        .map_err(|_| format!("invalid score: {s} (expected a number)"))?;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(format!("invalid score: {s} (expected 0-100)"));
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_bounds() {
        assert_eq!(parse_score("88.5"), Ok(88.5));
        assert_eq!(parse_score("0"), Ok(0.0));
        assert!(parse_score("100.1").is_err());
        assert!(parse_score("-1").is_err());
        assert!(parse_score("NaN").is_err());
        assert!(parse_score("high").is_err());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("json"), Ok(OutputFormat::Json));
        assert!(parse_output_format("records").is_err());
    }
}
