use std::collections::HashMap;
use std::sync::OnceLock;

static STATE_FIPS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Returns the canonical upper-case code when `region` is a US state (or DC).
pub fn us_state_code(region: &str) -> Option<&'static str> {
    let normalized = region.trim().to_ascii_uppercase();
    state_fips_map()
        .get_key_value(normalized.as_str())
        .map(|(code, _)| *code)
}

/// Two-digit census FIPS code for a recognized state code.
pub fn state_fips(region: &str) -> Option<&'static str> {
    let code = us_state_code(region)?;
    state_fips_map().get(code).copied()
}

fn state_fips_map() -> &'static HashMap<&'static str, &'static str> {
    STATE_FIPS.get_or_init(|| {
        const CODE_TO_FIPS: &[(&str, &str)] = &[
            ("AL", "01"),
            ("AK", "02"),
            ("AZ", "04"),
            ("AR", "05"),
            ("CA", "06"),
            ("CO", "08"),
            ("CT", "09"),
            ("DE", "10"),
            ("DC", "11"),
            ("FL", "12"),
            ("GA", "13"),
            ("HI", "15"),
            ("ID", "16"),
            ("IL", "17"),
            ("IN", "18"),
            ("IA", "19"),
            ("KS", "20"),
            ("KY", "21"),
            ("LA", "22"),
            ("ME", "23"),
            ("MD", "24"),
            ("MA", "25"),
            ("MI", "26"),
            ("MN", "27"),
            ("MS", "28"),
            ("MO", "29"),
            ("MT", "30"),
            ("NE", "31"),
            ("NV", "32"),
            ("NH", "33"),
            ("NJ", "34"),
            ("NM", "35"),
            ("NY", "36"),
            ("NC", "37"),
            ("ND", "38"),
            ("OH", "39"),
            ("OK", "40"),
            ("OR", "41"),
            ("PA", "42"),
            ("RI", "44"),
            ("SC", "45"),
            ("SD", "46"),
            ("TN", "47"),
            ("TX", "48"),
            ("UT", "49"),
            ("VT", "50"),
            ("VA", "51"),
            ("WA", "53"),
            ("WV", "54"),
            ("WI", "55"),
            ("WY", "56"),
        ];

        CODE_TO_FIPS.iter().copied().collect()
    })
}
