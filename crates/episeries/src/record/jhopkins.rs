//! Row processor for the Johns Hopkins daily reports.
//!
//! The report format changed several times and the relation between
//! country and province columns is inconsistent across versions: some
//! overseas territories appear as countries, early US and Canada rows put
//! `County, ST` in the province column. Names are normalized here so every
//! version feeds the same nodes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::processor::RowProcessor;
use super::{MAIN_TERRITORY, OTHER_REGION, Origin};
use crate::input::RawRow;
use crate::schema::Field;

// =============================================================================
// STATE AND PROVINCE ABBREVIATIONS
// =============================================================================

static STATE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("AL", "Alabama"),
        ("AK", "Alaska"),
        ("AZ", "Arizona"),
        ("AR", "Arkansas"),
        ("CA", "California"),
        ("CO", "Colorado"),
        ("CT", "Connecticut"),
        ("DE", "Delaware"),
        ("DC", "District of Columbia"),
        ("D.C.", "District of Columbia"),
        ("FL", "Florida"),
        ("GA", "Georgia"),
        ("HI", "Hawaii"),
        ("ID", "Idaho"),
        ("IL", "Illinois"),
        ("IN", "Indiana"),
        ("IA", "Iowa"),
        ("KS", "Kansas"),
        ("KY", "Kentucky"),
        ("LA", "Louisiana"),
        ("ME", "Maine"),
        ("MD", "Maryland"),
        ("MA", "Massachusetts"),
        ("MI", "Michigan"),
        ("MN", "Minnesota"),
        ("MS", "Mississippi"),
        ("MO", "Missouri"),
        ("MT", "Montana"),
        ("NE", "Nebraska"),
        ("NV", "Nevada"),
        ("NH", "New Hampshire"),
        ("NJ", "New Jersey"),
        ("NM", "New Mexico"),
        ("NY", "New York"),
        ("NC", "North Carolina"),
        ("ND", "North Dakota"),
        ("OH", "Ohio"),
        ("OK", "Oklahoma"),
        ("OR", "Oregon"),
        ("PA", "Pennsylvania"),
        ("RI", "Rhode Island"),
        ("SC", "South Carolina"),
        ("SD", "South Dakota"),
        ("TN", "Tennessee"),
        ("TX", "Texas"),
        ("UT", "Utah"),
        ("VT", "Vermont"),
        ("VA", "Virginia"),
        ("WA", "Washington"),
        ("WV", "West Virginia"),
        ("WI", "Wisconsin"),
        ("WY", "Wyoming"),
        ("PR", "Puerto Rico"),
        ("GU", "Guam"),
        ("VI", "Virgin Islands"),
        // Canada
        ("AB", "Alberta"),
        ("BC", "British Columbia"),
        ("MB", "Manitoba"),
        ("NB", "New Brunswick"),
        ("NL", "Newfoundland and Labrador"),
        ("NS", "Nova Scotia"),
        ("NT", "Northwest Territories"),
        ("NU", "Nunavut"),
        ("ON", "Ontario"),
        ("PE", "Prince Edward Island"),
        ("QC", "Quebec"),
        ("SK", "Saskatchewan"),
        ("YT", "Yukon"),
    ]
    .into_iter()
    .collect()
});

/// Full name of a US state or Canadian province abbreviation.
pub fn state_full_name(abbreviation: &str) -> Option<&'static str> {
    STATE_NAMES.get(abbreviation).copied()
}

/// Split `County, ST` into its county and state parts.
fn split_county_state(province: &str) -> Option<(&str, &str)> {
    let mut parts = province.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(county), Some(state), None) => Some((county.trim(), state.trim())),
        _ => None,
    }
}

/// State part of a US or Canadian province cell, with abbreviations expanded.
fn state_name(province: &str) -> String {
    match split_county_state(province) {
        Some((_, state)) if state.len() == 2 || state == "D.C." => state_full_name(state)
            .map(str::to_string)
            .unwrap_or_else(|| state.to_string()),
        Some((_, state)) => state.to_string(),
        None => province.to_string(),
    }
}

// =============================================================================
// PROCESSOR
// =============================================================================

/// Processor for every Johns Hopkins schema version.
#[derive(Debug, Default, Clone, Copy)]
pub struct JHopkinsRowProcessor;

impl JHopkinsRowProcessor {
    pub fn new() -> Self {
        Self
    }

    fn names(row: &RawRow) -> (&str, &str) {
        (
            row.get(Field::CountryRegion).trim(),
            row.get(Field::ProvinceState).trim(),
        )
    }
}

impl RowProcessor for JHopkinsRowProcessor {
    fn origin(&self) -> Origin {
        Origin::JHopkins
    }

    fn country(&self, row: &RawRow) -> String {
        let (country, province) = Self::names(row);

        if province.contains("Diamond Princess") || province.contains("Grand Princess") {
            return "Others".to_string();
        }

        let alias = match country {
            "Macau" | "Macao SAR" | "Hong Kong" | "Hong Kong SAR" | "Mainland China" => "China",

            "MS Zaandam" | "Diamond Princess" | "Cruise Ship" => "Others",

            "French Guiana" | "Martinique" | "Mayotte" | "Saint Barthelemy" | "Guadeloupe"
            | "Reunion" | "St. Martin" | "Saint Martin" => "France",

            "Gibraltar" | "Channel Islands" | "Guernsey" | "Jersey" | "Cayman Islands"
            | "North Ireland" | "United Kingdom" => "UK",

            "Curacao" | "Aruba" => "Netherlands",
            "Faroe Islands" | "Greenland" => "Denmark",
            "Guam" | "Puerto Rico" => "US",

            "Vatican City" => "Holy See",
            "Ivory Coast" => "Cote d'Ivoire",
            "Cape Verde" => "Cabo Verde",
            "Russian Federation" => "Russia",
            "Viet Nam" => "Vietnam",
            "Taiwan*" | "Taipei and environs" => "Taiwan",
            "Gambia, The" | "The Gambia" => "Gambia",
            "Republic of Korea" | "Korea, South" => "South Korea",
            "Iran (Islamic Republic of)" => "Iran",
            "Bahamas, The" | "The Bahamas" => "Bahamas",
            "Republic of the Congo" => "Congo (Brazzaville)",
            "Republic of Moldova" => "Moldova",
            "Republic of Ireland" => "Ireland",
            "Czech Republic" => "Czechia",
            "occupied Palestinian territory" | "Palestine" => "West Bank and Gaza",
            "Burma" => "Myanmar",
            "East Timor" => "Timor-Leste",

            _ if province == "Crimea Republic*" || province == "Sevastopol*" => "Russia",
            other => other,
        };

        alias.to_string()
    }

    fn region(&self, row: &RawRow) -> String {
        let (country, province) = Self::names(row);

        let region = match (province, country) {
            ("Unknown" | "unassigned", _) => OTHER_REGION,
            ("Taiwan" | "UK" | "US" | "None", _) => MAIN_TERRITORY,

            ("Falkland Islands (Islas Malvinas)", _) => "Falkland Islands (Malvinas)",
            ("Dadar Nagar Haveli", _) => "Dadra and Nagar Haveli and Daman and Diu",
            ("Bayern", _) => "Bavaria",
            ("Fench Guiana", _) => "French Guiana",

            (p, _) if p.contains("Grand Princess") => "Grand Princess",
            (p, _) if p.contains("Diamond Princess") => "Diamond Princess",

            // Territories reported as countries become regions of their country
            (_, "North Ireland") => "Northern Ireland",
            (_, "Saint Martin" | "St. Martin") => "Saint Martin",
            (_, "Guernsey" | "Jersey" | "Channel Islands") => "Channel Islands",
            (_, "Macao SAR" | "Macau") => "Macau",
            (_, "Hong Kong SAR" | "Hong Kong") => "Hong Kong",
            (
                _,
                t @ ("French Guiana" | "Martinique" | "Mayotte" | "Guam" | "MS Zaandam"
                | "Diamond Princess" | "Gibraltar" | "Saint Barthelemy" | "Guadeloupe"
                | "Curacao" | "Aruba" | "Cayman Islands" | "Reunion" | "Faroe Islands"
                | "Greenland" | "Puerto Rico"),
            ) => t,

            (p, c) if p.is_empty() || p == c => MAIN_TERRITORY,

            ("Crimea Republic*", _) => "Crimea Republic",
            ("Sevastopol*", _) => "Sevastopol",
            ("United States Virgin Islands" | "Virgin Islands, U.S.", _) => "Virgin Islands",

            (p, "US" | "Canada") => return state_name(p),

            (p, _) => p,
        };

        region.to_string()
    }
}
