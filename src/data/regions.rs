// ---------------------------------------------------------------------------
// Reference set of region names
// ---------------------------------------------------------------------------

/// States and union territories of India, lower-cased for matching.
pub const REGION_NAMES: &[&str] = &[
    "andhra pradesh",
    "arunachal pradesh",
    "assam",
    "bihar",
    "chhattisgarh",
    "goa",
    "gujarat",
    "haryana",
    "himachal pradesh",
    "jharkhand",
    "karnataka",
    "kerala",
    "madhya pradesh",
    "maharashtra",
    "manipur",
    "meghalaya",
    "mizoram",
    "nagaland",
    "odisha",
    "punjab",
    "rajasthan",
    "sikkim",
    "tamil nadu",
    "telangana",
    "tripura",
    "uttar pradesh",
    "uttarakhand",
    "west bengal",
    "andaman and nicobar islands",
    "chandigarh",
    "dadra and nagar haveli and daman and diu",
    "delhi",
    "jammu and kashmir",
    "ladakh",
    "lakshadweep",
    "puducherry",
];

pub fn is_known_region(candidate: &str) -> bool {
    REGION_NAMES.contains(&candidate)
}

/// Find the first comma-separated part of `location` naming a known region
/// and return it in title case.
pub fn match_region(location: &str) -> Option<String> {
    location
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .find(|part| is_known_region(part))
        .map(|part| title_case(&part))
}

/// Capitalise the first letter of every whitespace-separated word and
/// lower-case the rest.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
