//! Writes a sample `indian_forts.json` for trying out the explorer.
//!
//! Usage: `generate_sample [OUTPUT]` (defaults to `indian_forts.json`).

use anyhow::{Context, Result};
use serde_json::{json, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// ISO-8601 timestamp somewhere in 2023 or 2024.
    fn timestamp(&mut self) -> String {
        format!(
            "{}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            2023 + self.below(2),
            1 + self.below(12),
            1 + self.below(28),
            self.below(24),
            self.below(60),
            self.below(60)
        )
    }
}

struct SampleFort {
    id: &'static str,
    name: &'static str,
    location: &'static str,
    fort_type: &'static str,
    founded: &'static str,
    condition: &'static str,
    coordinates: &'static str,
    image: Option<&'static str>,
}

const FORTS: &[SampleFort] = &[
    SampleFort {
        id: "Q1142073",
        name: "Amber Fort",
        location: "Amer, Jaipur district, Rajasthan",
        fort_type: "Hill fort",
        founded: "1592",
        condition: "Preserved",
        coordinates: "26°59′09″N 75°51′03″E",
        image: Some("https://commons.wikimedia.org/wiki/Special:FilePath/Amer_Fort_Jaipur.jpg?width=640"),
    },
    SampleFort {
        id: "Q2042880",
        name: "Chittorgarh Fort",
        location: "Chittorgarh, Rajasthan",
        fort_type: "Hill fort",
        founded: "7th century",
        condition: "Ruined in parts",
        coordinates: "24°53′13″N 74°38′50″E",
        image: None,
    },
    SampleFort {
        id: "Q1364049",
        name: "Golconda Fort",
        location: "Hyderabad, Telangana",
        fort_type: "Citadel",
        founded: "1143",
        condition: "Ruins",
        coordinates: "17°23′01″N 78°24′04″E",
        image: Some("https://commons.wikimedia.org/wiki/Special:FilePath/Golconda_Fort_Hyderabad.jpg?width=640"),
    },
    SampleFort {
        id: "Q1062346",
        name: "Red Fort",
        location: "Old Delhi, Delhi",
        fort_type: "Palace fort",
        founded: "1639",
        condition: "Preserved",
        coordinates: "28°39′22″N 77°14′27″E",
        image: Some("https://commons.wikimedia.org/wiki/Special:FilePath/Red_Fort_in_Delhi_03-2016.jpg?width=640"),
    },
    SampleFort {
        id: "Q1128011",
        name: "Gwalior Fort",
        location: "Gwalior, Madhya Pradesh",
        fort_type: "Hill fort",
        founded: "8th century",
        condition: "Preserved",
        coordinates: "26°13′49″N 78°10′08″E",
        image: None,
    },
    SampleFort {
        id: "Q2314893",
        name: "Sinhagad",
        location: "Pune district, Maharashtra",
        fort_type: "Hill fort",
        founded: "1328",
        condition: "Ruins",
        coordinates: "18°21′59″N 73°45′18″E",
        image: None,
    },
    SampleFort {
        id: "Q1752480",
        name: "Murud-Janjira",
        location: "Murud, Raigad district, Maharashtra",
        fort_type: "Sea fort",
        founded: "1567",
        condition: "Ruins",
        coordinates: "18°17′59″N 72°57′51″E",
        image: Some("https://images.invalid/murud-janjira.jpg"),
    },
    SampleFort {
        id: "Q3595378",
        name: "Fort St. George",
        location: "Chennai, Tamil Nadu",
        fort_type: "Star fort",
        founded: "1644",
        condition: "In use",
        coordinates: "13°04′47″N 80°17′14″E",
        image: None,
    },
];

fn fort_entry(fort: &SampleFort, rng: &mut SimpleRng) -> Value {
    json!({
        "id": fort.id,
        "name": fort.name,
        "locations": [fort.location],
        "details": {
            "Type": fort.fort_type,
            "Founded": fort.founded,
            "Condition": fort.condition,
            "Coordinates": fort.coordinates,
        },
        "images": fort.image.into_iter().collect::<Vec<_>>(),
        "last_edited": rng.timestamp(),
    })
}

/// Entries the loader must drop.
fn invalid_entries() -> Vec<Value> {
    vec![
        json!({ "id": "Q0", "locations": ["Jaipur, Rajasthan"], "details": { "Type": "Fort" } }),
        json!({ "id": "Q1", "name": "Nowhere Fort", "locations": [], "details": { "Type": "Fort" } }),
        json!({ "id": "Q2", "name": "Bare Fort", "locations": ["Goa"], "details": {} }),
        json!({ "name": "Anonymous Fort", "locations": ["Goa"], "details": { "Type": "Fort" } }),
        json!({ "id": 7001, "name": "Unmapped Outpost", "locations": ["Somewhere on the frontier"], "details": { "Type": "Outpost" } }),
        json!("not an object"),
    ]
}

fn sample_entries() -> Vec<Value> {
    let mut rng = SimpleRng::new(42);
    let mut entries: Vec<Value> = FORTS.iter().map(|f| fort_entry(f, &mut rng)).collect();
    entries.extend(invalid_entries());
    entries
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "indian_forts.json".to_string());

    let entries = sample_entries();
    let body = serde_json::to_string_pretty(&entries)?;
    std::fs::write(&output_path, body)
        .with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {} entries ({} valid forts) to {output_path}",
        entries.len(),
        FORTS.len()
    );
    Ok(())
}
