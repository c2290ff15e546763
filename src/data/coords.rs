use thiserror::Error;

/// Decimal-degree position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("missing {0} token")]
    MissingToken(&'static str),
    #[error("{axis} token {token:?} has no valid hemisphere letter")]
    Hemisphere { axis: &'static str, token: String },
    #[error("{axis} token {token:?} has no numeric degree prefix")]
    Degrees { axis: &'static str, token: String },
    #[error("{axis} value {value} is out of range")]
    OutOfRange { axis: &'static str, value: f64 },
}

/// Parse `"<deg>°<min>′<sec>″N <deg>°<min>′<sec>″E / ..."` into a [`LatLon`].
///
/// Only the whole-degree prefix of each token is used; minutes and seconds
/// are ignored, so `18°34′54″N` reads as `18.0`.
pub fn parse_coordinates(text: &str) -> Result<LatLon, CoordinateError> {
    let first = text.split('/').next().unwrap_or("");
    let mut tokens = first.split_whitespace();
    let lat_token = tokens.next().ok_or(CoordinateError::MissingToken("latitude"))?;
    let lon_token = tokens.next().ok_or(CoordinateError::MissingToken("longitude"))?;

    let lat = parse_axis(lat_token, "latitude", ('N', 'S'), 90.0)?;
    let lon = parse_axis(lon_token, "longitude", ('E', 'W'), 180.0)?;
    Ok(LatLon { lat, lon })
}

fn parse_axis(
    token: &str,
    axis: &'static str,
    (positive, negative): (char, char),
    limit: f64,
) -> Result<f64, CoordinateError> {
    let hemisphere = token.chars().last().map(|c| c.to_ascii_uppercase());
    let sign = match hemisphere {
        Some(c) if c == positive => 1.0,
        Some(c) if c == negative => -1.0,
        _ => {
            return Err(CoordinateError::Hemisphere {
                axis,
                token: token.to_string(),
            })
        }
    };

    let body = &token[..token.len() - 1];
    let end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    let degrees: f64 = body[..end].parse().map_err(|_| CoordinateError::Degrees {
        axis,
        token: token.to_string(),
    })?;

    if degrees > limit {
        return Err(CoordinateError::OutOfRange {
            axis,
            value: degrees,
        });
    }
    Ok(sign * degrees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_whole_degrees_only() {
        let pos = parse_coordinates("18°34′54″N 83°22′00″E / 18.58°N 83.37°E").unwrap();
        assert!((pos.lat - 18.0).abs() < 1e-9);
        assert!((pos.lon - 83.0).abs() < 1e-9);
    }

    #[rstest]
    #[case("12°S 77°W", -12.0, -77.0)]
    #[case("26.9124°N 75.7873°E", 26.9124, 75.7873)]
    #[case("  9°n   76°e  ", 9.0, 76.0)]
    fn applies_hemisphere_sign(#[case] text: &str, #[case] lat: f64, #[case] lon: f64) {
        assert_eq!(parse_coordinates(text).unwrap(), LatLon { lat, lon });
    }

    #[rstest]
    #[case("", CoordinateError::MissingToken("latitude"))]
    #[case("18°N", CoordinateError::MissingToken("longitude"))]
    #[case("18° 83°E", CoordinateError::Hemisphere { axis: "latitude", token: "18°".into() })]
    #[case("18°N 83°N", CoordinateError::Hemisphere { axis: "longitude", token: "83°N".into() })]
    #[case("°N 83°E", CoordinateError::Degrees { axis: "latitude", token: "°N".into() })]
    #[case("18°N 200°E", CoordinateError::OutOfRange { axis: "longitude", value: 200.0 })]
    fn rejects_malformed_input(#[case] text: &str, #[case] expected: CoordinateError) {
        assert_eq!(parse_coordinates(text).unwrap_err(), expected);
    }
}
