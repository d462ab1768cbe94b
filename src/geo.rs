//! Geographic helpers: great-circle distance and DIGIPIN decoding
//!
//! Pure functions over [`GeoPoint`]s. Inputs are not validated; NaN
//! coordinates propagate to the caller.

use crate::model::GeoPoint;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine)
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// DIGIPIN symbol grid, row 0 being the northernmost band of each cell
const DIGIPIN_GRID: [[char; 4]; 4] = [
    ['F', 'C', '9', '8'],
    ['J', '3', '2', '7'],
    ['K', '4', '5', '6'],
    ['L', 'M', 'P', 'T'],
];

/// Coverage bounds of the DIGIPIN grid (degrees)
const DIGIPIN_LAT: (f64, f64) = (2.5, 38.5);
const DIGIPIN_LNG: (f64, f64) = (63.5, 99.5);

/// Decode a 10-symbol DIGIPIN code to the center of its grid cell.
///
/// Hyphens and case are ignored. Returns `None` for codes of the wrong
/// length or containing symbols outside the DIGIPIN alphabet; the
/// degraded-mode default coordinate is the caller's concern.
pub fn decode_digipin(code: &str) -> Option<GeoPoint> {
    let symbols: Vec<char> = code
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if symbols.len() != 10 {
        return None;
    }

    let (mut lat_min, mut lat_max) = DIGIPIN_LAT;
    let (mut lng_min, mut lng_max) = DIGIPIN_LNG;

    for symbol in symbols {
        let (row, col) = grid_position(symbol)?;
        let lat_step = (lat_max - lat_min) / 4.0;
        let lng_step = (lng_max - lng_min) / 4.0;

        // Row 0 is the top band, so it narrows from the north edge down
        lat_min = lat_max - (row + 1) as f64 * lat_step;
        lat_max -= row as f64 * lat_step;
        lng_max = lng_min + (col + 1) as f64 * lng_step;
        lng_min += col as f64 * lng_step;
    }

    Some(GeoPoint::new(
        (lat_min + lat_max) / 2.0,
        (lng_min + lng_max) / 2.0,
    ))
}

fn grid_position(symbol: char) -> Option<(usize, usize)> {
    for (r, row) in DIGIPIN_GRID.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if *cell == symbol {
                return Some((r, c));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(18.5204, 73.8567);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pune = GeoPoint::new(18.5204, 73.8567);
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let d1 = haversine_km(pune, mumbai);
        let d2 = haversine_km(mumbai, pune);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Pune to Mumbai is roughly 120 km as the crow flies
        let pune = GeoPoint::new(18.5204, 73.8567);
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let d = haversine_km(pune, mumbai);
        assert!(d > 100.0 && d < 140.0, "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        let p = GeoPoint::new(f64::NAN, 73.0);
        let q = GeoPoint::new(18.0, 73.0);
        assert!(haversine_km(p, q).is_nan());
    }

    #[test]
    fn test_decode_digipin_stays_in_bounds() {
        let point = decode_digipin("39J-49L-L8T4").expect("valid code");
        assert!(point.lat > DIGIPIN_LAT.0 && point.lat < DIGIPIN_LAT.1);
        assert!(point.lng > DIGIPIN_LNG.0 && point.lng < DIGIPIN_LNG.1);
    }

    #[test]
    fn test_decode_digipin_ignores_hyphens_and_case() {
        let with = decode_digipin("39J-49L-L8T4").unwrap();
        let without = decode_digipin("39j49ll8t4").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_decode_digipin_rejects_malformed() {
        assert!(decode_digipin("").is_none());
        assert!(decode_digipin("39J-49L").is_none());
        assert!(decode_digipin("39J-49L-L8TZ").is_none()); // Z not in alphabet
        assert!(decode_digipin("39J-49L-L8T4X").is_none()); // too long
    }

    #[test]
    fn test_first_symbol_picks_quadrant() {
        // 'F' is the north-west cell: top latitude band, west longitude band
        let p = decode_digipin("FFFFFFFFFF").unwrap();
        assert!(p.lat > 29.5, "expected northern band, got {}", p.lat);
        assert!(p.lng < 72.5, "expected western band, got {}", p.lng);

        // 'T' is the south-east cell
        let q = decode_digipin("TTTTTTTTTT").unwrap();
        assert!(q.lat < 11.5);
        assert!(q.lng > 90.5);
    }
}
