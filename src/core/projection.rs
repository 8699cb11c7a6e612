//! Inverse UTM projection (WGS84, Krüger series to third order).

const K0_A: f64 = 6_364_902.166_165_087; // k0 * rectifying radius, metres
const FALSE_EASTING: f64 = 500_000.0;

const BETA: [f64; 3] = [
    8.377_321_640_821_44e-4,
    5.906_110_863_719_917e-8,
    1.676_991_179_437_975_4e-10,
];
const DELTA: [f64; 3] = [
    3.356_551_448_628_875e-3,
    6.571_913_193_172_695e-6,
    1.767_745_996_207_56e-8,
];

/// Convert a north-zone UTM coordinate to `[lon, lat]` in degrees.
///
/// Landsat grids stay in the north zone south of the equator, so `northing`
/// is signed and carries no false northing.
pub fn utm_to_lon_lat(easting: f64, northing: f64, zone: u32) -> [f64; 2] {
    let xi = northing / K0_A;
    let eta = (easting - FALSE_EASTING) / K0_A;

    let mut xi_p = xi;
    let mut eta_p = eta;
    for (j, beta) in BETA.iter().enumerate() {
        let k = 2.0 * (j as f64 + 1.0);
        xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
        eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
    }

    let chi = (xi_p.sin() / eta_p.cosh()).asin();
    let mut lat = chi;
    for (j, delta) in DELTA.iter().enumerate() {
        lat += delta * (2.0 * (j as f64 + 1.0) * chi).sin();
    }

    let lon0 = (zone as f64 * 6.0 - 183.0).to_radians();
    let lon = lon0 + (eta_p.sinh() / xi_p.cos()).atan();

    [lon.to_degrees(), lat.to_degrees()]
}
