use crate::{Region, Site};

/// (id, name, lat, lon, region), in display order.
const DUST_BELT: [(&str, &str, f64, f64, Region); 36] = [
    // Middle East
    ("dubai", "Dubai", 25.276987, 55.296249, Region::MiddleEast),
    ("abudhabi", "Abu Dhabi", 24.4539, 54.3773, Region::MiddleEast),
    ("sharjah", "Sharjah", 25.3463, 55.4209, Region::MiddleEast),
    ("riyadh", "Riyadh", 24.7136, 46.6753, Region::MiddleEast),
    ("jeddah", "Jeddah", 21.4858, 39.1925, Region::MiddleEast),
    ("doha", "Doha", 25.2854, 51.531, Region::MiddleEast),
    ("muscat", "Muscat", 23.588, 58.3829, Region::MiddleEast),
    ("kuwait", "Kuwait City", 29.3759, 47.9774, Region::MiddleEast),
    ("baghdad", "Baghdad", 33.3152, 44.3661, Region::MiddleEast),
    ("tehran", "Tehran", 35.6892, 51.389, Region::MiddleEast),
    ("manama", "Manama", 26.2285, 50.586, Region::MiddleEast),
    // North Africa
    ("cairo", "Cairo", 30.0444, 31.2357, Region::NorthAfrica),
    ("alex", "Alexandria", 31.2001, 29.9187, Region::NorthAfrica),
    ("tripoli", "Tripoli", 32.8872, 13.1913, Region::NorthAfrica),
    ("benghazi", "Benghazi", 32.1167, 20.0667, Region::NorthAfrica),
    ("tunis", "Tunis", 36.8065, 10.1815, Region::NorthAfrica),
    ("algiers", "Algiers", 36.7372, 3.0863, Region::NorthAfrica),
    ("nouakchott", "Nouakchott", 18.0735, -15.9582, Region::NorthAfrica),
    ("agadez", "Agadez", 16.9733, 7.9911, Region::NorthAfrica),
    ("khartoum", "Khartoum", 15.5007, 32.5599, Region::NorthAfrica),
    // South Asia
    ("delhi", "New Delhi", 28.6139, 77.209, Region::SouthAsia),
    ("lahore", "Lahore", 31.5204, 74.3587, Region::SouthAsia),
    ("karachi", "Karachi", 24.8607, 67.0011, Region::SouthAsia),
    ("ahmedabad", "Ahmedabad", 23.0225, 72.5714, Region::SouthAsia),
    ("jaipur", "Jaipur", 26.9124, 75.7873, Region::SouthAsia),
    // East Asia
    ("beijing", "Beijing", 39.9042, 116.4074, Region::EastAsia),
    ("ulaan", "Ulaanbaatar", 47.8864, 106.9057, Region::EastAsia),
    // Australia
    ("alice", "Alice Springs", -23.698, 133.8807, Region::Australia),
    ("mildura", "Mildura", -34.1855, 142.1625, Region::Australia),
    ("brokenhill", "Broken Hill", -31.953, 141.453, Region::Australia),
    // US Southwest
    ("phoenix", "Phoenix", 33.4484, -112.074, Region::UsSouthwest),
    ("tucson", "Tucson", 32.2226, -110.9747, Region::UsSouthwest),
    ("elpaso", "El Paso", 31.7619, -106.485, Region::UsSouthwest),
    ("abq", "Albuquerque", 35.0844, -106.6504, Region::UsSouthwest),
    ("bakers", "Bakersfield", 35.3733, -119.0187, Region::UsSouthwest),
    ("vegas", "Las Vegas", 36.1699, -115.1398, Region::UsSouthwest),
];

pub(crate) fn dust_belt_sites() -> Vec<Site> {
    DUST_BELT
        .iter()
        .map(|&(id, name, lat, lon, region)| Site::new(id, name, lat, lon, region))
        .collect()
}
