//! Minimal programmatic EPSG catalog: the datum families we recognize and
//! how their UTM zone codes are computed.

/// Supported datum families, in canonical candidate-generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datum {
    Wgs84,
    Nad83,
    Nad27,
    Ed50,
    Etrs89,
}

impl Datum {
    pub const ALL: [Self; 5] = [Self::Wgs84, Self::Nad83, Self::Nad27, Self::Ed50, Self::Etrs89];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Wgs84 => "WGS84",
            Self::Nad83 => "NAD83",
            Self::Nad27 => "NAD27",
            Self::Ed50 => "ED50",
            Self::Etrs89 => "ETRS89",
        }
    }

    /// Textual spellings that identify this datum.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Wgs84 => &["WGS84", "WGS 84", "WGS-84", "WORLD GEODETIC SYSTEM 1984"],
            Self::Nad27 => &["NAD27", "N.A.D. 27", "NAD 27", "NORTH AMERICAN DATUM 1927"],
            Self::Nad83 => &["NAD83", "N.A.D. 83", "NAD 83", "NORTH AMERICAN DATUM 1983"],
            Self::Ed50 => &["ED50", "EUROPEAN DATUM 1950", "ED 50", "ED-50"],
            Self::Etrs89 => &["ETRS89", "ETRF89", "ETRF2000", "ETRS 89", "ETRS-89"],
        }
    }

    /// EPSG base code for northern-hemisphere UTM zones (zone number is
    /// added to the base).
    #[must_use]
    pub fn north_base(self) -> u32 {
        match self {
            Self::Wgs84 => 32600,
            Self::Nad83 => 26900,
            Self::Nad27 => 26700,
            Self::Ed50 => 23000,
            Self::Etrs89 => 25800,
        }
    }

    /// EPSG base code for southern zones; most of these families are
    /// defined for the northern hemisphere only.
    #[must_use]
    pub fn south_base(self) -> Option<u32> {
        match self {
            Self::Wgs84 => Some(32700),
            Self::Nad83 | Self::Nad27 | Self::Ed50 | Self::Etrs89 => None,
        }
    }
}

use crate::cues::Hemisphere;

/// EPSG code for `datum` / UTM `zone` in `hemisphere`, when the family
/// defines one.
#[must_use]
pub fn utm_epsg(datum: Datum, zone: u8, hemisphere: Hemisphere) -> Option<u32> {
    let base = match hemisphere {
        Hemisphere::North => Some(datum.north_base()),
        Hemisphere::South => datum.south_base(),
    }?;
    Some(base + u32::from(zone))
}

/// Inverse lookup: which datum/zone/hemisphere an EPSG code names, if it
/// falls in one of the UTM ranges we know. The family ranges do not
/// overlap, so the first hit is the only hit.
#[must_use]
pub fn utm_from_epsg(code: u32) -> Option<(Datum, u8, Hemisphere)> {
    for family in Datum::ALL {
        for hemisphere in [Hemisphere::North, Hemisphere::South] {
            let base = match hemisphere {
                Hemisphere::North => Some(family.north_base()),
                Hemisphere::South => family.south_base(),
            };
            let Some(base) = base else { continue };
            if (base + 1..=base + 60).contains(&code) {
                return Some((family, (code - base) as u8, hemisphere));
            }
        }
    }
    None
}

#[must_use]
pub fn utm_label(datum: Datum, zone: u8, hemisphere: Hemisphere) -> String {
    format!("{} / UTM zone {}{}", datum.label(), zone, hemisphere.letter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_zone_codes() {
        assert_eq!(utm_epsg(Datum::Wgs84, 15, Hemisphere::North), Some(32615));
        assert_eq!(utm_epsg(Datum::Wgs84, 15, Hemisphere::South), Some(32715));
    }

    #[test]
    fn north_only_families_have_no_southern_zones() {
        assert_eq!(utm_epsg(Datum::Nad27, 14, Hemisphere::North), Some(26714));
        assert_eq!(utm_epsg(Datum::Nad27, 14, Hemisphere::South), None);
        assert_eq!(utm_epsg(Datum::Etrs89, 31, Hemisphere::South), None);
    }

    #[test]
    fn epsg_inverse_lookup() {
        assert_eq!(utm_from_epsg(32615), Some((Datum::Wgs84, 15, Hemisphere::North)));
        assert_eq!(utm_from_epsg(32715), Some((Datum::Wgs84, 15, Hemisphere::South)));
        assert_eq!(utm_from_epsg(26714), Some((Datum::Nad27, 14, Hemisphere::North)));
        assert_eq!(utm_from_epsg(25832), Some((Datum::Etrs89, 32, Hemisphere::North)));
        // Geographic CRS codes sit outside every UTM range.
        assert_eq!(utm_from_epsg(4326), None);
    }

    #[test]
    fn labels_read_naturally() {
        assert_eq!(utm_label(Datum::Ed50, 31, Hemisphere::North), "ED50 / UTM zone 31N");
    }
}
