//! Coarse geographic coverage of the National Weather Service.
//!
//! The NWS only forecasts for the United States and its territories. Rather
//! than let the points endpoint reject foreign coordinates, we screen them
//! against four inclusive bounding boxes before any network call is made.

/// A served region, one per bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    ContinentalUs,
    Alaska,
    Hawaii,
    PuertoRico,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::ContinentalUs => "continental US",
            Region::Alaska => "Alaska",
            Region::Hawaii => "Hawaii",
            Region::PuertoRico => "Puerto Rico and Caribbean",
        }
    }

    pub const fn all() -> &'static [Region] {
        &[
            Region::ContinentalUs,
            Region::Alaska,
            Region::Hawaii,
            Region::PuertoRico,
        ]
    }

    /// Inclusive bounds of the region.
    pub const fn bounds(&self) -> BoundingBox {
        match self {
            Region::ContinentalUs => BoundingBox::new(25.0, 50.0, -125.0, -65.0),
            Region::Alaska => BoundingBox::new(50.0, 75.0, -180.0, -140.0),
            Region::Hawaii => BoundingBox::new(19.0, 23.0, -162.0, -154.0),
            Region::PuertoRico => BoundingBox::new(15.0, 20.0, -80.0, -68.0),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

/// First region whose box contains the point, if any.
pub fn covering_region(lat: f64, lon: f64) -> Option<Region> {
    Region::all()
        .iter()
        .copied()
        .find(|region| region.bounds().contains(lat, lon))
}

/// Whether the NWS can be expected to serve a forecast for this point.
pub fn is_covered(lat: f64, lon: f64) -> bool {
    covering_region(lat, lon).is_some()
}
