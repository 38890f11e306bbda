// Carrier-agnostic flight/fare model produced by the normalizer, plus the
// request-side value types (search criteria, passenger manifest, order data).

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// Passenger type codes used in fare lines and PTC generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxType {
    Adult,
    Child,
    Infant,
}

impl PaxType {
    // Fixed proportional multipliers relative to the adult fare.
    pub fn fare_multiplier(self) -> f64 {
        match self {
            PaxType::Adult => 1.0,
            PaxType::Child => 0.75,
            PaxType::Infant => 0.10,
        }
    }

    pub fn ptc_code(self) -> &'static str {
        match self {
            PaxType::Adult => "ADT",
            PaxType::Child => "CHD",
            PaxType::Infant => "INF",
        }
    }
}

// How many passengers of each type a search prices for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaxManifest {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl PaxManifest {
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
    }

    pub fn from_counts(counts: &[(PaxType, u32)]) -> Self {
        let mut manifest = Self::default();
        for (pax_type, count) in counts {
            match pax_type {
                PaxType::Adult => manifest.adults = *count,
                PaxType::Child => manifest.children = *count,
                PaxType::Infant => manifest.infants = *count,
            }
        }
        manifest
    }

    pub fn is_empty(&self) -> bool {
        self.adults == 0 && self.children == 0 && self.infants == 0
    }

    // A manifest with zero of every type prices as a single adult.
    pub fn effective(&self) -> PaxManifest {
        if self.is_empty() {
            PaxManifest::new(1, 0, 0)
        } else {
            *self
        }
    }

    pub fn counts(&self) -> [(PaxType, u32); 3] {
        [
            (PaxType::Adult, self.adults),
            (PaxType::Child, self.children),
            (PaxType::Infant, self.infants),
        ]
    }

    // Compact form used in cache keys, e.g. "2A1C0I".
    pub fn signature(&self) -> String {
        format!("{}A{}C{}I", self.adults, self.children, self.infants)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

// References into a previously returned offer, used for pricing and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSelection {
    pub offer_id: String,
    pub offer_item_id: String,
}

#[derive(Debug, Clone)]
pub struct Passenger {
    pub given_name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub gender_code: String,
    pub title: String,
    pub document_id: String,
    pub document_expiry: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub selection: OfferSelection,
    pub passenger: Passenger,
    pub total_amount: f64,
    pub currency: String,
}

// --- Normalized output -----------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegPoint {
    pub airport_code: String,
    pub scheduled: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leg {
    pub flight_number: String,
    pub carrier_code: String,
    pub departure: LegPoint,
    pub arrival: LegPoint,
    pub duration_minutes: i64,
    // Layover before the next leg; zero on the final leg. Negative upstream
    // values pass through uninterpreted.
    pub wait_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub total: f64,
    pub base: f64,
    pub tax: f64,
    pub service_fee: f64,
    pub agency_commission: f64,
    pub supplement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaxFare {
    pub pax_type: PaxType,
    pub count: u32,
    pub currency: String,
    pub price: PriceBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fare {
    pub fare_key: String,
    pub currency: String,
    pub class_codes: Vec<String>,
    pub cabin_types: Vec<String>,
    pub price: PriceBreakdown,
    pub pax_fares: Vec<PaxFare>,
    // Present when an offer matched; lets a later price/order call reference it.
    pub offer: Option<OfferReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferReference {
    pub offer_id: String,
    pub offer_item_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CanonicalFlight {
    pub journey_id: String,
    pub direction: Direction,
    pub total_duration_minutes: i64,
    pub legs: Vec<Leg>,
    pub fares: Vec<Fare>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedSearch {
    pub outbound_flights: Vec<CanonicalFlight>,
    pub inbound_flights: Vec<CanonicalFlight>,
}

// Rounding to two decimals happens only at the output boundary; everything
// upstream computes with full precision.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
