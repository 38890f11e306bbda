// Response normalization: rebuilds itineraries, fares and per-passenger
// pricing from the cross-referenced shopping response graph.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::model::{
    round2, CanonicalFlight, Direction, Fare, Leg, LegPoint, NormalizedSearch, OfferReference,
    PaxFare, PaxManifest, PriceBreakdown,
};
use crate::response::{AirShoppingRs, DatedMarketingSegment, Offer, OfferItem};

// Currency used for zero-valued placeholder fares when an offer carries no
// currency of its own (the carrier's home market).
const FALLBACK_CURRENCY: &str = "IQD";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("journey {journey_id}: pax segment reference {reference_id} does not resolve to a marketing segment")]
    UnresolvedSegmentReference {
        journey_id: String,
        reference_id: String,
    },

    #[error("segment {segment_id}: unparseable scheduled time {value:?}")]
    InvalidScheduledTime { segment_id: String, value: String },
}

// Transforms a shopping response plus a passenger manifest into the
// carrier-agnostic flight groups. An unresolvable segment reference aborts
// the whole response; a journey without a matching offer degrades to a
// zero-valued fare instead.
pub fn normalize(
    rs: &AirShoppingRs,
    manifest: &PaxManifest,
) -> Result<NormalizedSearch, NormalizeError> {
    let response = &rs.response;

    // Index build: marketing segment id -> segment, then pax segment id ->
    // marketing segment (two reference hops composed into one lookup).
    let marketing_by_id: HashMap<&str, &DatedMarketingSegment> = response
        .data_lists
        .marketing_segments
        .segments
        .iter()
        .map(|segment| (segment.id.as_str(), segment))
        .collect();

    let segment_by_pax_ref: HashMap<&str, &DatedMarketingSegment> = response
        .data_lists
        .pax_segments
        .segments
        .iter()
        .filter_map(|pax_segment| {
            marketing_by_id
                .get(pax_segment.marketing_segment_ref.as_str())
                .map(|segment| (pax_segment.id.as_str(), *segment))
        })
        .collect();

    let offers = &response.offers_group.carrier_offers.offers;
    let effective_manifest = manifest.effective();
    if manifest.is_empty() {
        warn!("empty passenger manifest, pricing for a single adult");
    }

    let mut normalized = NormalizedSearch::default();

    for journey in &response.data_lists.journeys.journeys {
        // A dangling reference is an upstream data integrity violation, not
        // something to skip over.
        let mut segments = Vec::with_capacity(journey.segment_refs.len());
        for reference in &journey.segment_refs {
            let segment = segment_by_pax_ref.get(reference.as_str()).ok_or_else(|| {
                NormalizeError::UnresolvedSegmentReference {
                    journey_id: journey.id.clone(),
                    reference_id: reference.clone(),
                }
            })?;
            segments.push(*segment);
        }

        let legs = assemble_legs(&segments)?;
        let matched = match_offer(offers, &journey.id);
        if matched.is_none() {
            warn!(journey_id = %journey.id, "no offer references this journey, emitting zero-valued fare");
        }
        let fare = derive_fare(matched, &legs, &effective_manifest);

        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            continue;
        };
        let total_duration_minutes = whole_minutes(first.departure.scheduled, last.arrival.scheduled);

        // Direction by plain lexicographic comparison of the endpoint codes.
        let direction = if first.departure.airport_code < last.arrival.airport_code {
            Direction::Outbound
        } else {
            Direction::Inbound
        };

        let flight = CanonicalFlight {
            journey_id: journey.id.clone(),
            direction,
            total_duration_minutes,
            legs,
            fares: vec![fare],
        };

        match direction {
            Direction::Outbound => normalized.outbound_flights.push(flight),
            Direction::Inbound => normalized.inbound_flights.push(flight),
        }
    }

    Ok(normalized)
}

// Resolved marketing segments, in journey order, as output legs with layover
// minutes between adjacent pairs. Negative or zero layovers pass through.
fn assemble_legs(segments: &[&DatedMarketingSegment]) -> Result<Vec<Leg>, NormalizeError> {
    let mut legs = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let departure = parse_scheduled(&segment.id, &segment.departure.scheduled_time)?;
        let arrival = parse_scheduled(&segment.id, &segment.arrival.scheduled_time)?;

        let wait_minutes = match segments.get(index + 1) {
            Some(next) => {
                let next_departure = parse_scheduled(&next.id, &next.departure.scheduled_time)?;
                whole_minutes(arrival, next_departure)
            }
            None => 0,
        };

        legs.push(Leg {
            flight_number: format!("{}{}", segment.carrier_code, segment.flight_number),
            carrier_code: segment.carrier_code.clone(),
            departure: LegPoint {
                airport_code: segment.departure.airport_code.clone(),
                scheduled: departure,
            },
            arrival: LegPoint {
                airport_code: segment.arrival.airport_code.clone(),
                scheduled: arrival,
            },
            duration_minutes: whole_minutes(departure, arrival),
            wait_minutes,
        });
    }

    Ok(legs)
}

// First offer whose pax-journey reference list contains the journey id wins;
// further matches are ignored.
fn match_offer<'a>(offers: &'a [Offer], journey_id: &str) -> Option<(&'a Offer, &'a OfferItem)> {
    offers.iter().find_map(|offer| {
        offer
            .items
            .iter()
            .find(|item| {
                item.service
                    .association
                    .journey_ref
                    .journey_ids
                    .iter()
                    .any(|id| id == journey_id)
            })
            .map(|item| (offer, item))
    })
}

// Per-passenger-type fare lines from the matched offer amounts, scaled by the
// fixed type multipliers and rounded only here at the output boundary.
fn derive_fare(
    matched: Option<(&Offer, &OfferItem)>,
    legs: &[Leg],
    manifest: &PaxManifest,
) -> Fare {
    let (currency, total, base, tax, offer_ref) = match matched {
        Some((offer, item)) => {
            let price = &item.price;
            let currency = if price.total.currency.is_empty() {
                FALLBACK_CURRENCY.to_string()
            } else {
                price.total.currency.clone()
            };
            (
                currency,
                parse_amount(&price.total.value),
                parse_amount(&price.base.value),
                parse_amount(&price.tax_summary.total_tax.value),
                Some(OfferReference {
                    offer_id: offer.id.clone(),
                    offer_item_id: item.id.clone(),
                }),
            )
        }
        None => (FALLBACK_CURRENCY.to_string(), 0.0, 0.0, 0.0, None),
    };

    let pax_fares = manifest
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(pax_type, count)| {
            let multiplier = pax_type.fare_multiplier();
            PaxFare {
                pax_type,
                count,
                currency: currency.clone(),
                price: breakdown(total * multiplier, base * multiplier, tax * multiplier),
            }
        })
        .collect();

    Fare {
        fare_key: Uuid::new_v4().to_string(),
        currency,
        class_codes: (1..=legs.len()).map(|n| format!("Y{}", n)).collect(),
        cabin_types: vec!["ECONOMY".to_string(); legs.len()],
        price: breakdown(total, base, tax),
        pax_fares,
        offer: offer_ref,
    }
}

fn breakdown(total: f64, base: f64, tax: f64) -> PriceBreakdown {
    PriceBreakdown {
        total: round2(total),
        base: round2(base),
        tax: round2(tax),
        service_fee: 0.0,
        agency_commission: 0.0,
        supplement: 0.0,
    }
}

// Fare amounts are non-negative by contract; anything else degrades to zero.
fn parse_amount(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0).max(0.0)
}

// Accepts RFC 3339 as well as zone-less carrier timestamps.
fn parse_scheduled(segment_id: &str, value: &str) -> Result<NaiveDateTime, NormalizeError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| NormalizeError::InvalidScheduledTime {
            segment_id: segment_id.to_string(),
            value: value.to_string(),
        })
}

fn whole_minutes(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let seconds = (to - from).num_seconds();
    (seconds as f64 / 60.0).round() as i64
}
