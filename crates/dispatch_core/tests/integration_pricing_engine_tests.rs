mod support;

use chrono::{TimeZone, Utc};
use dispatch_core::domain::Location;
use dispatch_core::error::DomainError;
use dispatch_core::pricing::PriceCalculationRequest;
use support::Harness;

fn price_request() -> PriceCalculationRequest {
    PriceCalculationRequest {
        trip_request_id: "req-1".to_string(),
        passenger_id: "p1".to_string(),
        matched_driver_id: "driver_1".to_string(),
        origin: support::origin(),
        destination: support::destination(),
        estimated_distance_meters: 1000.0,
        estimated_duration_seconds: 600.0,
        demand_multiplier: 1.0,
        supply_multiplier: 1.0,
        driver_acceptance_rate: 1.0,
        driver_rating: 5.0,
        pricing_seed: 42,
        zone: None,
    }
}

fn set_hour(harness: &Harness, hour: u32) {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp");
    harness.clock.set(at);
}

#[test]
fn off_peak_fare_breaks_down_as_base_plus_distance_plus_time() {
    let harness = Harness::new();
    let quote = harness.pricing.calculate(&price_request()).expect("quote");

    // 5.0 base + 2.0 * 1km + 0.5 * 10min = 12.0, no surge at noon.
    assert_eq!(quote.breakdown.base, 5.0);
    assert_eq!(quote.breakdown.distance, 2.0);
    assert_eq!(quote.breakdown.time, 5.0);
    assert_eq!(quote.breakdown.surge, 0.0);
    assert_eq!(quote.passenger_fare_total, 12.0);
    assert_eq!(quote.platform_commission, 2.4);
    assert_eq!(quote.driver_payout_total, 9.6);
    assert_eq!(quote.pricing_model_version, "v-test");
}

#[test]
fn identical_inputs_at_fixed_config_and_clock_give_identical_breakdowns() {
    let harness = Harness::new();
    let first = harness.pricing.calculate(&price_request()).expect("quote");
    let second = harness.pricing.calculate(&price_request()).expect("quote");

    assert_eq!(first.passenger_fare_total, second.passenger_fare_total);
    assert_eq!(first.driver_payout_total, second.driver_payout_total);
    assert_eq!(first.platform_commission, second.platform_commission);
    assert_eq!(first.breakdown, second.breakdown);
    // Only the calculation id is fresh per call.
    assert_ne!(first.calculation_id, second.calculation_id);
}

#[test]
fn zero_distance_and_duration_yield_the_base_fare() {
    let harness = Harness::new();
    let mut request = price_request();
    request.estimated_distance_meters = 0.0;
    request.estimated_duration_seconds = 0.0;

    let quote = harness.pricing.calculate(&request).expect("quote");
    assert_eq!(quote.passenger_fare_total, 5.0);
}

#[test]
fn demand_multiplier_below_one_is_clamped() {
    let harness = Harness::new();
    let mut discounted = price_request();
    discounted.demand_multiplier = 0.2;

    let baseline = harness.pricing.calculate(&price_request()).expect("quote");
    let clamped = harness.pricing.calculate(&discounted).expect("quote");
    assert_eq!(clamped.passenger_fare_total, baseline.passenger_fare_total);
}

#[test]
fn surge_band_applies_within_hours_and_excludes_end_hour() {
    let harness = Harness::new();

    set_hour(&harness, 8);
    let surged = harness.pricing.calculate(&price_request()).expect("quote");
    // 12.0 * 1.5 = 18.0, already on a 0.5 step.
    assert_eq!(surged.surge_multiplier, 1.5);
    assert_eq!(surged.passenger_fare_total, 18.0);
    assert_eq!(surged.breakdown.surge, 6.0);

    // Hour exactly equal to end_hour is outside the band.
    set_hour(&harness, 9);
    let off_peak = harness.pricing.calculate(&price_request()).expect("quote");
    assert_eq!(off_peak.surge_multiplier, 1.0);
    assert_eq!(off_peak.passenger_fare_total, 12.0);
}

#[test]
fn zone_override_changes_the_rate_card() {
    let mut config = support::sample_config();
    config.zone_overrides.insert(
        "airport".to_string(),
        dispatch_core::pricing::RateCardOverride {
            base_fare: Some(8.0),
            ..Default::default()
        },
    );
    let harness = Harness::with_config(config);

    let mut request = price_request();
    request.zone = Some("airport".to_string());
    let quote = harness.pricing.calculate(&request).expect("quote");
    assert_eq!(quote.passenger_fare_total, 15.0);
}

#[test]
fn ab_variant_is_picked_from_the_pricing_seed() {
    let mut config = support::sample_config();
    config.ab_tests = vec![
        dispatch_core::pricing::AbVariant {
            experiment_name: "fare".to_string(),
            variant: "A".to_string(),
            overrides: Default::default(),
        },
        dispatch_core::pricing::AbVariant {
            experiment_name: "fare".to_string(),
            variant: "B".to_string(),
            overrides: dispatch_core::pricing::RateCardOverride {
                per_min_rate: Some(0.4),
                ..Default::default()
            },
        },
    ];
    let harness = Harness::with_config(config);

    let mut request = price_request();
    request.pricing_seed = 42; // even -> variant A
    let variant_a = harness.pricing.calculate(&request).expect("quote");
    assert_eq!(variant_a.ab_variant.as_deref(), Some("fare/A"));
    assert_eq!(variant_a.passenger_fare_total, 12.0);

    request.pricing_seed = 43; // odd -> variant B
    let variant_b = harness.pricing.calculate(&request).expect("quote");
    assert_eq!(variant_b.ab_variant.as_deref(), Some("fare/B"));
    // 5.0 + 2.0 + 0.4 * 10 = 11.0
    assert_eq!(variant_b.passenger_fare_total, 11.0);
}

#[test]
fn guardrail_rejects_fares_whose_commission_misses_the_floor() {
    let mut config = support::sample_config();
    config.default.commission_percent = 0.0;
    let harness = Harness::with_config(config);

    let result = harness.pricing.calculate(&price_request());
    assert!(matches!(result, Err(DomainError::EconomicGuardrail(_))));
}

#[test]
fn invalid_inputs_are_rejected_at_the_boundary() {
    let harness = Harness::new();

    let mut request = price_request();
    request.estimated_distance_meters = -1.0;
    assert!(matches!(
        harness.pricing.calculate(&request),
        Err(DomainError::InvalidArgument(_))
    ));

    let mut request = price_request();
    request.origin = Location::new(f64::NAN, 67.8);
    assert!(matches!(
        harness.pricing.calculate(&request),
        Err(DomainError::InvalidArgument(_))
    ));

    let mut request = price_request();
    request.driver_rating = 5.5;
    assert!(matches!(
        harness.pricing.calculate(&request),
        Err(DomainError::InvalidArgument(_))
    ));
}
