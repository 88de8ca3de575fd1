use std::collections::BTreeMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dispatch_core::clock::SystemClock;
use dispatch_core::domain::Location;
use dispatch_core::matching::{MatchingPolicy, MatchingRequest, NearestDriverPolicy, PoolDriver};
use dispatch_core::pricing::{
    ConfigStore, EconomicConstraints, PriceCalculationRequest, PricingConfig, PricingEngine,
    RateCard, TimeBandMultiplier,
};

fn bench_config() -> PricingConfig {
    PricingConfig {
        version: "bench".to_string(),
        default: RateCard {
            base_fare: 5.0,
            per_km_rate: 2.0,
            per_min_rate: 0.5,
            commission_percent: 20.0,
            minimum_fare: None,
            rounding_denominations: vec![0.5, 1.0, 5.0],
        },
        zone_overrides: BTreeMap::new(),
        time_based_multipliers: vec![TimeBandMultiplier {
            start_hour: 7,
            end_hour: 9,
            surge_multiplier: 1.5,
        }],
        ab_tests: Vec::new(),
        economic_constraints: EconomicConstraints {
            min_driver_rate: 1.5,
            max_driver_rate: 3.0,
            operational_cost_floor: 1.0,
        },
    }
}

fn pricing_calculation(c: &mut Criterion) {
    let store = Arc::new(ConfigStore::new());
    store.install(bench_config());
    let engine = PricingEngine::new(store, Arc::new(SystemClock));

    let request = PriceCalculationRequest {
        trip_request_id: "req-bench".to_string(),
        passenger_id: "p1".to_string(),
        matched_driver_id: "d1".to_string(),
        origin: Location::new(39.60, 67.80),
        destination: Location::new(39.65, 67.85),
        estimated_distance_meters: 4200.0,
        estimated_duration_seconds: 780.0,
        demand_multiplier: 1.3,
        supply_multiplier: 1.0,
        driver_acceptance_rate: 0.92,
        driver_rating: 4.7,
        pricing_seed: 42,
        zone: None,
    };

    c.bench_function("pricing_calculate", |b| {
        b.iter(|| engine.calculate(black_box(&request)).expect("quote"))
    });
}

fn matching_rank(c: &mut Criterion) {
    let pool: Vec<PoolDriver> = (0..500)
        .map(|i| PoolDriver {
            driver_id: format!("driver_{i:04}"),
            location: Location::new(39.50 + (i % 40) as f64 * 0.005, 67.70 + (i / 40) as f64 * 0.005),
        })
        .collect();
    let request = MatchingRequest {
        trip_request_id: "req-bench".to_string(),
        origin: Location::new(39.60, 67.80),
        destination: Location::new(39.65, 67.85),
        max_candidates: 5,
        seed: 42,
    };
    let policy = NearestDriverPolicy;

    c.bench_function("matching_rank_500_drivers", |b| {
        b.iter(|| policy.rank(black_box(&request), black_box(&pool)))
    });
}

criterion_group!(benches, pricing_calculation, matching_rank);
criterion_main!(benches);
