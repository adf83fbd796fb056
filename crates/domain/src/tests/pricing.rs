// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Money, PriceTable, PricingTier, Tour, TourId};

fn create_test_tiers() -> Vec<PricingTier> {
    vec![
        PricingTier::new(1, 3, Money::from_minor(10_000)),
        PricingTier::new(4, 6, Money::from_minor(8_500)),
        PricingTier::new(7, 12, Money::from_minor(7_000)),
    ]
}

fn create_test_tour() -> Tour {
    Tour::new(
        TourId::new(1),
        "Sunset Sail",
        PriceTable::new(create_test_tiers()).unwrap(),
        true,
    )
}

#[test]
fn test_tier_lookup_is_inclusive_on_both_ends() {
    let table: PriceTable = PriceTable::new(create_test_tiers()).unwrap();

    assert_eq!(table.unit_price(1), Some(Money::from_minor(10_000)));
    assert_eq!(table.unit_price(3), Some(Money::from_minor(10_000)));
    assert_eq!(table.unit_price(4), Some(Money::from_minor(8_500)));
    assert_eq!(table.unit_price(12), Some(Money::from_minor(7_000)));
}

#[test]
fn test_pax_outside_every_tier_has_no_price() {
    let table: PriceTable = PriceTable::new(create_test_tiers()).unwrap();

    assert_eq!(table.unit_price(0), None);
    assert_eq!(table.unit_price(13), None);
    assert_eq!(table.max_covered_pax(), 12);
}

#[test]
fn test_tiers_are_sorted_on_construction() {
    let mut tiers: Vec<PricingTier> = create_test_tiers();
    tiers.reverse();

    let table: PriceTable = PriceTable::new(tiers).unwrap();
    assert_eq!(table.tiers()[0].min_pax, 1);
    assert_eq!(table.tiers()[2].min_pax, 7);
}

#[test]
fn test_empty_tier_table_rejected() {
    let result = PriceTable::new(Vec::new());
    assert!(matches!(result, Err(DomainError::InvalidTierTable { .. })));
}

#[test]
fn test_tier_table_must_start_at_one() {
    let result = PriceTable::new(vec![PricingTier::new(2, 5, Money::from_minor(100))]);
    assert!(matches!(result, Err(DomainError::InvalidTierTable { .. })));
}

#[test]
fn test_tier_gap_rejected() {
    let result = PriceTable::new(vec![
        PricingTier::new(1, 3, Money::from_minor(100)),
        PricingTier::new(5, 8, Money::from_minor(90)),
    ]);
    assert!(matches!(result, Err(DomainError::InvalidTierTable { .. })));
}

#[test]
fn test_tier_overlap_rejected() {
    let result = PriceTable::new(vec![
        PricingTier::new(1, 4, Money::from_minor(100)),
        PricingTier::new(4, 8, Money::from_minor(90)),
    ]);
    assert!(matches!(result, Err(DomainError::InvalidTierTable { .. })));
}

#[test]
fn test_inverted_tier_rejected() {
    let result = PriceTable::new(vec![PricingTier::new(1, 0, Money::from_minor(100))]);
    assert!(matches!(result, Err(DomainError::InvalidTierTable { .. })));
}

#[test]
fn test_quote_multiplies_unit_price_by_pax() {
    let tour: Tour = create_test_tour();

    assert_eq!(tour.quote(2).unwrap(), Money::from_minor(20_000));
    assert_eq!(tour.quote(4).unwrap(), Money::from_minor(34_000));
}

#[test]
fn test_tour_reports_uncovered_pax() {
    let tour: Tour = create_test_tour();

    assert_eq!(
        tour.quote(20),
        Err(DomainError::NoPricingTier {
            tour_id: TourId::new(1),
            pax: 20,
        })
    );
}

#[test]
fn test_deserialized_table_is_validated() {
    let table: PriceTable = PriceTable::new(create_test_tiers()).unwrap();
    let json: String = serde_json::to_string(&table).unwrap();
    assert_eq!(serde_json::from_str::<PriceTable>(&json).unwrap(), table);

    let gapped = r#"[
        {"min_pax": 1, "max_pax": 3, "unit_price": 10000},
        {"min_pax": 5, "max_pax": 8, "unit_price": 8500}
    ]"#;
    let err = serde_json::from_str::<PriceTable>(gapped).unwrap_err();
    assert!(err.to_string().contains("must start at 4"));
}
