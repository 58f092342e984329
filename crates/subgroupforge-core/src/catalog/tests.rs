use super::*;
use crate::attribute::Attribute;
use crate::constraint::MissingValuePolicy;
use crate::group::Group;
use crate::value::AttributeValue;

fn dataset() -> Dataset {
    let x: Vec<Option<f64>> = (1..=10).map(|v| Some(v as f64)).collect();
    let b: Vec<Option<bool>> = (1..=10).map(|v| Some(v > 5)).collect();
    Dataset::new("threshold", vec![Attribute::numeric("x", &x), Attribute::boolean("b", &b)]).unwrap()
}

fn catalog(data: &Dataset) -> ConstraintCatalog {
    ConstraintCatalog::build(data, &mut PrimeAllocator::new(), CatalogOptions::default())
}

#[test]
fn test_enumerates_value_comparison_pairs() {
    let data = dataset();
    let catalog = catalog(&data);

    assert_eq!(catalog.constraints_for(0).len(), 20);
    assert_eq!(catalog.constraints_for(1).len(), 4);
    assert_eq!(catalog.len(), 24);
    assert!(catalog.constraints_for(5).is_empty());
}

#[test]
fn test_value_prime_shared_across_comparisons() {
    let data = dataset();
    let catalog = catalog(&data);

    let gteq = catalog.lookup(&data, "x >= 3").unwrap();
    let lteq = catalog.lookup(&data, "x <= 3.0").unwrap();
    assert_eq!(gteq.value_prime(), lteq.value_prime());
    assert_ne!(gteq.comparison_prime(), lteq.comparison_prime());

    let other = catalog.lookup(&data, "x >= 4").unwrap();
    assert_eq!(gteq.comparison_prime(), other.comparison_prime());

    let group = Group::from_constraints([gteq]).unwrap().unwrap();
    let mut seen = std::collections::HashSet::new();
    assert!(group.extend(&lteq, &mut seen).unwrap().is_none());
}

#[test]
fn test_covered_rows_of_threshold() {
    let data = dataset();
    let catalog = catalog(&data);
    let constraint = catalog.lookup(&data, "x >= 6").unwrap();
    assert_eq!(constraint.covered().iter().collect::<Vec<_>>(), vec![5, 6, 7, 8, 9]);
    assert_eq!(constraint.to_string(), "x >= 6.0");
}

#[test]
fn test_unknown_constraint_names_supported_comparisons() {
    let data = dataset();
    let catalog = catalog(&data);

    let err = catalog.lookup(&data, "b >= 1").unwrap_err();
    assert!(matches!(err, SubgroupError::UnknownConstraint { .. }));
    assert!(err.to_string().contains("{EQ,NEQ}"));

    let err = catalog.lookup(&data, "x = 3").unwrap_err();
    assert!(err.to_string().contains("{LTEQ,GTEQ}"));
}

#[test]
fn test_lookup_of_unobserved_value() {
    let data = dataset();
    let err = catalog(&data).lookup(&data, "x >= 11").unwrap_err();
    assert!(matches!(err, SubgroupError::UnknownConstraint { .. }));
}

#[test]
fn test_lookup_of_unknown_attribute_and_malformed_text() {
    let data = dataset();
    let catalog = catalog(&data);
    assert!(matches!(
        catalog.lookup(&data, "y = 1"),
        Err(SubgroupError::UnknownAttribute(_))
    ));
    assert!(matches!(
        catalog.lookup(&data, "x"),
        Err(SubgroupError::InvalidSettings(_))
    ));
}

#[test]
fn test_ordered_equality_adds_eq_and_neq() {
    let data = dataset();
    let options = CatalogOptions {
        ordered_equality: true,
        ..CatalogOptions::default()
    };
    let catalog = ConstraintCatalog::build(&data, &mut PrimeAllocator::new(), options);
    assert_eq!(catalog.constraints_for(0).len(), 40);
    assert_eq!(catalog.lookup(&data, "x = 3").unwrap().coverage(), 1);
}

#[test]
fn test_separate_allocators_reuse_primes() {
    let data = dataset();
    let first = catalog(&data);
    let second = catalog(&data);
    assert_eq!(first.primes(), second.primes());
    assert_eq!(first.primes()[0], 2);
}

#[test]
fn test_missing_as_zero_extends_coverage() {
    let data = Dataset::new(
        "gaps",
        vec![Attribute::numeric("y", &[Some(-1.0), None, Some(2.0), Some(5.0)])],
    )
    .unwrap();
    let options = CatalogOptions {
        missing: MissingValuePolicy::as_zero(),
        ..CatalogOptions::default()
    };
    let catalog = ConstraintCatalog::build(&data, &mut PrimeAllocator::new(), options);

    let lteq = catalog.lookup(&data, "y <= 2").unwrap();
    assert_eq!(lteq.covered().iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    let gteq = catalog.lookup(&data, "y >= 2").unwrap();
    assert_eq!(gteq.covered().iter().collect::<Vec<_>>(), vec![2, 3]);
    let gteq = catalog.lookup(&data, "y >= -1").unwrap();
    assert!(gteq.covered().contains(1));
}

#[test]
fn test_scores_attach_by_signature() {
    let data = dataset();
    let mut catalog = catalog(&data);
    assert!(!catalog.is_scored());

    catalog.score_with(|c| (c.coverage() > 0).then(|| c.coverage() as f64));
    let constraint = catalog.lookup(&data, "x >= 6").unwrap();
    assert!(catalog.is_scored());
    assert_eq!(catalog.score(constraint.signature()), Some(5.0));
}

#[test]
fn test_small_catalog_never_overflows() {
    let data = dataset();
    assert_eq!(catalog(&data).max_safe_depth(), usize::MAX);
}

#[test]
fn test_max_safe_depth_boundary() {
    let values: Vec<Option<f64>> = (0..400).map(|v| Some(v as f64)).collect();
    let data = Dataset::new("wide", vec![Attribute::numeric("w", &values)]).unwrap();
    let catalog = catalog(&data);
    let depth = catalog.max_safe_depth();
    assert!(depth > 0 && depth < usize::MAX);

    let mut primes = catalog.primes().to_vec();
    primes.sort_unstable_by(|a, b| b.cmp(a));
    let product = |count: usize| {
        primes[..count]
            .iter()
            .try_fold(1u128, |acc, &p| acc.checked_mul(p as u128))
    };
    assert!(product(2 * depth).is_some());
    assert!(product(2 * depth + 2).is_none());
}

#[test]
fn test_value_display_round_trips_through_lookup() {
    let data = dataset();
    let catalog = catalog(&data);
    for constraint in catalog.iter() {
        let found = catalog.lookup(&data, &constraint.to_string()).unwrap();
        assert_eq!(found.signature(), constraint.signature());
    }
    assert_eq!(
        catalog.lookup(&data, "b = true").unwrap().value(),
        &AttributeValue::Boolean(true)
    );
}
