use std::io::Write;

use super::*;
use subgroupforge_core::AttributeValue;

const MIXED: &str = "\
% customer sample
@relation 'customers'

@attribute age numeric
@attribute 'favourite colour' {red,blue,green}
@attribute seen {'2020-01-01 00:00:00','2020-02-01 12:30:00.250'}
@attribute id {7c9e6679-7425-40de-944b-e07fc1f90ae7}
@attribute churn {0,1}

@data
23,red,'2020-01-01 00:00:00',7c9e6679-7425-40de-944b-e07fc1f90ae7,1
?,'blue','2020-02-01 12:30:00.250',8c9e6679-7425-40de-944b-e07fc1f90ae7,0
% trailing comment
51.5,?,?,?,1
";

#[test]
fn test_detects_every_type() {
    let data = load_arff_str(MIXED, &LoadOptions::default()).unwrap();
    assert_eq!(data.relation(), "customers");
    assert_eq!(data.row_count(), 3);

    let kinds: Vec<(&str, AttributeType)> = data
        .attributes()
        .iter()
        .map(|a| (a.name(), a.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("age", AttributeType::Numeric),
            ("favourite colour", AttributeType::Categorical),
            ("seen", AttributeType::Date),
            ("id", AttributeType::Identifier),
            ("churn", AttributeType::Boolean),
        ]
    );
}

#[test]
fn test_values_and_missing_tokens() {
    let data = load_arff_str(MIXED, &LoadOptions::default()).unwrap();
    let age = data.attribute(0);
    assert_eq!(age.value_at(0).as_numeric(), Some(23.0));
    assert!(age.value_at(1).is_missing());
    assert_eq!(age.value_at(2).as_numeric(), Some(51.5));

    let colour = data.attribute(1);
    assert!(matches!(colour.value_at(1), AttributeValue::Category(c) if c == "blue"));
    assert!(colour.value_at(2).is_missing());

    assert!(data.attribute(2).value_at(2).is_missing());
    assert!(data.attribute(3).value_at(2).is_missing());
    assert!(matches!(data.attribute(4).value_at(1), AttributeValue::Boolean(false)));
    assert_eq!(data.index(0).missing_rows().len(), 1);
}

#[test]
fn test_blacklisted_attributes_are_skipped() {
    let options = LoadOptions::default().with_blacklist(["id", "unknown"]);
    let data = load_arff_str(MIXED, &options).unwrap();
    assert_eq!(data.attributes().len(), 4);
    assert_eq!(data.attribute_id("id"), None);
    assert_eq!(data.attribute_id("churn"), Some(3));
}

#[test]
fn test_blacklist_skips_unparseable_cells() {
    let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1,oops\n2,3\n";
    assert!(load_arff_str(text, &LoadOptions::default()).is_err());

    let options = LoadOptions::default().with_blacklist(["b"]);
    let data = load_arff_str(text, &options).unwrap();
    assert_eq!(data.row_count(), 2);
}

#[test]
fn test_quoted_commas_stay_in_one_cell() {
    let text = "@relation r\n@attribute s string\n@attribute n numeric\n@data\n'a, b',1\n";
    let data = load_arff_str(text, &LoadOptions::default()).unwrap();
    assert!(matches!(data.attribute(0).value_at(0), AttributeValue::Category(c) if c == "a, b"));
}

#[test]
fn test_error_line_numbers() {
    let cases = [
        ("@relation r\n@attribute a numeric\n@data\n1\nx\n", 5),
        ("@relation r\n@attribute a numeric\n@data\n1,2\n", 4),
        ("@relation r\n@attribute a blob\n@data\n", 2),
        ("@relation r\n@attribute a numeric\n1\n", 3),
        ("@relation r\n@data\n", 2),
        ("@relation r\n@attribute a numeric\n@attribute a numeric\n", 3),
        ("@relation r\n@attribute a numeric\n\n", 3),
    ];
    for (text, expected) in cases {
        match load_arff_str(text, &LoadOptions::default()) {
            Err(SubgroupError::Parse { line, .. }) => assert_eq!(line, expected, "{text:?}"),
            other => panic!("expected parse error for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MIXED.as_bytes()).unwrap();
    let data = load_arff_file(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(data.row_count(), 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_arff_file(dir.path().join("absent.arff"), &LoadOptions::default());
    assert!(matches!(result, Err(SubgroupError::Io(_))));
}
