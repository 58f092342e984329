//! A small dataset covering every attribute type.

use subgroupforge_core::{Attribute, AttributeType, Dataset};

const IDS: [&str; 6] = [
    "7c9e6679-7425-40de-944b-e07fc1f90ae7",
    "8c9e6679-7425-40de-944b-e07fc1f90ae7",
    "9c9e6679-7425-40de-944b-e07fc1f90ae7",
    "ac9e6679-7425-40de-944b-e07fc1f90ae7",
    "bc9e6679-7425-40de-944b-e07fc1f90ae7",
    "cc9e6679-7425-40de-944b-e07fc1f90ae7",
];

/// Six rows; `age` and `colour` each have one missing value, `churn` is the target.
pub fn mixed_dataset() -> Dataset {
    let seen = [
        "2020-01-01 00:00:00",
        "2020-02-01 00:00:00",
        "2020-03-01 00:00:00",
        "2020-04-01 00:00:00",
        "2020-05-01 00:00:00",
        "2020-06-01 12:30:00.250000",
    ];
    Dataset::new(
        "mixed",
        vec![
            Attribute::numeric("age", &[Some(23.0), Some(35.0), None, Some(51.0), Some(35.0), Some(62.0)]),
            Attribute::categorical(
                "colour",
                &[Some("red"), Some("blue"), Some("red"), None, Some("green"), Some("blue")],
            ),
            Attribute::from_raw("seen", AttributeType::Date, &seen).expect("valid dates"),
            Attribute::from_raw("id", AttributeType::Identifier, &IDS).expect("valid uuids"),
            Attribute::boolean(
                "churn",
                &[Some(true), Some(false), Some(true), Some(false), Some(false), Some(true)],
            ),
        ],
    )
    .expect("mixed dataset is well formed")
}
