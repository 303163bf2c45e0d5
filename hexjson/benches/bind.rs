//! Benchmark comparing a cached procedure against a fresh registry that has
//! to resolve and compile the type again.
//!
//! Run with:
//!   cargo bench -p hexjson --bench bind

use divan::{Bencher, black_box};
use hexjson::{Describe, JsonObject, Registry};

fn main() {
    divan::main();
}

// =============================================================================
// Test types
// =============================================================================

#[derive(Debug, Default, Describe)]
#[json(bind)]
struct Point {
    #[json(key = "x")]
    x: i32,
    #[json(key = "y")]
    y: i32,
}

#[derive(Debug, Default, Describe)]
#[json(bind)]
struct Company {
    #[json(key = "name")]
    name: String,
    #[json(key = "employees")]
    employees: Vec<Employee>,
    #[json(key = "headquarters")]
    headquarters: Point,
}

#[derive(Debug, Default, Describe)]
#[json(bind)]
struct Employee {
    #[json(key = "id")]
    id: u64,
    #[json(key = "name")]
    name: String,
    #[json(key = "email")]
    email: Option<String>,
    #[json(key = "salary")]
    salary: f64,
    #[json(key = "scores")]
    scores: Vec<i32>,
}

// =============================================================================
// Test data
// =============================================================================

const POINT_JSON: &str = r#"{"x": 10, "y": 20}"#;

const COMPANY_JSON: &str = r#"{
    "name": "Acme Corp",
    "employees": [
        {"id": 1, "name": "Alice", "email": "alice@example.com", "salary": 120000.0, "scores": [95, 87, 92]},
        {"id": 2, "name": "Bob", "salary": 90000.0, "scores": []},
        {"id": 3, "name": "Charlie", "email": null, "salary": 115000.0, "scores": [70]}
    ],
    "headquarters": {"x": 37, "y": -122}
}"#;

fn object(text: &str) -> JsonObject {
    hexjson::parse_object(text).unwrap()
}

// =============================================================================
// Benchmarks - Point (simple)
// =============================================================================

/// Procedure cached in the registry
#[divan::bench]
fn point_cached(bencher: Bencher) {
    let obj = object(POINT_JSON);
    let registry = Registry::new();
    registry.procedure::<Point>().unwrap();

    bencher.bench(|| {
        let result: Point = registry.deserialize(black_box(&obj)).unwrap();
        black_box(result)
    });
}

/// Resolve and compile every iteration
#[divan::bench]
fn point_fresh_registry(bencher: Bencher) {
    let obj = object(POINT_JSON);
    bencher.bench(|| {
        let registry = Registry::new();
        let result: Point = registry.deserialize(black_box(&obj)).unwrap();
        black_box(result)
    });
}

// =============================================================================
// Benchmarks - Company (nested)
// =============================================================================

/// Procedure cached in the registry
#[divan::bench]
fn company_cached(bencher: Bencher) {
    let obj = object(COMPANY_JSON);
    let registry = Registry::new();
    registry.procedure::<Company>().unwrap();

    bencher.bench(|| {
        let result: Company = registry.deserialize(black_box(&obj)).unwrap();
        black_box(result)
    });
}

/// Resolve and compile every iteration
#[divan::bench]
fn company_fresh_registry(bencher: Bencher) {
    let obj = object(COMPANY_JSON);
    bencher.bench(|| {
        let registry = Registry::new();
        let result: Company = registry.deserialize(black_box(&obj)).unwrap();
        black_box(result)
    });
}

/// Parse and bind through the global registry
#[divan::bench]
fn company_from_str(bencher: Bencher) {
    bencher.bench(|| {
        let result: Company = hexjson::from_str(black_box(COMPANY_JSON)).unwrap();
        black_box(result)
    });
}
