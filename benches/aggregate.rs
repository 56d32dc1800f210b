use biodiversity_rust::aggregate::group_and_count_unique;
use criterion::{criterion_group, criterion_main, Criterion};
use polars::prelude::*;

const CATEGORIES: &[&str] = &[
    "Mammal",
    "Bird",
    "Reptile",
    "Amphibian",
    "Fish",
    "Vascular Plant",
    "Nonvascular Plant",
];

const STATUSES: &[&str] = &[
    "No Intervention",
    "Species of Concern",
    "Threatened",
    "Endangered",
    "In Recovery",
];

fn synthetic_species(rows: usize) -> DataFrame {
    let category: Vec<&str> = (0..rows).map(|i| CATEGORIES[i % CATEGORIES.len()]).collect();
    let status: Vec<&str> = (0..rows).map(|i| STATUSES[i % STATUSES.len()]).collect();
    // Roughly 4 rows per distinct name, so the distinct count does real work
    let name: Vec<String> = (0..rows)
        .map(|i| format!("Species {}", i % (rows / 4 + 1)))
        .collect();

    df!(
        "category" => category,
        "conservation_status" => status,
        "scientific_name" => name,
    )
    .unwrap()
}

fn bench_group_and_count_unique(c: &mut Criterion) {
    let species = synthetic_species(10_000);

    c.bench_function("group_and_count_unique/status/10k", |b| {
        b.iter(|| {
            group_and_count_unique(&species, &["conservation_status"], "scientific_name").unwrap()
        })
    });

    c.bench_function("group_and_count_unique/category_protection/10k", |b| {
        b.iter(|| {
            group_and_count_unique(
                &species,
                &["category", "conservation_status"],
                "scientific_name",
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_group_and_count_unique);
criterion_main!(benches);
