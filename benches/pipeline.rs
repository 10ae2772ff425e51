use criterion::{Criterion, criterion_group, criterion_main};
use spend_bench::{
    cascade::{self, Selection},
    config::RoleConfig,
    data::Table,
    io_utils::RawTable,
    normalize::normalize,
    search::search,
    sourcing::benchmark,
    summary::summarize,
};

const FAMILIES: [&str; 4] = ["Engine", "Body", "Brakes", "Electrical"];
const MODELS: [&str; 5] = ["Sedan X", "SUV Y", "Hatch Z", "Truck T", "Van V"];
const VENDORS: [&str; 6] = ["Acme", "Bharat", "Core", "Delta", "Echo", "Fenix"];

fn generate_table(rows: usize) -> Table {
    let headers = [
        "Part Family",
        "Vehicle Model",
        "PartNo",
        "Vendor",
        "PO Price",
        "RMRatePerKg",
        "GrossWeight",
        "Plant",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    let data = (0..rows)
        .map(|i| {
            vec![
                FAMILIES[i % FAMILIES.len()].to_string(),
                MODELS[(i / 3) % MODELS.len()].to_string(),
                format!("P-{:04}", i % 250),
                VENDORS[(i / 7) % VENDORS.len()].to_string(),
                ((i * 37) % 900).to_string(),
                ((i * 11) % 120).to_string(),
                format!("{}.{}", i % 9, i % 10),
                if i % 2 == 0 { "Pune" } else { "Hosur" }.to_string(),
            ]
        })
        .collect();
    normalize(&RawTable::new(headers, data), &RoleConfig::default()).expect("normalize")
}

fn bench_pipeline(c: &mut Criterion) {
    let table = generate_table(50_000);
    let selection = Selection::family("Engine").with_model("SUV Y");

    c.bench_function("cascade_family_model", |b| {
        b.iter(|| cascade::apply(&table, &selection).expect("scope"))
    });

    let scope = cascade::apply(&table, &selection).expect("scope").scope;
    c.bench_function("summarize_scope", |b| b.iter(|| summarize(&scope)));
    c.bench_function("benchmark_scope", |b| b.iter(|| benchmark(&scope)));
    c.bench_function("search_full_table", |b| b.iter(|| search(&table, "delta")));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
