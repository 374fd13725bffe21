/// Benchmark module for the ticket pipeline.
/// Measures workbook parsing, status resolution with date bucketing, and
/// cached re-runs over an unchanged upload set.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_xlsxwriter::Workbook;
use ticketdash::config::DashboardConfig;
use ticketdash::pipeline::{build_dashboard, load_uploads, run_pipeline, IngestCache};
use ticketdash::UploadedFile;

const STATUSES: [&str; 4] = ["OPEN", "RESOLVED", "CLOSED", "PENDING"];

/// Build a ticket export with `tickets` references, each with a short
/// status history spread over a year.
///
/// # Returns
/// * `UploadedFile` - The export as an in-memory `.xlsx` upload
fn generate_export(name: &str, tickets: usize) -> UploadedFile {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("-").unwrap();
    for (col, header) in ["Reference", "Status", "Date/Time Logged", "Date Resolved"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    let mut row = 1u32;
    for ticket in 0..tickets {
        let day = ticket % 365;
        let logged = format!("2023-{:02}-{:02} 09:00", day / 28 % 12 + 1, day % 28 + 1);
        for step in 0..(ticket % 3 + 1) {
            let status = STATUSES[(ticket + step) % STATUSES.len()];
            worksheet.write_string(row, 0, format!("T{}", ticket)).unwrap();
            worksheet.write_string(row, 1, status).unwrap();
            worksheet.write_string(row, 2, logged.as_str()).unwrap();
            if status != "OPEN" {
                worksheet.write_string(row, 3, logged.as_str()).unwrap();
            }
            row += 1;
        }
    }

    UploadedFile::new(name, workbook.save_to_buffer().unwrap())
}

/// Benchmark parsing and deduplicating uploads
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");
    group.sample_size(20);
    let uploads = vec![generate_export("a.xlsx", 2_000), generate_export("b.xlsx", 2_000)];

    group.bench_function("load_two_exports", |b| {
        b.iter(|| load_uploads(black_box(&uploads), "-").unwrap())
    });

    group.finish();
}

/// Benchmark status resolution and per-day counting
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let config = DashboardConfig::default();
    let table = load_uploads(&[generate_export("a.xlsx", 5_000)], "-").unwrap();

    group.bench_function("build_dashboard", |b| {
        b.iter(|| build_dashboard(black_box(&table), &config).unwrap())
    });

    group.finish();
}

/// Benchmark re-running the pipeline on an upload set already parsed
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_caching(c: &mut Criterion) {
    let mut group = c.benchmark_group("caching");
    let config = DashboardConfig::default();
    let uploads = vec![generate_export("a.xlsx", 2_000)];
    let mut cache = IngestCache::new(config.ingest_cache_capacity);

    // Pre-populate cache
    run_pipeline(&uploads, &config, &mut cache).unwrap();

    group.bench_function("cached_rerun", |b| {
        b.iter(|| run_pipeline(black_box(&uploads), &config, &mut cache).unwrap())
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_ingestion, bench_resolution, bench_caching
);
criterion_main!(benches);
