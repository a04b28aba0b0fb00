use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use campus_core::CourseId;
use campus_infra::{CourseFilter, CourseStore, InMemoryCourseStore};
use campus_students::{CoursePatch, NewCourse};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

async fn seeded_store(count: usize) -> InMemoryCourseStore {
    let store = InMemoryCourseStore::new();
    for i in 0..count {
        store
            .create(NewCourse::new(Some(format!("course-{i}"))).unwrap())
            .await
            .unwrap();
    }
    store
}

fn bench_create_latency(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("course_create_latency");
    group.throughput(Throughput::Elements(1));

    let store = InMemoryCourseStore::new();
    group.bench_function("create", |b| {
        b.iter(|| {
            let course = NewCourse::new(Some(black_box("Python".to_string()))).unwrap();
            black_box(rt.block_on(store.create(course)).unwrap());
        });
    });

    group.finish();
}

fn bench_list_filters(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("course_list_filters");

    for row_count in [10usize, 100, 1000, 10000].iter() {
        let store = rt.block_on(seeded_store(*row_count));
        let middle = CourseId::new((*row_count as i64) / 2 + 1);

        group.bench_with_input(BenchmarkId::new("list_all", row_count), row_count, |b, _| {
            b.iter(|| black_box(rt.block_on(store.list(&CourseFilter::default())).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("filter_by_id", row_count), row_count, |b, _| {
            let filter = CourseFilter { id: Some(middle), name: None };
            b.iter(|| black_box(rt.block_on(store.list(&filter)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("filter_by_name", row_count), row_count, |b, _| {
            let filter = CourseFilter { id: None, name: Some("course-1".to_string()) };
            b.iter(|| black_box(rt.block_on(store.list(&filter)).unwrap()));
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("course_update");

    let store = rt.block_on(seeded_store(1000));
    group.bench_function("patch_name", |b| {
        b.iter(|| {
            let patch = CoursePatch::new(Some("django".to_string())).unwrap();
            black_box(rt.block_on(store.update(CourseId::new(500), patch)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_create_latency, bench_list_filters, bench_update);
criterion_main!(benches);
