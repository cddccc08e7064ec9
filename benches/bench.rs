// Criterion benchmarks for the commute planner

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use commute_planner::core::{distance::geodesic_distance_km, mode::select_mode, CarpoolMatcher, KMeans};
use commute_planner::models::{CommutePreferences, Commuter, Coordinate, Roster, WeatherCondition, WeatherSnapshot};

fn create_commuter(id: u32) -> Commuter {
    let offset = (id % 50) as f64 * 0.002;
    let northbound = id % 2 == 0;
    let (home_lat, work_lat) = if northbound { (12.90, 13.05) } else { (13.05, 12.90) };

    Commuter {
        id,
        home: Coordinate { latitude: home_lat + offset, longitude: 77.58 + offset },
        work: Coordinate { latitude: work_lat - offset, longitude: 77.62 - offset },
        preferences: CommutePreferences {
            prefers_biking: id % 3 == 0,
            prefers_walking: id % 5 == 0,
            prefers_carpool: id % 2 == 1,
        },
    }
}

fn create_roster(size: u32) -> Roster {
    Roster::new((1..=size).map(create_commuter).collect()).unwrap()
}

fn bench_geodesic_distance(c: &mut Criterion) {
    let home = Coordinate { latitude: 12.97, longitude: 77.59 };
    let work = Coordinate { latitude: 12.93, longitude: 77.61 };

    c.bench_function("geodesic_distance_km", |b| {
        b.iter(|| geodesic_distance_km(black_box(&home), black_box(&work)));
    });
}

fn bench_select_mode(c: &mut Criterion) {
    let preferences = CommutePreferences {
        prefers_biking: true,
        prefers_walking: true,
        prefers_carpool: true,
    };
    let weather = WeatherSnapshot::new(WeatherCondition::Clear, 26.0);

    c.bench_function("select_mode", |b| {
        b.iter(|| select_mode(black_box(&preferences), black_box(&weather), black_box(4.93)));
    });
}

fn bench_carpool_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("carpool_matching");
    let matcher = CarpoolMatcher::default();

    for size in [4u32, 20, 100] {
        let roster = create_roster(size);
        let query = Commuter {
            id: roster.next_id(),
            ..create_commuter(1)
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| matcher.find_matches(black_box(&roster), black_box(&query)));
        });
    }

    group.finish();
}

fn bench_kmeans_single_init(c: &mut Criterion) {
    let features: Vec<[f64; 4]> = (1..=100).map(|id| create_commuter(id).features()).collect();
    let kmeans = KMeans::new(2).with_n_init(1);

    c.bench_function("kmeans_single_init_100", |b| {
        b.iter(|| kmeans.fit(black_box(&features)));
    });
}

criterion_group!(
    benches,
    bench_geodesic_distance,
    bench_select_mode,
    bench_carpool_matching,
    bench_kmeans_single_init
);
criterion_main!(benches);
