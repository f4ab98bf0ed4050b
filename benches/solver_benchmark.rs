use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ordered_task::geom::FlatProjection;
use ordered_task::geopoint;
use ordered_task::measurements::Length;
use ordered_task::oz::ObservationZone;
use ordered_task::settings::OrderedTaskSettings;
use ordered_task::solver::{MaxDistanceSolver, MinDistanceSolver};
use ordered_task::task_point::{IntermediateKind, TaskPoint, TaskPointKind};
use ordered_task::waypoint::Waypoint;

fn racing_leg(ident: &str, lat: f64, lon: f64, kind: TaskPointKind) -> TaskPoint {
    TaskPoint::new(Waypoint::new(ident, geopoint!(lat, lon)), ObservationZone::cylinder(Length::m(500.0)).unwrap(), kind)
}

fn aat_leg(ident: &str, lat: f64, lon: f64) -> TaskPoint {
    TaskPoint::new(
        Waypoint::new(ident, geopoint!(lat, lon)),
        ObservationZone::keyhole(Length::m(500.0), Length::m(30_000.0)).unwrap(),
        TaskPointKind::Intermediate(IntermediateKind::Aat),
    )
}

fn wire(points: &mut [TaskPoint], projection: &FlatProjection) {
    let locations: Vec<_> = points.iter().map(TaskPoint::location).collect();
    for (i, tp) in points.iter_mut().enumerate() {
        let prev = i.checked_sub(1).map(|j| locations[j]);
        let next = locations.get(i + 1).copied();
        tp.set_neighbours(prev, next);
        tp.update_oz(projection);
    }
}

fn six_point_aat() -> (Vec<TaskPoint>, FlatProjection) {
    let mut points = vec![racing_leg("S", 51.0, 10.0, TaskPointKind::Start)];
    for i in 0..4 {
        points.push(aat_leg("A", 51.0 + i as f64 * 0.3, 10.0 + i as f64 * 0.4));
    }
    points.push(racing_leg("F", 51.0, 10.0, TaskPointKind::Finish));
    let projection = FlatProjection::from_points(points.iter().map(TaskPoint::location));
    wire(&mut points, &projection);
    (points, projection)
}

fn thirteen_point_racing() -> (Vec<TaskPoint>, FlatProjection) {
    let mut points = vec![racing_leg("S", 51.0, 10.0, TaskPointKind::Start)];
    for i in 0..11 {
        points.push(racing_leg("T", 51.0 + (i as f64 * 0.2).sin(), 10.0 + i as f64 * 0.25, TaskPointKind::Intermediate(IntermediateKind::Racing)));
    }
    points.push(racing_leg("F", 51.0, 10.0, TaskPointKind::Finish));
    let projection = FlatProjection::from_points(points.iter().map(TaskPoint::location));
    wire(&mut points, &projection);
    (points, projection)
}

fn bench_max_distance_aat(c: &mut Criterion) {
    let settings = OrderedTaskSettings::default();
    let mut group = c.benchmark_group("DistanceMax, 6-point AAT");

    group.bench_function("nominal boundary", |b| {
        b.iter(|| {
            let (mut points, projection) = six_point_aat();
            black_box(MaxDistanceSolver::new().scan(&mut points, &projection, &settings, false))
        })
    });

    group.bench_function("pruned boundary", |b| {
        b.iter(|| {
            let (mut points, projection) = six_point_aat();
            let sample = geopoint!(51.6, 11.0);
            for tp in points.iter_mut() {
                tp.update_sample_near(ordered_task::aircraft::AircraftState {
                    location: sample,
                    ..Default::default()
                });
            }
            black_box(MaxDistanceSolver::new().scan(&mut points, &projection, &settings, true))
        })
    });

    group.finish();
}

fn bench_min_distance_13_point(c: &mut Criterion) {
    let settings = OrderedTaskSettings::default();
    let (mut points, projection) = thirteen_point_racing();
    let aircraft = geopoint!(51.05, 10.1);

    c.bench_function("DistanceMin, 13-point racing task", |b| {
        b.iter(|| {
            let mut solver = MinDistanceSolver::new();
            black_box(solver.scan(aircraft, 0, &mut points, &projection, &settings, true))
        })
    });
}

criterion_group!(benches, bench_max_distance_aat, bench_min_distance_13_point);
criterion_main!(benches);
