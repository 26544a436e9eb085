use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use linkage_data::{Database, Object, Speaker, SpeakerId};
use linkage_lanes::{LocalizeLane, SpeakerLifecycle};
use std::hint::black_box;

/// One linked speaker shared by `owners` objects, alternating local and
/// library-owned, plus `noise` unrelated objects the owner scan has to skip.
fn shared_speaker(owners: usize, noise: usize) -> (Database, SpeakerId) {
    let mut db = Database::new();
    db.set_filepath("/proj/scene.blend");
    let lib = db.add_library("props", "/proj/libs/props.blend");
    let speaker = db.link(lib, Speaker::new("Speaker")).unwrap();

    for i in 0..owners {
        let obj = if i % 2 == 0 {
            db.add_object("Local").unwrap()
        } else {
            db.link(lib, Object::new("Linked")).unwrap()
        };
        db.assign_object_data(obj, Some(speaker)).unwrap();
    }
    for _ in 0..noise {
        db.add_object("Empty").unwrap();
    }
    (db, speaker)
}

fn bench_make_local(c: &mut Criterion) {
    let lane = LocalizeLane::default();
    let mut group = c.benchmark_group("Make Local");

    group.bench_function("Split (100 owners, 10k objects)", |b| {
        b.iter_batched(
            || shared_speaker(100, 10_000),
            |(mut db, speaker)| {
                let outcome = lane.make_local(&mut db, &SpeakerLifecycle, speaker);
                black_box(outcome)
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("Library only (10k objects)", |b| {
        let (mut db, speaker) = shared_speaker(0, 10_000);
        b.iter(|| black_box(lane.make_local(&mut db, &SpeakerLifecycle, speaker)));
    });

    group.finish();
}

criterion_group!(benches, bench_make_local);
criterion_main!(benches);
