use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use taskboard_core::completion::CompletionMap;
use taskboard_core::filter::{FilterCriteria, StatusFilter, TimeWindow, apply_filters, subject_options};
use taskboard_core::fingerprint::fingerprint;
use taskboard_core::model::{Day, Task};
use taskboard_core::timeago::Locale;
use taskboard_core::view::{ViewContext, build_view};

const SIZES: [usize; 3] = [50, 500, 5_000];
const SUBJECTS: [&str; 6] = ["Math", "Physics", "Chemistry", "ریاضی", "ادبیات", "Art"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .expect("valid date")
}

fn board(size: usize) -> Vec<Task> {
    (0..size)
        .map(|i| {
            let day = Day::ALL[i % Day::ALL.len()];
            let age = i64::try_from(i * 997 % 1_209_600).expect("fits");
            Task::new(SUBJECTS[i % SUBJECTS.len()])
                .with_day(day.label())
                .with_description(format!("Exercise set {i}"))
                .with_created_at((now() - Duration::seconds(age)).to_rfc3339())
        })
        .collect()
}

fn completed_every_third(tasks: &[Task]) -> CompletionMap {
    tasks
        .iter()
        .step_by(3)
        .map(|task| (fingerprint(task).into_string(), true))
        .collect()
}

fn bench_filter_group_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.render");
    let criteria = FilterCriteria {
        window: TimeWindow::LastWeek,
        status: StatusFilter::Pending,
        ..FilterCriteria::default()
    };

    for size in SIZES {
        let tasks = board(size);
        let completed = completed_every_third(&tasks);
        let subjects = subject_options(&tasks);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tasks, |b, tasks| {
            b.iter(|| {
                let visible = apply_filters(tasks, &criteria, &completed, now());
                let view = build_view(
                    visible,
                    ViewContext {
                        completed: &completed,
                        subjects: &subjects,
                        criteria: &criteria,
                        now: now(),
                        locale: Locale::Persian,
                    },
                );
                black_box(view.task_count())
            });
        });
    }

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let tasks = board(500);
    c.bench_function("fingerprint.500", |b| {
        b.iter(|| tasks.iter().map(fingerprint).map(|fp| fp.as_str().len()).sum::<usize>());
    });
}

criterion_group!(benches, bench_filter_group_view, bench_fingerprint);
criterion_main!(benches);
