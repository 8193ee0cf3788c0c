use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::engine::{NoopReporter, SessionConfig, SessionEngine};
use quizforge_core::evaluator::{evaluate, parse_pairs, Answer};
use quizforge_core::model::{Difficulty, Question, QuestionKind, TextMatch};

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let text = Question::new(
        "Capital of Ukraine?",
        QuestionKind::text("Kyiv", TextMatch::Partial),
    )
    .unwrap();
    group.bench_function("text_partial", |b| {
        let answer = Answer::text("  ky ");
        b.iter(|| evaluate(black_box(&text), black_box(&answer)))
    });

    let multi = Question::new(
        "Pick the programming languages",
        QuestionKind::multiple_choice(vec!["Python", "C++", "HTML", "Java"], [0, 1]),
    )
    .unwrap();
    group.bench_function("multiple_choice", |b| {
        let answer = Answer::text("2, 1");
        b.iter(|| evaluate(black_box(&multi), black_box(&answer)))
    });

    let matching = Question::new(
        "Match the bodies",
        QuestionKind::matching([("Sun", "Star"), ("Moon", "Satellite"), ("Earth", "Planet")]),
    )
    .unwrap();
    group.bench_function("matching", |b| {
        let answer = Answer::Pairs(parse_pairs("Sun=star, Moon=satellite, Earth=planet"));
        b.iter(|| evaluate(black_box(&matching), black_box(&answer)))
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let pool: Vec<Question> = (0..60)
        .map(|i| {
            Question::new(format!("q{i}"), QuestionKind::rating(1, 5))
                .unwrap()
                .with_difficulty(Difficulty::new(i % 3 + 1).unwrap())
        })
        .collect();

    c.bench_function("adaptive_session_30_rounds", |b| {
        b.iter(|| {
            let mut engine = SessionEngine::seeded(7, SessionConfig::default());
            let mut ask = |_: &Question| Some(Answer::text("3"));
            engine
                .run(black_box(&pool), 30, &mut ask, &NoopReporter)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_session);
criterion_main!(benches);
