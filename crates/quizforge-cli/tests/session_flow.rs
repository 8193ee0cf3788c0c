//! End-to-end session tests over the sample banks.
//!
//! These tests drive the engine through the public API: bank loading,
//! adaptive selection, evaluation, history recording and statistics.

use std::collections::HashSet;
use std::path::Path;

use quizforge_core::bank::Library;
use quizforge_core::engine::NoopReporter;
use quizforge_core::parser;
use quizforge_core::report::SessionHistory;
use quizforge_core::statistics::ScoringAggregator;
use quizforge_core::traits::{ResultSink, ScriptedAnswers};
use quizforge_core::{
    Answer, Difficulty, Question, QuestionKind, SessionConfig, SessionEngine, SessionMode,
    SessionOutcome,
};

fn load_geography() -> quizforge_core::bank::QuestionBank {
    parser::parse_bank(Path::new("../../question-banks/geography.toml")).unwrap()
}

/// Answers every question in the bank correctly.
fn oracle(question: &Question) -> Option<Answer> {
    Some(match question.kind() {
        QuestionKind::Text { expected, .. } => Answer::text(expected.clone()),
        QuestionKind::SingleChoice { correct_index, .. } => {
            Answer::text((correct_index + 1).to_string())
        }
        QuestionKind::MultipleChoice {
            correct_indices, ..
        } => Answer::text(
            correct_indices
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(","),
        ),
        QuestionKind::Rating { min, .. } => Answer::text(min.to_string()),
        QuestionKind::Matching { pairs } => Answer::Pairs(pairs.clone()),
    })
}

fn wrong(_: &Question) -> Option<Answer> {
    Some(Answer::text("definitely not it"))
}

// --- Adaptive selection ---

#[test]
fn perfect_taker_reaches_hardest_level() {
    let bank = load_geography();

    for seed in 0..10 {
        let mut engine = SessionEngine::seeded(seed, SessionConfig::default());
        let record = engine
            .run(bank.questions(), 6, &mut oracle, &NoopReporter)
            .unwrap();

        assert_eq!(record.outcome, SessionOutcome::Completed);
        assert_eq!(record.correct_count(), 6);
        assert_eq!(record.final_level, Difficulty::HARD);

        let levels: Vec<u8> = record.rounds.iter().map(|r| r.level.get()).collect();
        assert_eq!(levels, vec![1, 2, 3, 3, 3, 3]);
        for round in &record.rounds[..5] {
            assert_eq!(round.difficulty, round.level, "seed {seed}");
        }
    }
}

#[test]
fn struggling_taker_stays_easy() {
    let bank = load_geography();
    let mut engine = SessionEngine::seeded(11, SessionConfig::default());
    let record = engine
        .run(bank.questions(), 3, &mut wrong, &NoopReporter)
        .unwrap();

    assert_eq!(record.correct_count(), 0);
    assert!(record.rounds.iter().all(|r| r.difficulty == Difficulty::EASY));
    assert_eq!(record.final_level, Difficulty::EASY);
}

#[test]
fn long_session_exhausts_bank_without_repeats() {
    let bank = load_geography();
    let mut engine = SessionEngine::seeded(5, SessionConfig::default());
    let record = engine
        .run(bank.questions(), 50, &mut oracle, &NoopReporter)
        .unwrap();

    assert_eq!(record.outcome, SessionOutcome::PoolExhausted);
    assert_eq!(record.len(), bank.len());
    let ids: HashSet<_> = record.rounds.iter().map(|r| &r.question_id).collect();
    assert_eq!(ids.len(), bank.len());
}

#[test]
fn linear_mode_follows_bank_order() {
    let bank = load_geography();
    let config = SessionConfig {
        mode: SessionMode::Linear,
        bank_id: Some(bank.id.clone()),
    };
    let mut script = ScriptedAnswers::new([Answer::text("1"), Answer::text("atlantic")]);
    let mut engine = SessionEngine::seeded(0, config);
    let record = engine
        .run(bank.questions(), 5, &mut script, &NoopReporter)
        .unwrap();

    assert_eq!(
        script.asked(),
        [
            "What is the capital of France?",
            "Which ocean is the largest?",
            "How many continents are there?",
        ]
    );
    assert_eq!(record.outcome, SessionOutcome::Aborted);
    assert_eq!(record.len(), 2);
    assert_eq!(record.correct_count(), 1);
    assert_eq!(record.bank_id.as_deref(), Some("geography"));
}

// --- Recording and statistics ---

#[test]
fn sessions_flow_into_history_and_statistics() {
    let bank = load_geography();
    let mut history = SessionHistory::new();
    let mut aggregator = ScoringAggregator::new();

    let mut engine = SessionEngine::seeded(
        2,
        SessionConfig {
            mode: SessionMode::Adaptive,
            bank_id: Some(bank.id.clone()),
        },
    );
    let good = engine
        .run(bank.questions(), 4, &mut oracle, &NoopReporter)
        .unwrap();
    let bad = engine
        .run(bank.questions(), 4, &mut wrong, &NoopReporter)
        .unwrap();

    for record in [&good, &bad] {
        history.accept(record).unwrap();
        aggregator.accept(record).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    history.save_json(&path).unwrap();
    let reloaded = SessionHistory::load_json(&path).unwrap();

    let stats = reloaded.stats();
    assert_eq!(stats.sessions, 2);
    assert_eq!(stats.total_rounds, 8);
    assert_eq!(stats.total_correct, 4);
    assert_eq!(stats.best_score, 4);
    assert!((stats.accuracy - 0.5).abs() < 1e-9);
    assert_eq!(reloaded.for_bank("geography").count(), 2);

    let live = aggregator.stats();
    assert_eq!(live.total_correct, stats.total_correct);
    assert_eq!(live.per_difficulty.len(), stats.per_difficulty.len());
}

// --- Bank editing ---

#[test]
fn edited_bank_survives_a_write_and_reload() {
    let mut library = Library::from_banks(
        parser::load_banks(Path::new("../../question-banks")).unwrap(),
    );
    assert_eq!(library.banks().len(), 2);

    let bank = library.find_mut("WORLD GEOGRAPHY").unwrap();
    let extra = Question::new(
        "Which desert is the largest hot desert?",
        QuestionKind::text("Sahara", Default::default()),
    )
    .unwrap()
    .with_topic("deserts")
    .with_difficulty(Difficulty::MEDIUM);
    bank.add(extra);
    bank.edit_difficulty(0, Difficulty::HARD).unwrap();
    assert!(bank.edit_prompt(0, "   ").is_err());
    bank.sort_by_difficulty();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geography.toml");
    parser::write_bank(bank, &path).unwrap();

    let reloaded = parser::parse_bank(&path).unwrap();
    assert_eq!(reloaded.len(), 10);
    assert_eq!(reloaded.search("hot desert").len(), 1);
    assert_eq!(reloaded.max_difficulty(), Some(Difficulty::HARD));
    assert_eq!(reloaded.filter_by_topic("capitals").len(), 4);
    assert_eq!(library.global_search("desert").len(), 1);
}
