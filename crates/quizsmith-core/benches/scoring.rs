use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizsmith_core::model::Question;
use quizsmith_core::scoring::score;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("Question {i}"),
                ["A) one", "B) two", "C) three", "D) four"].map(String::from),
                ["A", "B", "C", "D"][i % 4],
            )
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    let ten = make_questions(10);
    let ten_answers: Vec<&str> = ten.iter().map(|q| q.correct_answer.as_str()).collect();

    let large = make_questions(10_000);
    let large_answers: Vec<&str> = (0..large.len()).map(|i| ["A", "C"][i % 2]).collect();

    group.bench_function("ten_all_correct", |b| {
        b.iter(|| score(black_box(&ten), black_box(&ten_answers)))
    });

    group.bench_function("10k_mixed", |b| {
        b.iter(|| score(black_box(&large), black_box(&large_answers)))
    });

    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
