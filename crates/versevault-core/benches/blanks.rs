use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use versevault_core::blanks::{build_prompt, choose_blanks, score_answers};

const JOHN_3_16: &str = "For God so loved the world, that he gave his only begotten Son, \
that whosoever believeth in him should not perish, but have everlasting life.";

const PSALM_23: &str = "The Lord is my shepherd; I shall not want. He maketh me to lie down \
in green pastures: he leadeth me beside the still waters. He restoreth my soul: he leadeth me \
in the paths of righteousness for his name's sake.";

fn bench_choose_blanks(c: &mut Criterion) {
    let mut group = c.benchmark_group("choose_blanks");
    let mut rng = StdRng::seed_from_u64(42);

    group.bench_function("n=25", |b| {
        b.iter(|| choose_blanks(&mut rng, black_box(25)))
    });

    group.bench_function("n=200", |b| {
        b.iter(|| choose_blanks(&mut rng, black_box(200)))
    });

    group.finish();
}

fn bench_prompt_and_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt");

    group.bench_function("build_john_3_16", |b| {
        b.iter(|| build_prompt(black_box(JOHN_3_16), black_box(&[2, 5, 11, 19, 24])))
    });

    let prompt = build_prompt(PSALM_23, &[1, 4, 9, 17, 22, 30, 38]);
    let answers: Vec<String> = prompt
        .answers
        .iter()
        .map(|a| format!(" {}. ", a.expected.to_uppercase()))
        .collect();

    group.bench_function("score_psalm_23", |b| {
        b.iter(|| score_answers(black_box(&prompt.answers), black_box(&answers)))
    });

    group.finish();
}

criterion_group!(benches, bench_choose_blanks, bench_prompt_and_score);
criterion_main!(benches);
