mod common;

use bigtext::Rope;
use common::{bench_sizes, floor_boundary, large, small};
use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, Criterion, criterion_group, criterion_main};
use rand::Rng;

const SENTENCE: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

fn bench_insert(group: &mut BenchmarkGroup<'_, WallTime>, insert: &str) {
    bench_sizes(group, |bench, s| {
        let mut rng = rand::rng();
        let mut r = Rope::from(s);
        bench.iter(|| {
            let at = floor_boundary(&r, rng.random_range(0..=r.byte_len()));
            r.insert(at, insert);
        });
    });
}

fn insert_char(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_char");
    bench_insert(&mut group, "a");
}

fn insert_combining_mark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_combining_mark");
    bench_insert(&mut group, "\u{301}");
}

fn insert_sentence(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_sentence");
    bench_insert(&mut group, SENTENCE);
}

fn insert_large(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_large");
    bench_insert(&mut group, &small());
}

fn insert_char_with_clone_around(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_char_with_clone_around");

    group.bench_function("large", |bench| {
        let mut rng = rand::rng();
        let mut r = Rope::from(large());
        let orig = r.clone();
        let mut insertions = 0;
        bench.iter(|| {
            let at = floor_boundary(&r, rng.random_range(0..=r.byte_len()));
            r.insert(at, "a");
            insertions += 1;
            if insertions == 64 {
                insertions = 0;
                r = orig.clone();
            }
        })
    });
}

fn bench_delete(group: &mut BenchmarkGroup<'_, WallTime>, delete_bytes: usize) {
    bench_sizes(group, |bench, s| {
        let mut rng = rand::rng();
        let mut r = Rope::from(s);
        let orig_len = r.byte_len();
        bench.iter(|| {
            let len = r.byte_len();
            let start = floor_boundary(&r, rng.random_range(0..=len));
            let end = floor_boundary(&r, start + delete_bytes);
            r.delete(start..end);

            if r.byte_len() < orig_len / 4 {
                r = Rope::from(s);
            }
        });
    });
}

fn delete_char(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_char");
    bench_delete(&mut group, "a".len());
}

fn delete_sentence(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_sentence");
    bench_delete(&mut group, SENTENCE.len());
}

fn bench_replace(group: &mut BenchmarkGroup<'_, WallTime>, replace: &str) {
    bench_sizes(group, |bench, s| {
        let mut rng = rand::rng();
        let mut r = Rope::from(s);
        bench.iter(|| {
            let len = r.byte_len();
            let start = floor_boundary(&r, rng.random_range(0..=len));
            let end = floor_boundary(&r, start + replace.len());
            r.replace(start..end, replace);
        });
    });
}

fn replace_char(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_char");
    bench_replace(&mut group, "a");
}

fn replace_sentence(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_sentence");
    bench_replace(&mut group, SENTENCE);
}

fn edit_through_sub_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_through_sub_view");

    group.bench_function("large", |bench| {
        let r = Rope::from(large());
        let characters = r.characters();
        let mut sub = characters.slice(
            characters.index_at_offset(1000)..characters.index_at_offset(2000),
        );
        bench.iter(|| {
            sub.push_str("e");
            sub.insert(sub.start_index(), "\u{301}");
        })
    });
}

criterion_group!(
    benches,
    insert_char,
    insert_combining_mark,
    insert_sentence,
    insert_large,
    insert_char_with_clone_around,
    delete_char,
    delete_sentence,
    replace_char,
    replace_sentence,
    edit_through_sub_view,
);

criterion_main!(benches);
