use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geostory_common::{value, Value};
use geostory_parser::{parse, resolve, PathCache};

fn sample_story(sections: usize) -> Value {
    let sections: Vec<Value> = (0..sections)
        .map(|i| {
            value!({
                "id": format!("section-{}", i),
                "type": "immersive",
                "contents": [
                    {"id": format!("col-{}", i), "type": "column", "contents": [{"id": "t", "type": "text"}]}
                ]
            })
        })
        .collect();
    value!({ "sections": sections.iter().map(Value::to_json).collect::<Vec<_>>() })
}

fn bench_parse(c: &mut Criterion) {
    let source = r#"sections[{"id":"section-42"}].contents[{"id":"col-42"}].contents[0].html"#;
    c.bench_function("parse predicate path", |b| b.iter(|| parse(black_box(source))));

    let cache = PathCache::new();
    c.bench_function("parse predicate path (cached)", |b| {
        b.iter(|| cache.parse(black_box(source)))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let story = sample_story(100);
    let path = parse(r#"sections[{"id":"section-99"}].contents[0].contents[0].type"#).unwrap();
    c.bench_function("resolve predicate path", |b| {
        b.iter(|| resolve(black_box(&story), black_box(&path)).found)
    });
}

criterion_group!(benches, bench_parse, bench_resolve);
criterion_main!(benches);
