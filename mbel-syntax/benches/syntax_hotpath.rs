use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mbel_syntax::{parse, tokenize};

const BANK: &str = r#"§MBEL:5.0

[FOCUS]
@active::ParserRewrite⚡

[ARCHITECTURE]
@feature{Core}->files[src/core.ts]->tests[tests/core.test.ts]
@feature{Lexer}->files[src/lexer.ts]->tests[tests/lexer.test.ts]->depends[Core]
@feature{Parser}->files[src/parser.ts]->tests[tests/parser.test.ts]->depends[Lexer]->entryPoint{src/parser.ts:parse:10}
@feature{Engine}->files[src/engine.ts]->tests[tests/engine.test.ts]->depends[Parser,Core]

@entry::src/index.ts
  ->description::Main entry point
@hotspot::src/parser.ts

@critical::src/core.ts
  ->dependents[src/lexer.ts,src/parser.ts]
  ->changes::21

@2024-01-15::UseAdjacencyLists
  ->status::ACTIVE
  ->reason::avoids cyclic ownership

@Parser::tokenize
  ->does::splits source into tokens
  ->doesNot::resolve references
"#;

fn bench_lexer(c: &mut Criterion) {
    c.bench_function("syntax/tokenize_bank", |b| {
        b.iter(|| {
            let (tokens, errors) = tokenize(black_box(BANK));
            black_box((tokens.len(), errors.len()));
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("syntax/parse_bank", |b| {
        b.iter(|| {
            let result = parse(black_box(BANK));
            black_box(result.document.statements.len());
        });
    });
}

criterion_group!(benches, bench_lexer, bench_parse);
criterion_main!(benches);
