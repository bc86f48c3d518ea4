use chisel_jsonstream::lexer::{Lexer, Token};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

mod support;

fn lex(doc: &str) -> usize {
    let mut lexer = Lexer::new(doc.chars());
    let mut count = 0;
    loop {
        let token = match lexer.read_next_token() {
            Ok(token) => token,
            Err(err) => {
                println!("error occurred: {:?}", err);
                break;
            }
        };
        let consumed = match token {
            Token::EndOfDocument => break,
            Token::Str => lexer.read_string().map(|_| ()),
            Token::Number => lexer.read_number().map(|_| ()),
            Token::Boolean => lexer.read_boolean().map(|_| ()),
            Token::Null => lexer.read_null(),
            _ => Ok(()),
        };
        if let Err(err) = consumed {
            println!("error occurred: {:?}", err);
            break;
        }
        count += 1;
    }
    count
}

fn benchmark_records(c: &mut Criterion) {
    let doc = support::generated_document(10_000);
    c.bench_function("lex of large records", |b| b.iter(|| lex(black_box(&doc))));
}

fn benchmark_numbers(c: &mut Criterion) {
    let numbers: Vec<String> = (0..10_000)
        .map(|i| format!("{}.{}e{}", i, i * 7, i % 300))
        .collect();
    let doc = format!("[{}]", numbers.join(","));
    c.bench_function("lex of floats", |b| b.iter(|| lex(black_box(&doc))));
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = benchmark_records, benchmark_numbers
}
criterion_main!(benches);
