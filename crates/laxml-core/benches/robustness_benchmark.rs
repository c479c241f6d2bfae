//! Benchmark parse speed and recovery on noisy inputs.
//!
//! A clean document is mutated with the kinds of damage the parser is
//! built to absorb (dropped closers, stray closers, truncation, broken
//! entities), then parsed; the invalid-tag count keeps the recovery path
//! honest.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SEED: u64 = 0x5eed;
const VARIANT_COUNT: usize = 12;
const MAX_MUTATION_STEPS: usize = 3;

const CLEAN_BASE: &str = r#"<feed version=2>
  <entry id=1 draft=false>
    <title>Recovery &amp; resilience</title>
    <body>Parsers <b>should not</b> give up.</body>
  </entry>
  <entry id=2 draft=true>
    <title>Spans</title>
    <body><![CDATA[raw < text > here]]></body>
    <!-- needs review -->
  </entry>
</feed>
"#;

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn choose(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

fn drop_first_closer(input: &str) -> String {
    match input.find("</") {
        Some(at) => {
            let end = input[at..].find('>').map(|rel| at + rel + 1).unwrap_or(input.len());
            format!("{}{}", &input[..at], &input[end..])
        }
        None => input.to_string(),
    }
}

fn insert_stray_closer(input: &str, rng: &mut Lcg) -> String {
    let mut at = rng.choose(input.len() + 1);
    while !input.is_char_boundary(at) {
        at -= 1;
    }
    format!("{}</ghost>{}", &input[..at], &input[at..])
}

fn truncate_tail(input: &str, rng: &mut Lcg) -> String {
    let keep = input.len() - rng.choose(input.len() / 4 + 1);
    let mut keep = keep.min(input.len());
    while !input.is_char_boundary(keep) {
        keep -= 1;
    }
    input[..keep].to_string()
}

fn break_entity(input: &str) -> String {
    input.replacen("&amp;", "&amp", 1)
}

fn apply_mutations(mut input: String, rng: &mut Lcg) -> String {
    for _ in 0..MAX_MUTATION_STEPS {
        input = match rng.choose(4) {
            0 => drop_first_closer(&input),
            1 => insert_stray_closer(&input, rng),
            2 => truncate_tail(&input, rng),
            _ => break_entity(&input),
        };
    }
    input
}

fn build_variants() -> Vec<String> {
    let mut rng = Lcg::new(SEED);
    let base = CLEAN_BASE.repeat(8);
    (0..VARIANT_COUNT)
        .map(|_| apply_mutations(base.clone(), &mut rng))
        .collect()
}

fn bench_noisy_parse(c: &mut Criterion) {
    let variants = build_variants();
    let total_bytes: usize = variants.iter().map(String::len).sum();

    let mut group = c.benchmark_group("noisy_parse");
    group.throughput(Throughput::Bytes(total_bytes as u64));

    group.bench_function("laxml_recovery", |b| {
        b.iter(|| {
            let mut invalid = 0usize;
            for variant in &variants {
                let doc = laxml_core::parse_text_only(black_box(variant));
                invalid += doc.invalid_tags().len();
            }
            invalid
        })
    });

    group.finish();
}

fn bench_pathological_inputs(c: &mut Criterion) {
    let cases: Vec<(&str, String)> = vec![
        ("angle_brackets", "<".repeat(4096)),
        ("ampersands", "&".repeat(4096)),
        ("unclosed_tags", "<a>".repeat(2048)),
        ("stray_closers", "</a>".repeat(2048)),
        ("truncated_comment", format!("<!--{}", "x".repeat(8192))),
    ];

    let mut group = c.benchmark_group("pathological");
    for (name, input) in &cases {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| laxml_core::parse_text_only(black_box(input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_noisy_parse, bench_pathological_inputs);
criterion_main!(benches);
