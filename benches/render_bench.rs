use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mockchat::rendering::render_mockup;
use mockchat::theme::Theme;
use mockchat::{Sender, Session};

fn conversation(messages: usize) -> Session {
    let mut session = Session::new();
    for i in 0..messages {
        let sender = if i % 2 == 0 { Sender::Them } else { Sender::Me };
        session.append_stamped(sender, "The quick brown fox jumps over the lazy dog", "09:41");
    }
    session
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_mockup");
    for &count in &[2usize, 20, 100] {
        let session = conversation(count);
        group.bench_with_input(BenchmarkId::new("whatsapp", count), &session, |b, s| {
            b.iter(|| render_mockup(s).expect("render"))
        });
    }

    let mut discord = conversation(20);
    discord.set_theme(Theme::Discord);
    group.bench_with_input(BenchmarkId::new("discord", 20usize), &discord, |b, s| {
        b.iter(|| render_mockup(s).expect("render"))
    });
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
