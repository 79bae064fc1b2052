use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use shuttle_tourney::{
    draw::{generate_knockout_draw, order_seeds},
    tournament::{Player, PlayerId},
};
use std::hint::black_box;

fn roster(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
        .collect()
}

/// Every fourth player seeded, with explicit numbers for half of them
fn seeded_roster(n: usize) -> (Vec<Player>, Vec<PlayerId>) {
    let mut players = roster(n);
    let mut seeds = Vec::new();
    for (i, player) in players.iter_mut().enumerate().filter(|(i, _)| i % 4 == 0) {
        if i % 8 == 0 {
            player.seed_number = Some((i / 8 + 1) as u32);
        }
        seeds.push(player.id.clone());
    }
    (players, seeds)
}

/// Benchmark draw generation for typical event sizes
fn bench_unseeded_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("unseeded_draw");

    // Power-of-two sizes need no byes; the odd sizes pad the most
    for n_players in [8, 17, 32, 65, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                let players = roster(n);
                let mut rng = StdRng::seed_from_u64(42);
                b.iter(|| generate_knockout_draw(black_box(&players), &[], &mut rng));
            },
        );
    }

    group.finish();
}

fn bench_seeded_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("seeded_draw");

    for n_players in [16, 64, 256].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                let (players, seeds) = seeded_roster(n);
                let mut rng = StdRng::seed_from_u64(42);
                b.iter(|| generate_knockout_draw(black_box(&players), black_box(&seeds), &mut rng));
            },
        );
    }

    group.finish();
}

/// Benchmark seed ordering on its own
fn bench_order_seeds(c: &mut Criterion) {
    let (players, seeds) = seeded_roster(256);

    c.bench_function("order_seeds_256_players", |b| {
        b.iter(|| order_seeds(black_box(&players), black_box(&seeds)));
    });
}

criterion_group!(draw_generation, bench_unseeded_draw, bench_seeded_draw);

criterion_group!(seeding, bench_order_seeds);

criterion_main!(draw_generation, seeding);
