//! Performance benchmarks for rating calculations and match processing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use squad_ladder::config::AppConfig;
use squad_ladder::rating::{team_rating, EloRatingCalculator, RatingCalculator};
use squad_ladder::service::AppState;
use squad_ladder::types::{MatchReport, TeamId};

fn create_bench_system() -> (AppState, TeamId, TeamId) {
    let state = AppState::new(AppConfig::default()).unwrap();

    let ids: Vec<_> = (0..10)
        .map(|i| state.create_player(&format!("bench{}", i)).unwrap().id)
        .collect();
    let team_a = state.create_team("benchA", &ids[..5]).unwrap().id;
    let team_b = state.create_team("benchB", &ids[5..]).unwrap().id;

    (state, team_a, team_b)
}

fn bench_rating_calculations(c: &mut Criterion) {
    let calculator = EloRatingCalculator::default();
    let roster_a = [1500.0, 1600.0, 1400.0, 1550.0, 1450.0];
    let roster_b = [1520.0, 1480.0, 1610.0, 1390.0, 1500.0];

    c.bench_function("team_expected_scores", |b| {
        b.iter(|| {
            let rating_a = team_rating(black_box(&roster_a));
            let rating_b = team_rating(black_box(&roster_b));
            let expected = calculator.expected_score(rating_a, rating_b);
            let k = calculator.k_factor(black_box(750.0));
            calculator.updated_rating(roster_a[0], k, 1.0, expected)
        })
    });
}

fn bench_record_match(c: &mut Criterion) {
    let (state, team_a, team_b) = create_bench_system();

    let mut flip = false;
    c.bench_function("record_match", |b| {
        b.iter(|| {
            flip = !flip;
            let report = MatchReport {
                team1_id: team_a,
                team2_id: team_b,
                winning_team_id: Some(if flip { team_a } else { team_b }),
                duration: 1.0,
            };
            black_box(state.record_match(&report).unwrap())
        })
    });
}

fn bench_player_registration(c: &mut Criterion) {
    let state = AppState::new(AppConfig::default()).unwrap();

    let mut counter = 0u64;
    c.bench_function("create_player", |b| {
        b.iter(|| {
            counter += 1;
            black_box(state.create_player(&format!("player{}", counter)).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_rating_calculations,
    bench_record_match,
    bench_player_registration
);
criterion_main!(benches);
