use surpresinhas::engine::{apply_seed, draw_combinations, PoolBuilder};
use surpresinhas::storage::{HistoryStore, SnapshotCache};
use surpresinhas::types::{Game, Pool, ProvenanceMode, ProvenanceSource};

use crate::mock_fetcher::{Failure, MockFetcher};

/// Ten Mega-Sena draws (2741..=2750); 7 appears in eight of them and 13 in none.
fn mega_draws() -> Vec<(u32, Vec<u8>)> {
    (0..10u8)
        .map(|i| {
            let mut numbers: Vec<u8> = (0..5).map(|j| 14 + i * 4 + j).collect();
            numbers.push(if i < 8 { 7 } else { 8 });
            (2741 + u32::from(i), numbers)
        })
        .collect()
}

fn loto_draws() -> Vec<(u32, Vec<u8>)> {
    (0..7u32)
        .map(|i| (3300 + i, (1..=15).collect()))
        .collect()
}

fn builder(fetcher: &MockFetcher, dir: &std::path::Path) -> PoolBuilder {
    PoolBuilder::new(Box::new(fetcher.clone()), SnapshotCache::new(dir))
}

fn covers_range(pool: &Pool) -> bool {
    pool.game().number_range().all(|n| pool.weight_of(n) >= 1)
}

#[tokio::test]
async fn online_pool_weights_recent_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::MegaSena, mega_draws());
    let (pool, prov) = builder(&fetcher, dir.path()).build_pool(Game::MegaSena).await;

    assert_eq!(prov.mode, ProvenanceMode::Online);
    assert_eq!(prov.source, ProvenanceSource::LiveApi);
    assert_eq!(pool.len(), 60 + 60);
    // Eight draws plus the uniform tail.
    assert_eq!(pool.weight_of(7), 9);
    assert_eq!(pool.weight_of(13), 1);
    assert!(covers_range(&pool));
    // latest_draw_id + ten draws, nothing more.
    assert_eq!(fetcher.requests(), 11);
}

#[tokio::test]
async fn lotofacil_uses_five_most_recent_draws() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::Lotofacil, loto_draws());
    let (pool, _) = builder(&fetcher, dir.path()).build_pool(Game::Lotofacil).await;

    assert_eq!(fetcher.requests(), 1 + 5);
    assert_eq!(pool.weight_of(1), 5 + 1);
    assert_eq!(pool.weight_of(25), 1);

    let snap = SnapshotCache::new(dir.path()).read(Game::Lotofacil).unwrap();
    assert_eq!(snap.last_draw_id, 3306);
    assert_eq!(snap.raw_pool.len(), 5 * 15);
}

#[tokio::test]
async fn snapshot_round_trips_into_cache_tier() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::MegaSena, mega_draws());
    let builder = builder(&fetcher, dir.path());

    let (online_pool, online) = builder.build_pool(Game::MegaSena).await;
    assert_eq!(online.mode, ProvenanceMode::Online);

    fetcher.set_failure(Failure::Network);
    let (cached_pool, cached) = builder.build_pool(Game::MegaSena).await;

    assert_eq!(cached.mode, ProvenanceMode::Cache);
    assert_eq!(cached.source, ProvenanceSource::Cache);
    assert_eq!(cached_pool, online_pool);
}

#[tokio::test]
async fn cache_tier_leaves_snapshot_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::Lotofacil, loto_draws());
    let builder = builder(&fetcher, dir.path());
    builder.build_pool(Game::Lotofacil).await;

    let path = builder.cache().path_for(Game::Lotofacil);
    let before = std::fs::read(&path).unwrap();

    fetcher.set_failure(Failure::DataUnavailable);
    let (_, prov) = builder.build_pool(Game::Lotofacil).await;
    assert_eq!(prov.mode, ProvenanceMode::Cache);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn recovery_refreshes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::MegaSena, mega_draws());
    let builder = builder(&fetcher, dir.path());

    fetcher.set_failure(Failure::Network);
    let (_, prov) = builder.build_pool(Game::MegaSena).await;
    assert_eq!(prov.mode, ProvenanceMode::Offline);
    assert!(builder.cache().read(Game::MegaSena).is_none());

    fetcher.clear_failure();
    let (_, prov) = builder.build_pool(Game::MegaSena).await;
    assert_eq!(prov.mode, ProvenanceMode::Online);
    assert_eq!(builder.cache().read(Game::MegaSena).unwrap().last_draw_id, 2750);
}

#[tokio::test]
async fn every_tier_covers_the_full_range() {
    for game in Game::ALL {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new()
            .with_draws(Game::MegaSena, mega_draws())
            .with_draws(Game::Lotofacil, loto_draws());
        let builder = builder(&fetcher, dir.path());

        let (online, _) = builder.build_pool(game).await;
        fetcher.set_failure(Failure::Network);
        let (cached, _) = builder.build_pool(game).await;
        std::fs::remove_file(builder.cache().path_for(game)).unwrap();
        let (offline, prov) = builder.build_pool(game).await;

        assert_eq!(prov.mode, ProvenanceMode::Offline);
        for pool in [online, cached, offline] {
            assert!(covers_range(&pool), "{game} pool misses numbers");
        }
    }
}

#[tokio::test]
async fn seeded_generation_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::MegaSena, mega_draws());
    let (pool, _) = builder(&fetcher, dir.path()).build_pool(Game::MegaSena).await;

    let run = |seed| {
        let mut rng = apply_seed(Some(seed));
        (0..10)
            .map(|_| draw_combinations(12, 8, &pool, &mut rng).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(42), run(42));
}

#[tokio::test]
async fn recent_numbers_win_more_often() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new().with_draws(Game::MegaSena, mega_draws());
    let (pool, _) = builder(&fetcher, dir.path()).build_pool(Game::MegaSena).await;

    let mut rng = apply_seed(Some(7));
    let (mut hot, mut cold) = (0usize, 0usize);
    for _ in 0..1_000 {
        for combo in draw_combinations(10, 6, &pool, &mut rng).unwrap() {
            hot += combo.contains(7) as usize;
            cold += combo.contains(13) as usize;
        }
    }
    assert!(hot > cold * 3, "hot={hot} cold={cold}");
}

#[tokio::test]
async fn generation_is_recorded_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new();
    fetcher.set_failure(Failure::Network);
    let (pool, prov) = builder(&fetcher, dir.path()).build_pool(Game::Lotofacil).await;

    let mut rng = apply_seed(Some(99));
    let combos = draw_combinations(4, 15, &pool, &mut rng).unwrap();

    let store = HistoryStore::new(dir.path().join("historico"));
    let path = store
        .save(Game::Lotofacil, &combos, 15, rng.seed(), &prov)
        .unwrap();

    let entry = HistoryStore::load(&path).unwrap();
    assert_eq!(entry.surpresinhas, combos);
    assert_eq!(entry.meta.seed, Some(99));
    assert_eq!(entry.meta.qtd_dezenas, 15);
    assert_eq!(entry.meta.proveniencia.unwrap().mode, ProvenanceMode::Offline);
}
