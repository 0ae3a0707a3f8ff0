//! In-memory cat registry.
//!
//! Every read shares one [`RwLock`] and every mutation takes it exclusively. The
//! random generator sits behind its own [`Mutex`] that is only ever locked while the
//! registry guard is already held, never the other way around.

use crate::error::ArenaError;
use crate::model::{Cat, MergeReport};
use crate::rating::Elo;
use catmash_domain::constants::DEFAULT_RATING;
use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Pool {
    cats: Vec<Cat>,
    index: FxHashMap<String, usize>,
}

impl Pool {
    fn position(&self, id: &str) -> Result<usize, ArenaError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ArenaError::NotFound { message: id.to_owned().into(), context: None })
    }

    /// Uniform pick among the cats other than `exclude`.
    fn pick_excluding(&self, exclude: Option<&str>, rng: &mut StdRng) -> Result<&Cat, ArenaError> {
        let excluded = exclude.filter(|id| self.index.contains_key(*id));
        let eligible = self.cats.len() - usize::from(excluded.is_some());
        if eligible == 0 {
            return Err(ArenaError::EmptyPool { context: None });
        }

        let nth = rng.random_range(0..eligible);
        self.cats
            .iter()
            .filter(|cat| Some(cat.id.as_str()) != excluded)
            .nth(nth)
            .ok_or_else(|| "random pick ran past the eligible cats".into())
    }
}

/// The authoritative set of cats and their ratings.
#[derive(Debug)]
pub struct CatRegistry {
    pool: RwLock<Pool>,
    rng: Mutex<StdRng>,
    elo: Elo,
    initial_rating: i32,
}

impl Default for CatRegistry {
    fn default() -> Self {
        Self::new(Elo::default(), DEFAULT_RATING)
    }
}

impl CatRegistry {
    /// Empty registry with a generator seeded once from the OS.
    #[must_use]
    pub fn new(elo: Elo, initial_rating: i32) -> Self {
        Self::with_rng(elo, initial_rating, StdRng::from_os_rng())
    }

    /// Empty registry with a deterministic generator.
    #[must_use]
    pub fn with_seed(elo: Elo, initial_rating: i32, seed: u64) -> Self {
        Self::with_rng(elo, initial_rating, StdRng::seed_from_u64(seed))
    }

    fn with_rng(elo: Elo, initial_rating: i32, rng: StdRng) -> Self {
        Self { pool: RwLock::new(Pool::default()), rng: Mutex::new(rng), elo, initial_rating }
    }

    #[must_use]
    pub const fn initial_rating(&self) -> i32 {
        self.initial_rating
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.read().cats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.read().cats.is_empty()
    }

    /// Snapshot of every cat in registry order.
    #[must_use]
    pub fn all(&self) -> Vec<Cat> {
        self.pool.read().cats.clone()
    }

    /// Up to `limit` cats, highest rating first. Ties keep registry order.
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<Cat> {
        let mut cats = self.all();
        cats.sort_by(|a, b| b.rating.cmp(&a.rating));
        cats.truncate(limit);
        cats
    }

    /// # Errors
    /// [`ArenaError::NotFound`] if no cat has this id.
    pub fn find(&self, id: &str) -> Result<Cat, ArenaError> {
        let pool = self.pool.read();
        let pos = pool.position(id)?;
        Ok(pool.cats[pos].clone())
    }

    /// A random cat other than `exclude_id`. `None` or an unknown id excludes nothing.
    ///
    /// # Errors
    /// [`ArenaError::EmptyPool`] if no other cat is loaded.
    pub fn pick_random_excluding(&self, exclude_id: Option<&str>) -> Result<Cat, ArenaError> {
        let pool = self.pool.read();
        let mut rng = self.rng.lock();
        pool.pick_excluding(exclude_id, &mut rng).cloned()
    }

    /// Two distinct random cats.
    ///
    /// # Errors
    /// [`ArenaError::EmptyPool`] if fewer than two cats are loaded.
    pub fn random_pair(&self) -> Result<[Cat; 2], ArenaError> {
        let pool = self.pool.read();
        let mut rng = self.rng.lock();

        let first = pool.pick_excluding(None, &mut rng)?;
        let second = pool.pick_excluding(Some(&first.id), &mut rng)?;
        Ok([first.clone(), second.clone()])
    }

    /// Records a win, then draws the winner's next opponent.
    ///
    /// Both ids are resolved before anything changes, so a failed call leaves
    /// every rating untouched. Lookup, update and draw happen under one write guard.
    ///
    /// # Errors
    /// * [`ArenaError::SelfMatch`] if both ids are equal.
    /// * [`ArenaError::NotFound`] if either id is unknown.
    pub fn apply_match_result(
        &self,
        winner_id: &str,
        loser_id: &str,
    ) -> Result<(Cat, Cat), ArenaError> {
        if winner_id == loser_id {
            return Err(ArenaError::SelfMatch { message: winner_id.to_owned().into(), context: None });
        }

        let mut pool = self.pool.write();
        let winner_pos = pool.position(winner_id)?;
        let loser_pos = pool.position(loser_id)?;

        let (winner_rating, loser_rating) =
            self.elo.update(pool.cats[winner_pos].rating, pool.cats[loser_pos].rating);
        pool.cats[winner_pos].rating = winner_rating;
        pool.cats[loser_pos].rating = loser_rating;

        debug!(
            winner = %winner_id,
            loser = %loser_id,
            winner_rating,
            loser_rating,
            "Match recorded"
        );

        let winner = pool.cats[winner_pos].clone();
        let mut rng = self.rng.lock();
        let opponent = pool.pick_excluding(Some(winner_id), &mut rng)?.clone();

        Ok((winner, opponent))
    }

    /// Replaces the registry with `fresh`.
    ///
    /// Cats already known keep their rating, new ones start at the initial rating
    /// and cats missing from `fresh` are dropped. A repeated id keeps its first entry.
    pub fn merge_from_source(&self, fresh: Vec<Cat>) -> MergeReport {
        let mut pool = self.pool.write();
        let mut report = MergeReport::default();
        let mut merged = Vec::with_capacity(fresh.len());
        let mut seen = FxHashMap::default();

        for mut cat in fresh {
            if seen.contains_key(&cat.id) {
                debug!(id = %cat.id, "Skipping duplicate cat");
                continue;
            }

            match pool.index.get(&cat.id) {
                Some(&pos) => {
                    cat.rating = pool.cats[pos].rating;
                    report.kept += 1;
                },
                None => {
                    cat.rating = self.initial_rating;
                    report.added += 1;
                },
            }

            seen.insert(cat.id.clone(), merged.len());
            merged.push(cat);
        }

        report.dropped = pool.cats.len() - report.kept;
        *pool = Pool { cats: merged, index: seen };

        info!(kept = report.kept, added = report.added, dropped = report.dropped, "Registry merged");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cat(id: &str, rating: i32) -> Cat {
        Cat {
            id: id.to_owned(),
            title: format!("Cat {id}"),
            image: format!("https://img/{id}.png"),
            rating,
        }
    }

    fn loaded(ids: &[&str]) -> CatRegistry {
        let cats = CatRegistry::with_seed(Elo::default(), DEFAULT_RATING, 7);
        cats.merge_from_source(ids.iter().map(|id| cat(id, 0)).collect());
        cats
    }

    #[test]
    fn merge_assigns_initial_rating_to_new_cats() {
        let cats = loaded(&["a", "b"]);

        assert_eq!(cats.len(), 2);
        assert!(cats.all().iter().all(|c| c.rating == DEFAULT_RATING));
    }

    #[test]
    fn merge_keeps_ratings_and_drops_absent_cats() {
        let cats = loaded(&["a", "b", "c"]);
        cats.apply_match_result("a", "b").unwrap();

        let report = cats.merge_from_source(vec![cat("a", 0), cat("b", 0), cat("d", 0)]);

        assert_eq!(report, MergeReport { kept: 2, added: 1, dropped: 1 });
        assert_eq!(cats.find("a").unwrap().rating, 1216);
        assert_eq!(cats.find("b").unwrap().rating, 1184);
        assert_eq!(cats.find("d").unwrap().rating, DEFAULT_RATING);
        assert!(matches!(cats.find("c"), Err(ArenaError::NotFound { .. })));
    }

    #[test]
    fn merge_keeps_first_of_duplicate_ids() {
        let cats = CatRegistry::with_seed(Elo::default(), DEFAULT_RATING, 1);
        let mut second = cat("a", 0);
        second.title = "Impostor".to_owned();

        let report = cats.merge_from_source(vec![cat("a", 0), second, cat("b", 0)]);

        assert_eq!(report.total(), 2);
        assert_eq!(cats.find("a").unwrap().title, "Cat a");
    }

    #[test]
    fn merge_report_reads_well() {
        let report = MergeReport { kept: 3, added: 2, dropped: 1 };
        assert_eq!(report.to_string(), "Loaded 5 cats (3 kept, 2 added, 1 dropped)");
    }

    #[test]
    fn top_sorts_descending_and_limits() {
        let ids: Vec<String> = (0..10).map(|i| format!("cat-{i}")).collect();
        let cats = CatRegistry::with_seed(Elo::default(), DEFAULT_RATING, 3);
        cats.merge_from_source(ids.iter().map(|id| cat(id, 0)).collect());
        for (i, entry) in cats.pool.write().cats.iter_mut().enumerate() {
            entry.rating = [1150, 1320, 990, 1401, 1200, 1275, 1010, 1333, 1199, 1260][i];
        }

        let top: Vec<(String, i32)> = cats.top(5).into_iter().map(|c| (c.id, c.rating)).collect();

        assert_eq!(
            top,
            [
                ("cat-3".to_owned(), 1401),
                ("cat-7".to_owned(), 1333),
                ("cat-1".to_owned(), 1320),
                ("cat-5".to_owned(), 1275),
                ("cat-9".to_owned(), 1260),
            ]
        );
    }

    #[test]
    fn top_returns_everything_when_short() {
        assert_eq!(loaded(&["a", "b"]).top(5).len(), 2);
        assert!(CatRegistry::default().top(5).is_empty());
    }

    #[test]
    fn top_keeps_registry_order_on_ties() {
        let ids: Vec<String> = loaded(&["x", "y", "z"]).top(3).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn pick_never_returns_the_excluded_cat() {
        let cats = loaded(&["a", "b", "c"]);
        for _ in 0..1000 {
            assert_ne!(cats.pick_random_excluding(Some("a")).unwrap().id, "a");
        }
    }

    #[test]
    fn pick_reaches_every_eligible_cat() {
        let cats = loaded(&["a", "b", "c", "d"]);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(cats.pick_random_excluding(Some("a")).unwrap().id);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn pick_fails_when_only_the_excluded_cat_is_left() {
        let cats = loaded(&["solo"]);

        assert!(matches!(
            cats.pick_random_excluding(Some("solo")),
            Err(ArenaError::EmptyPool { .. })
        ));
        assert_eq!(cats.pick_random_excluding(None).unwrap().id, "solo");
        assert_eq!(cats.pick_random_excluding(Some("ghost")).unwrap().id, "solo");
        assert!(matches!(
            CatRegistry::default().pick_random_excluding(None),
            Err(ArenaError::EmptyPool { .. })
        ));
    }

    #[test]
    fn cat_with_empty_id_can_be_drawn() {
        let cats = loaded(&["", "b"]);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(cats.pick_random_excluding(None).unwrap().id);
        }
        assert!(seen.contains(""));

        for _ in 0..100 {
            let [first, second] = cats.random_pair().unwrap();
            assert_ne!(first.id, second.id);
        }
        assert_eq!(cats.pick_random_excluding(Some("b")).unwrap().id, "");
    }

    #[test]
    fn random_pair_is_distinct() {
        let cats = loaded(&["a", "b"]);
        for _ in 0..100 {
            let [first, second] = cats.random_pair().unwrap();
            assert_ne!(first.id, second.id);
        }
        assert!(matches!(loaded(&["a"]).random_pair(), Err(ArenaError::EmptyPool { .. })));
    }

    #[test]
    fn match_updates_both_ratings_and_picks_a_new_opponent() {
        let cats = loaded(&["a", "b", "c"]);

        let (winner, opponent) = cats.apply_match_result("a", "b").unwrap();

        assert_eq!(winner.id, "a");
        assert_eq!(winner.rating, 1216);
        assert_eq!(cats.find("b").unwrap().rating, 1184);
        assert_ne!(opponent.id, "a");
    }

    #[test]
    fn unknown_ids_leave_ratings_untouched() {
        let cats = loaded(&["a", "b"]);

        assert!(matches!(cats.apply_match_result("a", "ghost"), Err(ArenaError::NotFound { .. })));
        assert!(matches!(cats.apply_match_result("ghost", "b"), Err(ArenaError::NotFound { .. })));
        assert!(cats.all().iter().all(|c| c.rating == DEFAULT_RATING));
    }

    #[test]
    fn self_match_is_rejected() {
        let cats = loaded(&["a", "b"]);

        assert!(matches!(cats.apply_match_result("a", "a"), Err(ArenaError::SelfMatch { .. })));
        assert_eq!(cats.find("a").unwrap().rating, DEFAULT_RATING);
    }

    #[test]
    fn same_seed_gives_same_picks() {
        let first = loaded(&["a", "b", "c", "d"]);
        let second = loaded(&["a", "b", "c", "d"]);

        for _ in 0..20 {
            assert_eq!(
                first.pick_random_excluding(None).unwrap(),
                second.pick_random_excluding(None).unwrap()
            );
        }
    }

    #[test]
    fn concurrent_matches_conserve_total_rating() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 500;

        let ids: Vec<String> = (0..6).map(|i| format!("cat-{i}")).collect();
        let cats = CatRegistry::with_seed(Elo::default(), DEFAULT_RATING, 11);
        cats.merge_from_source(ids.iter().map(|id| cat(id, 0)).collect());

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        let [winner, loser] = cats.random_pair().unwrap();
                        cats.apply_match_result(&winner.id, &loser.id).unwrap();
                        let _ = cats.top(5);
                    }
                });
            }
        });

        let total: i64 = cats.all().iter().map(|c| i64::from(c.rating)).sum();
        assert_eq!(total, i64::from(DEFAULT_RATING) * 6);
        assert_eq!(cats.len(), 6);
    }
}
