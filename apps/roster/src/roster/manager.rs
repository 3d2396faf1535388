use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use super::ports::TeamStore;
use super::summary::RosterSummary;
use crate::domain::errors::{RosterError, RosterResult};
use crate::domain::player::Player;
use crate::domain::team::{Team, TeamName};
use crate::domain::user::UserId;

/// Shared view of whether a roster mutation is outstanding
///
/// Hand a clone to whatever renders the add/remove controls so they can be
/// disabled while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusySignal(Arc<AtomicBool>);

impl BusySignal {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Marks the signal busy until dropped, including when the call future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keeps one user's fantasy team consistent with the team store
///
/// The manager caches the last snapshot it received. Add and remove intents
/// are validated against that cache first and only reach the store when every
/// local rule passes. Whatever the store answers replaces the cache wholesale.
///
/// Mutations take `&mut self`, so one manager never has two requests in
/// flight at once.
pub struct RosterManager<S> {
    store: S,
    cached: Option<Team>,
    busy: BusySignal,
}

impl<S: TeamStore> RosterManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cached: None,
            busy: BusySignal::default(),
        }
    }

    /// The last snapshot adopted from the store
    pub fn team(&self) -> Option<&Team> {
        self.cached.as_ref()
    }

    pub fn busy_signal(&self) -> BusySignal {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Dashboard figures for the cached team
    pub fn summary(&self, available_players: usize) -> RosterSummary {
        RosterSummary::new(available_players, self.cached.as_ref())
    }

    /// Fetches the user's team from the store, making it the cached snapshot
    ///
    /// Never creates a team. When the user has none, the cache is cleared.
    pub async fn get_team_for_user(&mut self, user_id: &UserId) -> RosterResult<Option<Team>> {
        let fetched = {
            let _guard = InFlight::enter(&self.busy.0);
            self.store.find_by_user(user_id).await
        }
        .map_err(|e| {
            tracing::warn!(user = %user_id, error = %e, "Failed to fetch team");
            RosterError::from(e)
        })?;

        match fetched {
            Some(team) => Ok(Some(self.adopt(team))),
            None => {
                tracing::debug!(user = %user_id, "User has no team yet");
                self.cached = None;
                Ok(None)
            }
        }
    }

    /// Creates the user's team with an empty roster and the initial budget
    ///
    /// # Errors
    /// * `Validation` - name shorter than three characters once trimmed
    /// * `Conflict` - the store reports the user already owns a team
    /// * `Unavailable` - the store cannot be reached
    pub async fn create_team(&mut self, user_id: &UserId, team_name: &str) -> RosterResult<Team> {
        let name = TeamName::new(team_name)?;

        let created = {
            let _guard = InFlight::enter(&self.busy.0);
            self.store.create_team(user_id, name.as_str()).await
        }
        .map_err(|e| {
            tracing::warn!(user = %user_id, error = %e, "Team creation rejected");
            RosterError::from(e)
        })?;

        tracing::info!(user = %user_id, team_id = %created.id(), name = created.name(), "Team created");
        Ok(self.adopt(created))
    }

    /// Acquires `player` for the user's team
    ///
    /// Local rules, checked in order before the store is contacted: a team
    /// exists, the roster has room, the price fits the budget, and the player
    /// is not already rostered.
    pub async fn add_player(&mut self, user_id: &UserId, player: &Player) -> RosterResult<Team> {
        let team = self.team_for(user_id)?;
        team.check_add(player)?;
        let team_id = team.id();

        let updated = {
            let _guard = InFlight::enter(&self.busy.0);
            self.store.add_player(team_id, player.id).await
        }
        .map_err(|e| {
            tracing::warn!(%team_id, player_id = %player.id, error = %e, "Add player rejected by store");
            RosterError::from(e)
        })?;

        tracing::info!(
            %team_id,
            player_id = %player.id,
            remaining_budget = %updated.remaining_budget(),
            "Player added"
        );
        Ok(self.adopt(updated))
    }

    /// Releases a rostered player
    ///
    /// Callers are expected to have confirmed the removal with the user.
    pub async fn remove_player(&mut self, user_id: &UserId, player_id: Uuid) -> RosterResult<Team> {
        let team = self.team_for(user_id)?;
        team.check_remove(player_id)?;
        let team_id = team.id();

        let updated = {
            let _guard = InFlight::enter(&self.busy.0);
            self.store.remove_player(team_id, player_id).await
        }
        .map_err(|e| {
            tracing::warn!(%team_id, %player_id, error = %e, "Remove player rejected by store");
            RosterError::from(e)
        })?;

        tracing::info!(
            %team_id,
            %player_id,
            remaining_budget = %updated.remaining_budget(),
            "Player removed"
        );
        Ok(self.adopt(updated))
    }

    fn team_for(&self, user_id: &UserId) -> RosterResult<&Team> {
        self.cached
            .as_ref()
            .filter(|team| team.owner() == user_id)
            .ok_or(RosterError::NoTeam)
    }

    /// Replaces the cache with a store snapshot, returning a copy for the caller
    fn adopt(&mut self, team: Team) -> Team {
        // The store is authoritative even when its snapshot breaks local rules
        // (e.g. a concurrent edit from another device); keep it and say so.
        let violations = team.invariant_violations();
        if !violations.is_empty() {
            tracing::warn!(
                team_id = %team.id(),
                ?violations,
                "Adopted team snapshot breaks roster invariants"
            );
        }

        self.cached = Some(team.clone());
        team
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::Position;
    use crate::domain::team::{INITIAL_BUDGET, MAX_PLAYERS};
    use crate::roster::ports::StoreError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Store double backed by the domain aggregate, counting every call
    #[derive(Default)]
    struct FakeStore {
        catalog: Vec<Player>,
        teams: Mutex<Vec<Team>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail_with: Option<StoreError>,
    }

    impl FakeStore {
        fn with_catalog(catalog: Vec<Player>) -> Self {
            Self {
                catalog,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn enter(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn mutate(
            &self,
            team_id: Uuid,
            apply: impl FnOnce(&mut Team) -> RosterResult<()>,
        ) -> Result<Team, StoreError> {
            let mut teams = self.teams.lock().unwrap();
            let team = teams
                .iter_mut()
                .find(|t| t.id() == team_id)
                .ok_or_else(|| StoreError::Conflict("Team not found".to_string()))?;
            apply(team).map_err(|e| StoreError::Conflict(e.to_string()))?;
            Ok(team.clone())
        }
    }

    #[async_trait]
    impl TeamStore for FakeStore {
        async fn create_team(&self, owner: &UserId, name: &str) -> Result<Team, StoreError> {
            self.enter().await?;
            let mut teams = self.teams.lock().unwrap();
            if teams.iter().any(|t| t.owner() == owner) {
                return Err(StoreError::Conflict("User already has a team".to_string()));
            }
            let (team, _) =
                Team::new(owner.clone(), name).map_err(|e| StoreError::Conflict(e.to_string()))?;
            teams.push(team.clone());
            Ok(team)
        }

        async fn find_by_user(&self, owner: &UserId) -> Result<Option<Team>, StoreError> {
            self.enter().await?;
            let teams = self.teams.lock().unwrap();
            Ok(teams.iter().find(|t| t.owner() == owner).cloned())
        }

        async fn add_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
            self.enter().await?;
            let player = self
                .catalog
                .iter()
                .find(|p| p.id == player_id)
                .cloned()
                .ok_or_else(|| StoreError::Conflict("Unknown player".to_string()))?;
            self.mutate(team_id, |team| team.add_player(player).map(|_| ()))
        }

        async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
            self.enter().await?;
            self.mutate(team_id, |team| team.remove_player(player_id).map(|_| ()))
        }
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn priced(price: i64) -> Player {
        Player::new("Player", Position::Midfielder, Decimal::from(price))
    }

    async fn manager_with_team(catalog: Vec<Player>) -> RosterManager<Arc<FakeStore>> {
        let store = Arc::new(FakeStore::with_catalog(catalog));
        let mut manager = RosterManager::new(store);
        manager.create_team(&user(), "Dream Team").await.unwrap();
        manager
    }

    #[tokio::test]
    async fn create_team_caches_store_snapshot() {
        let store = Arc::new(FakeStore::default());
        let mut manager = RosterManager::new(store.clone());

        let team = manager.create_team(&user(), "  Dream Team ").await.unwrap();

        assert_eq!(team.name(), "Dream Team");
        assert_eq!(team.remaining_budget(), INITIAL_BUDGET);
        assert_eq!(manager.team(), Some(&team));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn short_team_name_never_reaches_store() {
        let store = Arc::new(FakeStore::default());
        let mut manager = RosterManager::new(store.clone());

        let result = manager.create_team(&user(), " ab ").await;

        assert!(matches!(result, Err(RosterError::Validation(_))));
        assert_eq!(store.calls(), 0);
        assert!(manager.team().is_none());
    }

    #[tokio::test]
    async fn second_team_is_a_conflict() {
        let mut manager = manager_with_team(vec![]).await;
        let before = manager.team().cloned();

        let result = manager.create_team(&user(), "Other Team").await;

        assert!(matches!(result, Err(RosterError::Conflict(_))));
        assert_eq!(manager.team().cloned(), before);
    }

    #[tokio::test]
    async fn add_without_team_fails_locally() {
        let store = Arc::new(FakeStore::default());
        let mut manager = RosterManager::new(store.clone());

        let result = manager.add_player(&user(), &priced(5)).await;

        assert_eq!(result, Err(RosterError::NoTeam));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn cached_team_of_another_user_is_not_used() {
        let striker = priced(5);
        let mut manager = manager_with_team(vec![striker.clone()]).await;
        let someone_else = UserId::new("user-2").unwrap();

        let result = manager.add_player(&someone_else, &striker).await;

        assert_eq!(result, Err(RosterError::NoTeam));
    }

    #[tokio::test]
    async fn add_duplicate_then_remove_scenario() {
        let striker = priced(12);
        let mut manager = manager_with_team(vec![striker.clone()]).await;

        let team = manager.add_player(&user(), &striker).await.unwrap();
        assert_eq!(team.remaining_budget(), Decimal::from(88));
        assert_eq!(team.player_count(), 1);

        let again = manager.add_player(&user(), &striker).await;
        assert_eq!(again, Err(RosterError::DuplicatePlayer(striker.id)));
        assert_eq!(manager.team().unwrap().remaining_budget(), Decimal::from(88));
        assert_eq!(manager.team().unwrap().player_count(), 1);

        let team = manager.remove_player(&user(), striker.id).await.unwrap();
        assert_eq!(team.remaining_budget(), INITIAL_BUDGET);
        assert_eq!(team.player_count(), 0);
    }

    #[tokio::test]
    async fn full_roster_rejected_without_store_call() {
        let mut catalog: Vec<Player> = (0..MAX_PLAYERS).map(|_| priced(5)).collect();
        let extra = priced(1);
        catalog.push(extra.clone());
        let store = Arc::new(FakeStore::with_catalog(catalog.clone()));
        let mut manager = RosterManager::new(store.clone());
        manager.create_team(&user(), "Dream Team").await.unwrap();
        for player in &catalog[..MAX_PLAYERS] {
            manager.add_player(&user(), player).await.unwrap();
        }
        let calls = store.calls();
        let before = manager.team().cloned();

        let result = manager.add_player(&user(), &extra).await;

        assert_eq!(result, Err(RosterError::RosterFull { max: MAX_PLAYERS }));
        assert_eq!(store.calls(), calls);
        assert_eq!(manager.team().cloned(), before);
    }

    #[tokio::test]
    async fn over_budget_rejected_without_store_call() {
        let pricey = priced(150);
        let store = Arc::new(FakeStore::with_catalog(vec![pricey.clone()]));
        let mut manager = RosterManager::new(store.clone());
        manager.create_team(&user(), "Dream Team").await.unwrap();

        let result = manager.add_player(&user(), &pricey).await;

        assert!(matches!(
            result,
            Err(RosterError::InsufficientBudget { .. })
        ));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn removing_absent_player_fails_locally() {
        let striker = priced(12);
        let mut manager = manager_with_team(vec![striker.clone()]).await;
        manager.add_player(&user(), &striker).await.unwrap();
        let missing = Uuid::new_v4();

        let result = manager.remove_player(&user(), missing).await;

        assert_eq!(result, Err(RosterError::PlayerNotInRoster(missing)));
        assert_eq!(manager.team().unwrap().remaining_budget(), Decimal::from(88));
        assert_eq!(manager.team().unwrap().player_count(), 1);
    }

    #[tokio::test]
    async fn budget_accounting_holds_across_adds() {
        let catalog: Vec<Player> = [12, 4, 9, 7, 5, 11].into_iter().map(priced).collect();
        let mut manager = manager_with_team(catalog.clone()).await;

        for player in &catalog {
            let team = manager.add_player(&user(), player).await.unwrap();
            assert_eq!(team.spent().unwrap() + team.remaining_budget(), INITIAL_BUDGET);
            assert_eq!(team.player_count(), team.players().len());
        }
    }

    #[tokio::test]
    async fn store_failure_leaves_cache_untouched() {
        let striker = priced(12);
        let store = Arc::new(FakeStore::with_catalog(vec![striker.clone()]));
        let mut manager = RosterManager::new(store.clone());
        manager.create_team(&user(), "Dream Team").await.unwrap();
        let before = manager.team().cloned();

        let failing = FakeStore {
            teams: Mutex::new(store.teams.lock().unwrap().clone()),
            fail_with: Some(StoreError::Unavailable("connection refused".to_string())),
            ..FakeStore::with_catalog(vec![striker.clone()])
        };
        let mut manager = RosterManager {
            store: Arc::new(failing),
            cached: before.clone(),
            busy: BusySignal::default(),
        };

        let result = manager.add_player(&user(), &striker).await;

        assert_eq!(
            result,
            Err(RosterError::Unavailable("connection refused".to_string()))
        );
        assert_eq!(manager.team().cloned(), before);
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn get_team_for_user_does_not_create() {
        let store = Arc::new(FakeStore::default());
        let mut manager = RosterManager::new(store.clone());

        assert_eq!(manager.get_team_for_user(&user()).await, Ok(None));
        assert!(manager.team().is_none());

        store.create_team(&user(), "Dream Team").await.unwrap();
        let found = manager.get_team_for_user(&user()).await.unwrap();

        assert_eq!(found.map(|t| t.name().to_string()), Some("Dream Team".to_string()));
        assert!(manager.team().is_some());
    }

    #[tokio::test]
    async fn oversized_store_snapshot_is_adopted() {
        let squad: Vec<Player> = (0..=MAX_PLAYERS).map(|_| priced(1)).collect();
        let oversized = Team::from_persistence(
            Uuid::new_v4(),
            user(),
            TeamName::new("Other Device").unwrap(),
            squad,
            INITIAL_BUDGET - Decimal::from(16),
            0,
            chrono::Utc::now(),
        );
        assert!(!oversized.invariant_violations().is_empty());
        let store = Arc::new(FakeStore::default());
        store.teams.lock().unwrap().push(oversized.clone());
        let mut manager = RosterManager::new(store.clone());

        let adopted = manager.get_team_for_user(&user()).await.unwrap();

        assert_eq!(adopted, Some(oversized));
        assert!(matches!(
            manager.add_player(&user(), &priced(1)).await,
            Err(RosterError::RosterFull { .. })
        ));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn snapshot_with_overflowing_prices_is_adopted() {
        let huge = Decimal::MAX / Decimal::from(2) + Decimal::ONE;
        let squad: Vec<Player> = (0..2)
            .map(|_| {
                let mut player = priced(0);
                player.price = huge;
                player
            })
            .collect();
        let corrupt = Team::from_persistence(
            Uuid::new_v4(),
            user(),
            TeamName::new("Corrupt Team").unwrap(),
            squad,
            INITIAL_BUDGET,
            0,
            chrono::Utc::now(),
        );
        let store = Arc::new(FakeStore::default());
        store.teams.lock().unwrap().push(corrupt.clone());
        let mut manager = RosterManager::new(store);

        let adopted = manager.get_team_for_user(&user()).await.unwrap();

        assert_eq!(adopted, Some(corrupt));
        assert_eq!(manager.team().and_then(Team::spent), None);
    }

    #[tokio::test]
    async fn busy_while_request_outstanding() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(FakeStore {
            gate: Some(gate.clone()),
            ..FakeStore::default()
        });
        let mut manager = RosterManager::new(store);
        let signal = manager.busy_signal();
        let user = user();

        assert!(!signal.is_busy());
        let (created, ()) = tokio::join!(manager.create_team(&user, "Dream Team"), async {
            // the store call is parked on the gate until the flag is seen
            while !signal.is_busy() {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        });

        assert!(created.is_ok());
        assert!(!signal.is_busy());
    }

    #[tokio::test]
    async fn summary_follows_cache() {
        let striker = priced(12).with_stats(2, 1, 0, 30);
        let mut manager = manager_with_team(vec![striker.clone()]).await;
        manager.add_player(&user(), &striker).await.unwrap();

        let summary = manager.summary(120);

        assert_eq!(summary.fill_label(), "1/15");
        assert_eq!(summary.total_points, 30);
        assert_eq!(summary.available_players, 120);
    }
}
