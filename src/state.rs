//! The hydration state the rest of the app reads and mutates.
//!
//! [`HydrationState`] is the single owner of the intake log, cup catalog,
//! selected cup, profile and daily target for a session. Every mutation is
//! written through to the [`KeyValueStore`] before the operation returns.
//! A failed write is logged and the in-memory value is kept.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    calculator::compute_daily_target,
    error::{Result, ValidationError},
    storage::{
        KeyValueStore, CLIMATE_KEY, CUP_SIZES_KEY, DAILY_TARGET_KEY, GENDER_KEY,
        SELECTED_WATER_CUP_KEY, THEME_KEY, WATER_INTAKE_KEY, WEIGHT_KEY,
    },
    structs::{
        cup::{Cup, DEFAULT_CUP, DEFAULT_CUP_SIZES, MAX_CUP_SIZE, MIN_CUP_SIZE},
        cup_icon::CupIcon,
        profile::{Profile, ProfileUpdate},
        theme::Theme,
    },
};

pub const DEFAULT_INTAKE_TARGET: u32 = 2500;

pub struct HydrationState<S> {
    store: S,

    intake_log: Vec<Cup>,
    cup_catalog: Vec<Cup>,
    selected_cup: Cup,
    daily_target: u32,
    profile: Profile,
    theme: Theme,
}

impl<S: KeyValueStore> HydrationState<S> {
    /// Loads every field from `store`. A field that's missing, unreadable or
    /// corrupt falls back to its default without affecting the others.
    #[instrument(skip(store))]
    pub async fn initialize(store: S) -> Self {
        let intake_log = load_json::<Vec<Cup>, _>(&store, WATER_INTAKE_KEY)
            .await
            .filter(|log| all_sizes_in_range(log, WATER_INTAKE_KEY))
            .unwrap_or_default();

        let cup_catalog = load_json::<Vec<Cup>, _>(&store, CUP_SIZES_KEY)
            .await
            .filter(|catalog| all_sizes_in_range(catalog, CUP_SIZES_KEY))
            .map(|catalog| catalog.iter().map(Cup::configuration).collect())
            .unwrap_or_else(|| DEFAULT_CUP_SIZES.to_vec());

        let selected_cup = match load_json::<Cup, _>(&store, SELECTED_WATER_CUP_KEY).await {
            Some(cup) if cup_catalog.iter().any(|c| c.same_configuration(&cup)) => {
                cup.configuration()
            }
            Some(cup) => {
                warn!(
                    "Selected {}ml cup is not in the catalog, using the default cup",
                    cup.size
                );
                DEFAULT_CUP
            }
            None => DEFAULT_CUP,
        };

        // 0 is a legitimate result for very small weights
        let daily_target =
            load_parsed(&store, DAILY_TARGET_KEY, |raw| raw.trim().parse::<u32>().ok())
                .await
                .unwrap_or(DEFAULT_INTAKE_TARGET);

        let profile = Profile {
            weight: load_parsed(&store, WEIGHT_KEY, |raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|weight| weight.is_finite() && *weight > 0.0)
            })
            .await,
            climate: load_parsed(&store, CLIMATE_KEY, |raw| raw.parse().ok()).await,
            gender: load_parsed(&store, GENDER_KEY, |raw| raw.parse().ok()).await,
        };

        let theme = load_parsed(&store, THEME_KEY, |raw| raw.parse().ok())
            .await
            .unwrap_or_default();

        info!(
            drinks = intake_log.len(),
            cups = cup_catalog.len(),
            daily_target,
            "Hydration state loaded"
        );

        Self {
            store,
            intake_log,
            cup_catalog,
            selected_cup,
            daily_target,
            profile,
            theme,
        }
    }

    /// Logs a drink of the selected cup, stamped with the current time.
    pub async fn log_drink(&mut self) -> Cup {
        self.log_drink_at(Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn log_drink_at(&mut self, timestamp: DateTime<Utc>) -> Cup {
        let drink = self.selected_cup.logged_at(timestamp);
        self.intake_log.push(drink);
        debug!("Logged {}ml drink", drink.size);

        self.persist_json(WATER_INTAKE_KEY, &self.intake_log).await;
        drink
    }

    /// Removes the most recent drink. Does nothing on an empty log.
    #[instrument(skip(self))]
    pub async fn undo_last_drink(&mut self) -> Option<Cup> {
        let removed = self.intake_log.pop()?;
        debug!("Removed {}ml drink", removed.size);

        self.persist_json(WATER_INTAKE_KEY, &self.intake_log).await;
        Some(removed)
    }

    /// Selects a cup that's already in the catalog.
    #[instrument(skip(self))]
    pub async fn select_cup(&mut self, cup: Cup) -> Result<()> {
        if !self.cup_catalog.iter().any(|c| c.same_configuration(&cup)) {
            return Err(ValidationError::CupNotInCatalog { size: cup.size }.into());
        }

        self.selected_cup = cup.configuration();
        self.persist_json(SELECTED_WATER_CUP_KEY, &self.selected_cup)
            .await;
        Ok(())
    }

    /// Selects the first catalog entry of the given size.
    pub async fn select_cup_by_size(&mut self, size: u32) -> Result<Cup> {
        let cup = self
            .cup_catalog
            .iter()
            .find(|c| c.size == size)
            .copied()
            .ok_or(ValidationError::CupNotInCatalog { size })?;

        self.select_cup(cup).await?;
        Ok(cup)
    }

    /// Adds a user-defined cup size to the catalog. Sizes that are already
    /// present are added again.
    #[instrument(skip(self))]
    pub async fn add_custom_cup(&mut self, size: u32, icon: CupIcon) -> Result<Cup> {
        if !(MIN_CUP_SIZE..=MAX_CUP_SIZE).contains(&size) {
            return Err(ValidationError::CupSizeOutOfRange(size).into());
        }

        let cup = Cup::new(size, icon);
        self.cup_catalog.push(cup);
        info!("Added {size}ml {icon} cup");

        self.persist_json(CUP_SIZES_KEY, &self.cup_catalog).await;
        Ok(cup)
    }

    /// Adds a custom cup and makes it the selected one.
    pub async fn add_and_select_custom_cup(&mut self, size: u32, icon: CupIcon) -> Result<Cup> {
        let cup = self.add_custom_cup(size, icon).await?;
        self.select_cup(cup).await?;
        Ok(cup)
    }

    /// Removes every catalog entry with the same size as `cup`, whatever its
    /// icon. Resets the selection to the default cup when it had that size.
    ///
    /// Returns how many entries were removed.
    #[instrument(skip(self))]
    pub async fn remove_cup(&mut self, cup: &Cup) -> usize {
        let before = self.cup_catalog.len();
        self.cup_catalog.retain(|c| c.size != cup.size);
        let removed = before - self.cup_catalog.len();
        info!("Removed {removed} cup(s) of {}ml", cup.size);

        self.persist_json(CUP_SIZES_KEY, &self.cup_catalog).await;

        if self.selected_cup.size == cup.size {
            self.selected_cup = DEFAULT_CUP;
            self.persist_json(SELECTED_WATER_CUP_KEY, &self.selected_cup)
                .await;
        }

        removed
    }

    /// Merges `update` into the profile and recalculates the daily target
    /// when a weight is known. Returns the daily target afterwards.
    #[instrument(skip(self))]
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<u32> {
        update.validate()?;
        self.profile.merge(update);

        if let Some(weight) = update.weight {
            self.persist(WEIGHT_KEY, weight.to_string()).await;
        }
        if let Some(climate) = update.climate {
            self.persist(CLIMATE_KEY, climate.to_string()).await;
        }
        if let Some(gender) = update.gender {
            self.persist(GENDER_KEY, gender.to_string()).await;
        }

        // Without a weight there's nothing to calculate from, keep the old target
        if let Some(weight) = self.profile.weight {
            let target = compute_daily_target(weight, self.profile.climate, self.profile.gender);
            info!(target, "Recalculated daily target");

            self.daily_target = target;
            self.persist(DAILY_TARGET_KEY, target.to_string()).await;
        }

        Ok(self.daily_target)
    }

    #[instrument(skip(self))]
    pub async fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist(THEME_KEY, theme.to_string()).await;
    }

    async fn persist(&self, key: &str, value: String) {
        if let Err(e) = self.store.set(key, &value).await {
            error!(key, "Unable to save value, keeping it in memory only: {e}");
        }
    }

    async fn persist_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.persist(key, json).await,
            Err(e) => error!(key, "Unable to serialize value: {e}"),
        }
    }
}

impl<S> HydrationState<S> {
    /// Drinks in the order they were logged.
    pub fn intake_log(&self) -> &[Cup] {
        &self.intake_log
    }

    /// Catalog in insertion order. See [`HydrationState::sorted_catalog`] for display.
    pub fn cup_catalog(&self) -> &[Cup] {
        &self.cup_catalog
    }

    pub fn sorted_catalog(&self) -> Vec<Cup> {
        let mut catalog = self.cup_catalog.clone();
        catalog.sort_by_key(|cup| cup.size);
        catalog
    }

    pub fn selected_cup(&self) -> Cup {
        self.selected_cup
    }

    pub fn daily_target(&self) -> u32 {
        self.daily_target
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn latest_drink(&self) -> Option<&Cup> {
        self.intake_log.last()
    }

    /// Total milliliters in the intake log.
    pub fn total_intake(&self) -> u32 {
        self.intake_log
            .iter()
            .fold(0u32, |total, cup| total.saturating_add(cup.size))
    }

    /// Fraction of the daily target reached, capped at 1.
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.total_intake());
        if self.daily_target == 0 {
            return if total > 0.0 { 1.0 } else { 0.0 };
        }

        (total / f64::from(self.daily_target)).min(1.0)
    }

    /// Milliliters drunk per local calendar day. Entries without a timestamp
    /// are left out.
    pub fn intake_by_day(&self) -> BTreeMap<NaiveDate, u32> {
        let mut grouped = BTreeMap::new();

        for cup in &self.intake_log {
            let Some(timestamp) = cup.timestamp else {
                continue;
            };
            let day = timestamp.with_timezone(&Local).date_naive();
            let total: &mut u32 = grouped.entry(day).or_insert(0);
            *total = total.saturating_add(cup.size);
        }

        grouped
    }
}

fn all_sizes_in_range(cups: &[Cup], key: &str) -> bool {
    let valid = cups
        .iter()
        .all(|cup| (MIN_CUP_SIZE..=MAX_CUP_SIZE).contains(&cup.size));
    if !valid {
        warn!(
            key,
            "Stored cups contain a size outside {MIN_CUP_SIZE}..={MAX_CUP_SIZE}ml, ignoring them"
        );
    }
    valid
}

/// Reads `key`, treating read errors and missing values alike.
async fn load_raw<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            error!(key, "Unable to read stored value: {e}");
            None
        }
    }
}

async fn load_parsed<S, T>(store: &S, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T>
where
    S: KeyValueStore,
{
    let raw = load_raw(store, key).await?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(key, "Stored value `{raw}` is malformed, using the default");
    }
    parsed
}

async fn load_json<T: DeserializeOwned, S: KeyValueStore>(store: &S, key: &str) -> Option<T> {
    let raw = load_raw(store, key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, "Stored value is malformed, using the default: {e}");
            None
        }
    }
}
