//! Radio component — service dispatch and state snapshots for all radios.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use radiohub_domain::entity::{Entity, EntityState};
use radiohub_domain::error::{NotFoundError, RadioHubError};
use radiohub_domain::radio::{self, MIN_TIME_BETWEEN_SCANS};
use radiohub_domain::service::ServiceCall;
use radiohub_domain::time::{elapsed_between, now};

use crate::ports::radio::PolledState;
use crate::ports::{JobExecutor, RadioDevice, RadioDeviceExt, RadioPlatform};

struct RegisteredRadio {
    radio: Arc<dyn RadioDevice>,
    entity: Entity,
}

/// Result of dispatching a service call to one radio.
#[derive(Debug)]
pub struct CommandOutcome {
    pub entity_id: String,
    /// What the radio returned for the command.
    pub result: Result<bool, RadioHubError>,
    /// Snapshot taken after the command, for radios that are polled.
    pub entity: Option<Entity>,
}

impl CommandOutcome {
    /// Whether the radio accepted the command.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.result, Ok(true))
    }
}

/// Owns the registered radios and routes service calls to them.
///
/// Every device call goes through the injected [`JobExecutor`]; the
/// component itself only guards its snapshot map.
pub struct RadioComponent<E> {
    executor: E,
    radios: Mutex<BTreeMap<String, RegisteredRadio>>,
}

impl<E: JobExecutor> RadioComponent<E> {
    /// Create an empty component dispatching through `executor`.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            radios: Mutex::new(BTreeMap::new()),
        }
    }

    /// Set up a platform and register the radios it provides.
    ///
    /// # Errors
    ///
    /// Returns [`RadioHubError::NotReady`] when the platform could not reach
    /// its device (the caller should retry later), or any other setup error.
    pub async fn setup_platform<P>(&self, platform: &P) -> Result<Vec<String>, RadioHubError>
    where
        P: RadioPlatform + Sync,
    {
        match platform.setup(&self.executor).await {
            Ok(radios) => {
                tracing::info!(
                    platform = platform.name(),
                    count = radios.len(),
                    "platform set up"
                );
                self.add_radios(radios).await
            }
            Err(err) if err.is_not_ready() => {
                tracing::warn!(
                    platform = platform.name(),
                    error = %err,
                    "platform not ready, setup should be retried"
                );
                Err(err)
            }
            Err(err) => {
                tracing::error!(platform = platform.name(), error = %err, "platform setup failed");
                Err(err)
            }
        }
    }

    /// Register radios and take their first snapshot.
    ///
    /// Each radio gets the entity id `radio.<slug(name)>`, suffixed with
    /// `_2`, `_3`, … when that id is taken. Returns the assigned ids.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a radio has a blank name.
    pub async fn add_radios(
        &self,
        radios: Vec<Arc<dyn RadioDevice>>,
    ) -> Result<Vec<String>, RadioHubError> {
        let mut added = Vec::with_capacity(radios.len());
        for radio in radios {
            let entity_id = self.register(radio)?;
            tracing::info!(entity_id = %entity_id, "radio added");
            self.refresh(&entity_id).await?;
            added.push(entity_id);
        }
        Ok(added)
    }

    fn register(&self, radio: Arc<dyn RadioDevice>) -> Result<String, RadioHubError> {
        let mut radios = self.lock();
        let base = radio::entity_id_for(radio.name());
        let mut entity_id = base.clone();
        let mut suffix = 2;
        while radios.contains_key(&entity_id) {
            entity_id = format!("{base}_{suffix}");
            suffix += 1;
        }

        let mut builder = Entity::builder()
            .entity_id(entity_id.clone())
            .friendly_name(radio.name());
        if let Some(device) = radio.device_info() {
            builder = builder.device_id(device.id);
        }
        let entity = builder.build()?;

        radios.insert(entity_id.clone(), RegisteredRadio { radio, entity });
        Ok(entity_id)
    }

    /// Validate a raw service call and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`RadioHubError::Validation`] when the service is unknown or
    /// the payload does not match its schema. Per-radio failures are
    /// reported in the returned outcomes, never as an error.
    pub async fn handle_service_call(
        &self,
        service: &str,
        data: serde_json::Value,
    ) -> Result<Vec<CommandOutcome>, RadioHubError> {
        let call = ServiceCall::parse(service, data)?;
        Ok(self.dispatch(call).await)
    }

    /// Dispatch a validated call to every targeted radio, one after the
    /// other, then refresh the polled ones.
    ///
    /// Targets that are not registered are skipped with a warning.
    pub async fn dispatch(&self, call: ServiceCall) -> Vec<CommandOutcome> {
        let service = call.service();
        let targets = self.resolve_targets(call.targets.as_deref());

        let mut outcomes = Vec::with_capacity(targets.len());
        for (entity_id, radio) in targets {
            let result = radio
                .async_execute(&self.executor, call.command.clone())
                .await;
            match &result {
                Ok(true) => tracing::debug!(entity_id = %entity_id, %service, "command sent"),
                Ok(false) => {
                    tracing::warn!(
                        entity_id = %entity_id,
                        %service,
                        "radio reported command failure"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        entity_id = %entity_id,
                        %service,
                        error = %err,
                        "command failed"
                    );
                }
            }
            outcomes.push((entity_id, radio.should_poll(), result));
        }

        let mut reports = Vec::with_capacity(outcomes.len());
        for (entity_id, should_poll, result) in outcomes {
            let entity = if should_poll {
                self.refresh(&entity_id).await.ok()
            } else {
                self.entity(&entity_id)
            };
            reports.push(CommandOutcome {
                entity_id,
                result,
                entity,
            });
        }
        reports
    }

    fn resolve_targets(&self, targets: Option<&[String]>) -> Vec<(String, Arc<dyn RadioDevice>)> {
        let radios = self.lock();
        match targets {
            None => radios
                .iter()
                .map(|(id, registered)| (id.clone(), Arc::clone(&registered.radio)))
                .collect(),
            Some(ids) => ids
                .iter()
                .filter_map(|id| match radios.get(id) {
                    Some(registered) => Some((id.clone(), Arc::clone(&registered.radio))),
                    None => {
                        tracing::warn!(entity_id = %id, "service call targets an unknown radio");
                        None
                    }
                })
                .collect(),
        }
    }

    /// Poll one radio and store its snapshot.
    ///
    /// A poll that cannot complete marks the entity unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`RadioHubError::NotFound`] when `entity_id` is not registered.
    pub async fn refresh(&self, entity_id: &str) -> Result<Entity, RadioHubError> {
        let radio = self.radio(entity_id)?;
        let polled = radio.async_poll(&self.executor).await;

        let mut radios = self.lock();
        let registered = radios
            .get_mut(entity_id)
            .ok_or_else(|| not_found(entity_id))?;
        let ts = now();
        match polled {
            Ok(PolledState { is_on, attributes }) => {
                registered.entity.update_state(EntityState::from(is_on), ts);
                registered.entity.replace_attributes(attributes);
            }
            Err(err) => {
                tracing::warn!(entity_id = %entity_id, error = %err, "radio poll failed");
                registered.entity.update_state(EntityState::Unavailable, ts);
            }
        }
        tracing::trace!(
            entity_id = %entity_id,
            state = %registered.entity.state,
            "radio refreshed"
        );
        Ok(registered.entity.clone())
    }

    /// Poll every radio that asks to be polled and was not polled within
    /// [`MIN_TIME_BETWEEN_SCANS`]. Returns the refreshed snapshots.
    pub async fn refresh_all(&self) -> Vec<Entity> {
        let due: Vec<String> = {
            let radios = self.lock();
            let ts = now();
            radios
                .iter()
                .filter(|(_, registered)| registered.radio.should_poll())
                .filter(|(_, registered)| {
                    elapsed_between(registered.entity.last_updated, ts) >= MIN_TIME_BETWEEN_SCANS
                })
                .map(|(id, _)| id.clone())
                .collect()
        };

        let mut refreshed = Vec::with_capacity(due.len());
        for entity_id in due {
            if let Ok(entity) = self.refresh(&entity_id).await {
                refreshed.push(entity);
            }
        }
        refreshed
    }

    /// Whether a radio is on, or with `None`, whether any radio is on
    /// (the state of the "all radios" group).
    #[must_use]
    pub fn is_on(&self, entity_id: Option<&str>) -> bool {
        let radios = self.lock();
        match entity_id {
            Some(id) => radios
                .get(id)
                .is_some_and(|registered| registered.entity.state.is_on()),
            None => radios
                .values()
                .any(|registered| registered.entity.state.is_on()),
        }
    }

    /// Last snapshot of one radio.
    #[must_use]
    pub fn entity(&self, entity_id: &str) -> Option<Entity> {
        self.lock()
            .get(entity_id)
            .map(|registered| registered.entity.clone())
    }

    /// Last snapshots of every radio, ordered by entity id.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.lock()
            .values()
            .map(|registered| registered.entity.clone())
            .collect()
    }

    fn radio(&self, entity_id: &str) -> Result<Arc<dyn RadioDevice>, RadioHubError> {
        self.lock()
            .get(entity_id)
            .map(|registered| Arc::clone(&registered.radio))
            .ok_or_else(|| not_found(entity_id))
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, RegisteredRadio>> {
        self.radios.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(entity_id: &str) -> RadioHubError {
    NotFoundError {
        entity: "Entity",
        id: entity_id.to_string(),
    }
    .into()
}
