use crate::{
    catalog::CatalogState,
    errors::CatalogError,
    introspect::discover,
    models::{NewPermissionRecord, PermissionRecord, RouteDescriptor},
    route_table::RouteTable,
};

/// SyncOutcome
///
/// What happened to one descriptor during a synchronization pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// No record existed; one was created with the discovery defaults.
    Created(PermissionRecord),
    /// A record for `(path, method)` was already catalogued. Left untouched.
    AlreadyExists,
    /// The create hit the uniqueness constraint because a concurrent pass got there
    /// first. Equivalent to `AlreadyExists`.
    LostRace,
    /// The store failed on the existence check or the create. The descriptor is
    /// skipped and picked up again on the next boot.
    Failed(String),
}

impl SyncOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SyncOutcome::AlreadyExists | SyncOutcome::LostRace)
    }
}

/// SyncReport
///
/// Per-descriptor outcomes of one pass, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub outcomes: Vec<(RouteDescriptor, SyncOutcome)>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Created(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(SyncOutcome::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// PermissionSynchronizer
///
/// Reconciles discovered routes against the permission catalog. Strictly additive:
/// existing records are never updated or removed, and no store failure escapes `sync`.
/// Runs once at startup, before the listener is bound.
pub struct PermissionSynchronizer {
    catalog: CatalogState,
}

impl PermissionSynchronizer {
    pub fn new(catalog: CatalogState) -> Self {
        Self { catalog }
    }

    /// sync
    ///
    /// Creates a catalog record for every descriptor whose `(path, method)` key is not
    /// yet present. Descriptors are handled one at a time and independently, so a
    /// failure on one never stops the rest. Running the pass again over the same
    /// descriptors creates nothing new.
    pub async fn sync(&self, descriptors: &[RouteDescriptor]) -> SyncReport {
        let mut report = SyncReport::default();

        for descriptor in descriptors {
            let outcome = self.sync_one(descriptor).await;
            report.outcomes.push((descriptor.clone(), outcome));
        }

        if report.failed() > 0 {
            tracing::warn!(
                created = report.created(),
                skipped = report.skipped(),
                failed = report.failed(),
                "route permission sync finished with failures; affected routes retry on next start"
            );
        } else {
            tracing::info!(
                created = report.created(),
                skipped = report.skipped(),
                "route permission sync finished"
            );
        }

        report
    }

    async fn sync_one(&self, descriptor: &RouteDescriptor) -> SyncOutcome {
        let path = descriptor.path.as_str();
        let method = descriptor.method;

        match self.catalog.exists_by_key(path, method).await {
            Ok(true) => return SyncOutcome::AlreadyExists,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(%path, %method, error = %e, "permission existence check failed");
                return SyncOutcome::Failed(e.to_string());
            }
        }

        match self
            .catalog
            .create(NewPermissionRecord::discovered(descriptor))
            .await
        {
            Ok(record) => {
                tracing::info!(%path, %method, id = record.id, "registered route permission");
                SyncOutcome::Created(record)
            }
            Err(CatalogError::Conflict { .. }) => {
                tracing::debug!(%path, %method, "route permission created concurrently, skipping");
                SyncOutcome::LostRace
            }
            Err(e) => {
                tracing::error!(%path, %method, error = %e, "failed to create route permission");
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}

/// sync_routes
///
/// Startup entry point: discovers the catalogued endpoints of `table` under `prefix`
/// and reconciles them against `catalog`.
pub async fn sync_routes(catalog: CatalogState, table: &RouteTable, prefix: &str) -> SyncReport {
    let descriptors = discover(table, prefix);
    tracing::debug!(discovered = descriptors.len(), "discovered catalogued routes");
    PermissionSynchronizer::new(catalog).sync(&descriptors).await
}
