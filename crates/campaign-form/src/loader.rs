//! Brand schema loading with request sequencing.
//!
//! Every load takes a ticket from a monotonic counter. When a response comes
//! back after a newer load was issued, it is discarded, so rapid brand
//! switching always ends on the brand selected last.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::backend::FormBackend;
use crate::catalog::Brand;
use crate::spec::form::FormSchema;

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Schema plus the model catalog needed to resolve sentinel options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSchema {
    pub schema: FormSchema,
    pub models: Vec<String>,
}

impl LoadedSchema {
    /// An empty schema means the brand has no form configured.
    pub fn is_configured(&self) -> bool {
        self.schema.is_configured()
    }
}

pub struct SchemaLoader<B> {
    backend: B,
    latest: AtomicU64,
}

impl<B: FormBackend> SchemaLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            latest: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Issues a ticket and loads `brand` under it.
    pub async fn load(&self, brand: &Brand) -> Option<LoadedSchema> {
        let ticket = self.issue();
        self.load_with(ticket, brand).await
    }

    /// Loads `brand`; `None` when `ticket` was superseded before the
    /// responses arrived.
    ///
    /// Failures never surface: a failed form fetch yields an empty schema and
    /// a failed model fetch an empty catalog.
    pub async fn load_with(&self, ticket: LoadTicket, brand: &Brand) -> Option<LoadedSchema> {
        debug!(brand = %brand.name, ticket = ticket.0, "loading form schema");

        let schema = match self.backend.form_document(&brand.name).await {
            Ok(document) => FormSchema::from_document(document),
            Err(failure) => {
                warn!(brand = %brand.name, error = %failure, "form schema unavailable");
                FormSchema::default()
            }
        };

        let models = match self.backend.models(&brand.id).await {
            Ok(models) => models.into_iter().map(|model| model.name).collect(),
            Err(failure) => {
                warn!(brand = %brand.id, error = %failure, "model catalog unavailable");
                Vec::new()
            }
        };

        if !self.is_current(ticket) {
            debug!(brand = %brand.name, ticket = ticket.0, "discarding stale schema response");
            return None;
        }

        info!(
            brand = %brand.name,
            questions = schema.questions().len(),
            steps = schema.total_steps(),
            models = models.len(),
            "form schema loaded"
        );
        Some(LoadedSchema { schema, models })
    }
}
