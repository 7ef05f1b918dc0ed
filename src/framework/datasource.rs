//! Data-source plugin surface
//!
//! [`DataSource`] is the interface the host drives. Every Buddy data
//! source has the same read shape (validate, fetch, map, write back), so
//! each one only describes itself through a [`ReadSpec`] and the generic
//! [`Shell`] implements the host interface once for all of them.

use super::diag::{AttrPath, Diagnostic, DiagnosticKind, Diagnostics};
use super::record::Record;
use super::schema::Schema;
use super::value::StateValue;
use crate::buddy::BuddyApi;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-read context handed down by the host
#[derive(Debug, Clone, Default)]
pub struct ReadContext {
    cancel: CancellationToken,
}

impl ReadContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Outcome of a read: state is present only when no error was recorded
#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub state: Option<StateValue>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    fn aborted(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}

/// Interface the host drives for each data source type
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name exposed to the host, e.g. `buddy_project`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, ctx: &ReadContext, config: &StateValue) -> ReadResponse;
}

/// Description of one data source: its schema, how to fetch, how to map
#[async_trait]
pub trait ReadSpec: Send + Sync + 'static {
    /// Record read from configuration and written back as state
    type Model: Record + Send + Sync;
    /// Whatever the fetch step produces for the mapper
    type Dto: Send;

    const TYPE_NAME: &'static str;

    fn schema() -> Schema;

    /// Resolve the remote entity or list. Returns `None` after pushing an error.
    async fn fetch(
        api: &dyn BuddyApi,
        model: &Self::Model,
        diags: &mut Diagnostics,
    ) -> Option<Self::Dto>;

    /// Fill every declared attribute of the model from the fetched data
    fn map(model: Self::Model, dto: Self::Dto, diags: &mut Diagnostics) -> Self::Model;
}

/// Generic host adapter for a [`ReadSpec`]
pub struct Shell<S: ReadSpec> {
    api: Arc<dyn BuddyApi>,
    _spec: PhantomData<fn() -> S>,
}

impl<S: ReadSpec> Shell<S> {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self {
            api,
            _spec: PhantomData,
        }
    }
}

fn contains_unknown(value: &StateValue) -> bool {
    match value {
        StateValue::Unknown => true,
        StateValue::Set(items) => items.iter().any(contains_unknown),
        StateValue::Object(map) => map.values().any(contains_unknown),
        _ => false,
    }
}

#[async_trait]
impl<S: ReadSpec> DataSource for Shell<S> {
    fn type_name(&self) -> &'static str {
        S::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        S::schema()
    }

    async fn read(&self, ctx: &ReadContext, config: &StateValue) -> ReadResponse {
        let root = AttrPath::default();
        let schema = S::schema();
        let mut diags = schema.validate_config(config);
        if diags.has_error() {
            tracing::debug!(data_source = S::TYPE_NAME, "configuration rejected");
            return ReadResponse::aborted(diags);
        }

        let model = match S::Model::from_state(config, &root) {
            Ok(model) => model,
            Err(errors) => {
                diags.append(errors);
                return ReadResponse::aborted(diags);
            }
        };

        tracing::debug!(data_source = S::TYPE_NAME, "fetching");
        let mut fetch_diags = Diagnostics::new();
        let fetched = tokio::select! {
            biased;
            _ = ctx.token().cancelled() => {
                tracing::warn!(data_source = S::TYPE_NAME, "read cancelled");
                diags.push(Diagnostic::error(
                    DiagnosticKind::Cancelled,
                    "Read cancelled",
                    format!("reading {} was cancelled before it completed", S::TYPE_NAME),
                ));
                return ReadResponse::aborted(diags);
            }
            result = S::fetch(self.api.as_ref(), &model, &mut fetch_diags) => result,
        };
        diags.append(fetch_diags);
        let dto = match fetched {
            Some(dto) if !diags.has_error() => dto,
            _ => return ReadResponse::aborted(diags),
        };

        let model = S::map(model, dto, &mut diags);
        if diags.has_error() {
            return ReadResponse::aborted(diags);
        }

        let state = match model.to_state(&root) {
            Ok(state) => state,
            Err(errors) => {
                diags.append(errors);
                return ReadResponse::aborted(diags);
            }
        };
        if let Err(diag) = state.conforms(&schema.object_type(), &root) {
            diags.push(diag);
            return ReadResponse::aborted(diags);
        }
        if contains_unknown(&state) {
            diags.push(Diagnostic::mapping(
                None,
                format!("{} produced an unknown value after read", S::TYPE_NAME),
            ));
            return ReadResponse::aborted(diags);
        }

        tracing::info!(data_source = S::TYPE_NAME, "read complete");
        ReadResponse {
            state: Some(state),
            diagnostics: diags,
        }
    }
}
