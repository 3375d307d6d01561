use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use insights_core::{EventFilters, TimeRange, UsageEvent};

/// A collaborator (event store or tool directory) could not answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{collaborator} unavailable: {message}")]
pub struct UpstreamError {
    pub collaborator: &'static str,
    pub message: String,
}

impl UpstreamError {
    pub fn event_source(message: impl fmt::Display) -> Self {
        Self {
            collaborator: "event source",
            message: message.to_string(),
        }
    }

    pub fn name_resolver(message: impl fmt::Display) -> Self {
        Self {
            collaborator: "name resolver",
            message: message.to_string(),
        }
    }
}

/// Read access to persisted usage events.
///
/// An empty vector means the store holds no matching events; failures must
/// surface as `Err` so they are never mistaken for an empty window.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(
        &self,
        range: &TimeRange,
        filters: &EventFilters,
    ) -> Result<Vec<UsageEvent>, UpstreamError>;
}

/// Maps opaque tool ids to display names.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, tool_id: &str) -> Result<Option<String>, UpstreamError>;
}

/// Event source backed by a fixed list, filtered on every fetch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSource {
    events: Vec<UsageEvent>,
}

impl InMemoryEventSource {
    pub fn new(events: Vec<UsageEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for InMemoryEventSource {
    async fn fetch(
        &self,
        range: &TimeRange,
        filters: &EventFilters,
    ) -> Result<Vec<UsageEvent>, UpstreamError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.created_at.is_some_and(|ts| range.contains(ts)))
            .filter(|event| filters.matches(event))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    names: HashMap<String, String>,
}

impl StaticNameResolver {
    pub fn new<I, K, V>(names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve(&self, tool_id: &str) -> Result<Option<String>, UpstreamError> {
        Ok(self.names.get(tool_id).cloned())
    }
}
