use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use insights_core::UsageEvent;

use crate::source::NameResolver;

/// Display names resolved for one aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolNames {
    names: HashMap<String, String>,
}

impl ToolNames {
    pub fn insert(&mut self, tool_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(tool_id.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn display_name(&self, tool_id: &str) -> String {
        self.names
            .get(tool_id)
            .cloned()
            .unwrap_or_else(|| fallback_tool_name(tool_id))
    }
}

pub fn fallback_tool_name(tool_id: &str) -> String {
    format!("Outil {tool_id}")
}

pub fn distinct_tool_ids(events: &[UsageEvent]) -> Vec<&str> {
    let mut seen = HashSet::new();
    events
        .iter()
        .map(|event| event.tool_id.as_str())
        .filter(|tool_id| seen.insert(*tool_id))
        .collect()
}

/// Looks up every distinct tool id once, concurrently.
///
/// A failed or empty lookup leaves the id unresolved so the synthesized
/// name is used. The caller bounds this call: running past the request
/// deadline still fails the request.
pub async fn resolve_tool_names(resolver: &dyn NameResolver, events: &[UsageEvent]) -> ToolNames {
    let ids = distinct_tool_ids(events);
    let lookups = ids
        .iter()
        .copied()
        .map(|tool_id| async move { (tool_id, resolver.resolve(tool_id).await) });
    let mut names = ToolNames::default();
    for (tool_id, result) in join_all(lookups).await {
        match result {
            Ok(Some(name)) if !name.trim().is_empty() => names.insert(tool_id, name),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(tool_id, error = %err, "tool name lookup failed, using fallback name");
            }
        }
    }
    tracing::debug!(requested = ids.len(), resolved = names.len(), "resolved tool names");
    names
}
