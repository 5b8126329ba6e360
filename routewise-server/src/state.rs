use std::sync::Arc;
use std::time::Instant;

use routewise_core::{GraphSource, PlannerOptions, RoadGraph, create_road_graph};
use tokio::sync::{OnceCell, OwnedSemaphorePermit, Semaphore};

use crate::error::ApiError;

/// Shared by every request. The graph is loaded at most once per process.
pub struct AppState {
    graph: OnceCell<Arc<RoadGraph>>,
    source: GraphSource,
    /// Bounds planning jobs still running on blocking threads, including
    /// those whose request already timed out
    planning: Arc<Semaphore>,
    pub options: PlannerOptions,
}

impl AppState {
    /// State whose graph is loaded on first use
    pub fn new(source: GraphSource, options: PlannerOptions, planning_slots: usize) -> Self {
        Self {
            graph: OnceCell::new(),
            source,
            planning: Arc::new(Semaphore::new(planning_slots)),
            options,
        }
    }

    /// State around an already built graph
    #[cfg(test)]
    pub fn with_graph(graph: RoadGraph, options: PlannerOptions, planning_slots: usize) -> Self {
        Self {
            graph: OnceCell::new_with(Some(Arc::new(graph))),
            source: GraphSource::new(""),
            planning: Arc::new(Semaphore::new(planning_slots)),
            options,
        }
    }

    /// Returns the graph, loading it on a blocking thread the first time.
    /// Concurrent callers wait for the same load; a failed load is retried
    /// by the next caller.
    pub async fn graph(&self) -> Result<Arc<RoadGraph>, ApiError> {
        let graph = self
            .graph
            .get_or_try_init(|| async {
                let source = self.source.clone();
                let started = Instant::now();
                let graph = tokio::task::spawn_blocking(move || create_road_graph(&source))
                    .await??;
                tracing::info!(
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    elapsed = ?started.elapsed(),
                    "Road graph ready"
                );
                Ok::<_, ApiError>(Arc::new(graph))
            })
            .await?;
        Ok(Arc::clone(graph))
    }

    /// Waits for a planning slot. The permit is meant to be moved into the
    /// blocking job so the slot stays taken until the job finishes.
    pub async fn planning_permit(&self) -> Result<OwnedSemaphorePermit, ApiError> {
        Arc::clone(&self.planning)
            .acquire_owned()
            .await
            .map_err(|e| ApiError::Internal(format!("Planning slots closed: {e}")))
    }

    pub fn is_loaded(&self) -> bool {
        self.graph.initialized()
    }
}
