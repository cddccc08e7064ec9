use crate::core::kmeans::{ClusteringError, KMeans};
use crate::models::{ClusterAssignment, Commuter, Roster, MIN_ROSTER_SIZE};
use thiserror::Error;

/// Number of carpool clusters. Fixed regardless of roster size.
pub const CARPOOL_CLUSTERS: usize = 2;

/// Precondition violations in carpool matching
///
/// These are configuration or programming errors, never recoverable per request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Roster needs at least {min} commuters for carpool matching, found {found}")]
    RosterTooSmall { min: usize, found: usize },

    #[error("Query commuter id {0} collides with a roster commuter")]
    IdCollision(u32),

    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
}

/// Result of the carpool matching process
#[derive(Debug, Clone, PartialEq)]
pub struct CarpoolMatches {
    /// Roster commuters sharing the query's cluster who prefer carpooling, ordered by id
    pub matches: Vec<Commuter>,
    /// Cluster label of the query commuter
    pub cluster: usize,
    /// Label of every commuter, roster first and the query commuter last
    pub assignments: Vec<ClusterAssignment>,
}

impl CarpoolMatches {
    pub fn ids(&self) -> Vec<u32> {
        self.matches.iter().map(|c| c.id).collect()
    }
}

/// Groups commuters by origin-destination similarity and suggests carpool partners
///
/// # Pipeline Stages
/// 1. Working copy of roster + query commuter features
/// 2. Two-way k-means partition
/// 3. Same-cluster filter, excluding the query commuter
/// 4. Carpool preference filter
#[derive(Debug, Clone)]
pub struct CarpoolMatcher {
    kmeans: KMeans,
}

impl CarpoolMatcher {
    /// Build a matcher from a clustering configuration; the cluster count is always forced to 2
    pub fn new(kmeans: KMeans) -> Self {
        Self {
            kmeans: KMeans {
                n_clusters: CARPOOL_CLUSTERS,
                ..kmeans
            },
        }
    }

    pub fn with_default_clustering() -> Self {
        Self::new(KMeans::new(CARPOOL_CLUSTERS))
    }

    pub fn kmeans(&self) -> &KMeans {
        &self.kmeans
    }

    /// Find carpool partners for `query` among `roster`
    ///
    /// Clusters are recomputed from scratch on every call; the roster itself
    /// is never modified.
    pub fn find_matches(&self, roster: &Roster, query: &Commuter) -> Result<CarpoolMatches, MatchError> {
        if roster.len() < MIN_ROSTER_SIZE {
            return Err(MatchError::RosterTooSmall {
                min: MIN_ROSTER_SIZE,
                found: roster.len(),
            });
        }
        if roster.contains_id(query.id) {
            return Err(MatchError::IdCollision(query.id));
        }

        // Stage 1: working copy
        let population: Vec<&Commuter> = roster.commuters().iter().chain(std::iter::once(query)).collect();
        let features: Vec<[f64; 4]> = population.iter().map(|c| c.features()).collect();

        // Stage 2: partition
        let fit = self.kmeans.fit(&features)?;
        let cluster = fit.labels[population.len() - 1];

        tracing::debug!(
            "Clustered {} commuters (inertia {:.6}, {} iterations), query {} in cluster {}",
            population.len(),
            fit.inertia,
            fit.iterations,
            query.id,
            cluster
        );

        // Stages 3 & 4
        let mut matches: Vec<Commuter> = population
            .iter()
            .zip(&fit.labels)
            .filter(|(commuter, label)| {
                **label == cluster && commuter.id != query.id && commuter.prefers_carpool()
            })
            .map(|(commuter, _)| (*commuter).clone())
            .collect();
        matches.sort_by_key(|c| c.id);

        let assignments = population
            .iter()
            .zip(&fit.labels)
            .map(|(commuter, &label)| ClusterAssignment {
                commuter_id: commuter.id,
                cluster: label,
            })
            .collect();

        Ok(CarpoolMatches {
            matches,
            cluster,
            assignments,
        })
    }
}

impl Default for CarpoolMatcher {
    fn default() -> Self {
        Self::with_default_clustering()
    }
}
