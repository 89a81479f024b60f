use thiserror::Error;

/// Terminal outcome of a failed backend computation. Every adapter-level
/// failure collapses to one of these; a partially normalized route is never
/// surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no route found between the given waypoints")]
    NoRouteFound,

    #[error("routing service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("invalid routing request: {0}")]
    InvalidRequest(String),
}
