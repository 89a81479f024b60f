use crate::waypoint::Waypoint;

/// Reorders waypoints with a greedy nearest-neighbor scan.
///
/// The first waypoint is fixed as the anchor. From there, the closest
/// remaining waypoint by great-circle distance is appended repeatedly until
/// the pool is empty. Ties keep the candidate that appears earlier in the
/// original order (strict less-than scan), so the result is deterministic.
///
/// This is a heuristic approximation, not a shortest-tour solver: the
/// produced order carries no optimality guarantee. O(n²), which is fine for
/// the tens of stops a widget carries.
///
/// The input is left untouched; a new ordered sequence is returned.
pub fn optimize(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    if waypoints.len() <= 2 {
        return waypoints.to_vec();
    }

    let mut current = waypoints[0].position;
    let mut remaining: Vec<Waypoint> = waypoints[1..].to_vec();
    let mut ordered = Vec::with_capacity(waypoints.len());
    ordered.push(waypoints[0].clone());

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;

        for (index, candidate) in remaining.iter().enumerate() {
            let distance = current.haversine_distance(&candidate.position);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }

        let next = remaining.remove(best_index);
        current = next.position;
        ordered.push(next);
    }

    ordered
}
