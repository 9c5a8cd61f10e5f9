use super::geometry::Point;
use super::model::{Edge, Entity};

/// Straight polyline routing.
///
/// An explicit route is returned as given. Otherwise the route runs from the
/// source entity's boundary through the routing points to the target
/// entity's boundary. A missing endpoint entity yields an empty route.
pub fn route_edge(edge: &Edge, source: Option<&Entity>, target: Option<&Entity>) -> Vec<Point> {
    if let Some(route) = &edge.route {
        return route.clone();
    }

    let (Some(source), Some(target)) = (source, target) else {
        return Vec::new();
    };

    let source_center = source.bounds.center();
    let target_center = target.bounds.center();

    let toward_source = edge.routing_points.first().copied().unwrap_or(target_center);
    let toward_target = edge.routing_points.last().copied().unwrap_or(source_center);

    let mut points = Vec::with_capacity(edge.routing_points.len() + 2);
    points.push(source.bounds.boundary_point(toward_source));
    points.extend_from_slice(&edge.routing_points);
    points.push(target.bounds.boundary_point(toward_target));
    points
}

#[cfg(test)]
mod tests {
    use super::super::geometry::Bounds;
    use super::super::model::EdgeKind;
    use super::*;

    fn entity(id: &str, x: f32, y: f32) -> Entity {
        Entity {
            id: id.to_string(),
            name: id.to_string(),
            bounds: Bounds::new(x, y, 100.0, 60.0),
            attributes: Vec::new(),
            expanded: true,
            selected: false,
            hover: false,
        }
    }

    fn edge(routing_points: Vec<Point>) -> Edge {
        Edge {
            id: "e".to_string(),
            kind: EdgeKind::Relationship,
            source: "a".to_string(),
            target: "b".to_string(),
            route: None,
            routing_points,
            children: Vec::new(),
            hover: false,
        }
    }

    #[test]
    fn straight_route_between_facing_boxes() {
        let a = entity("a", 0.0, 0.0);
        let b = entity("b", 300.0, 0.0);
        let points = route_edge(&edge(Vec::new()), Some(&a), Some(&b));

        assert_eq!(points.len(), 2);
        assert!((points[0].x - 100.0).abs() < 1e-3);
        assert!((points[0].y - 30.0).abs() < 1e-3);
        assert!((points[1].x - 300.0).abs() < 1e-3);
        assert!((points[1].y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn routing_points_sit_between_anchors() {
        let a = entity("a", 0.0, 0.0);
        let b = entity("b", 300.0, 200.0);
        let bend = Point::new(50.0, 230.0);
        let points = route_edge(&edge(vec![bend]), Some(&a), Some(&b));

        assert_eq!(points.len(), 3);
        assert_eq!(points[1], bend);
        // leaves `a` through its bottom side, enters `b` through its left side
        assert!((points[0].y - 60.0).abs() < 1e-3);
        assert!((points[2].x - 300.0).abs() < 1e-3);
    }

    #[test]
    fn missing_entity_gives_empty_route() {
        let a = entity("a", 0.0, 0.0);
        assert!(route_edge(&edge(Vec::new()), Some(&a), None).is_empty());
        assert!(route_edge(&edge(Vec::new()), None, None).is_empty());
    }

    #[test]
    fn explicit_route_wins_even_without_entities() {
        let mut e = edge(vec![Point::new(1.0, 1.0)]);
        e.route = Some(vec![Point::new(0.0, 0.0)]);
        assert_eq!(route_edge(&e, None, None), vec![Point::new(0.0, 0.0)]);
    }
}
