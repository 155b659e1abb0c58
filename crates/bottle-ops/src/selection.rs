//! Tolerance-based picking of body edges and faces.
//!
//! The pure functions work on geometry already fetched from the host; the
//! `select_*` wrappers fetch it through [`HostIntrospect`].

use bottle_types::{approx_eq, points_coincide, EdgeGeometry, SurfaceGeometry};
use cad_host::{BodyHandle, HostId, HostIntrospect};
use tracing::debug;

use crate::types::OpError;

/// Circular edges whose radius is within `tol` of any target radius.
pub fn edges_matching_radii(
    edges: &[(HostId, EdgeGeometry)],
    targets: &[f64],
    tol: f64,
) -> Vec<HostId> {
    edges
        .iter()
        .filter(|(_, geom)| {
            geom.radius()
                .is_some_and(|r| targets.iter().any(|t| approx_eq(r, *t, tol)))
        })
        .map(|(id, _)| *id)
        .collect()
}

/// First planar face whose first bounding edge is a circle centered at `center`.
pub fn top_face(
    faces: &[(HostId, SurfaceGeometry, Option<EdgeGeometry>)],
    center: [f64; 3],
    tol: f64,
) -> Option<HostId> {
    faces
        .iter()
        .find(|(_, surface, first_edge)| {
            surface.is_planar()
                && first_edge
                    .and_then(|e| e.center())
                    .is_some_and(|c| points_coincide(c, center, tol))
        })
        .map(|(id, _, _)| *id)
}

/// First cylindrical face with radius within `tol` of `radius`.
pub fn cylinder_face(faces: &[(HostId, SurfaceGeometry)], radius: f64, tol: f64) -> Option<HostId> {
    faces
        .iter()
        .find(|(_, surface)| {
            surface
                .cylinder_radius()
                .is_some_and(|r| approx_eq(r, radius, tol))
        })
        .map(|(id, _)| *id)
}

/// Every edge of `body` with its geometry, in host order.
pub fn body_edges(
    host: &dyn HostIntrospect,
    body: &BodyHandle,
) -> Result<Vec<(HostId, EdgeGeometry)>, OpError> {
    host.list_edges(body)
        .into_iter()
        .map(|id| -> Result<_, OpError> { Ok((id, host.edge_geometry(id)?)) })
        .collect()
}

pub fn select_edges_by_radius(
    host: &dyn HostIntrospect,
    body: &BodyHandle,
    targets: &[f64],
    tol: f64,
) -> Result<Vec<HostId>, OpError> {
    let edges = body_edges(host, body)?;
    let selected = edges_matching_radii(&edges, targets, tol);
    debug!(total = edges.len(), selected = selected.len(), ?targets, "edges by radius");
    Ok(selected)
}

pub fn select_top_face(
    host: &dyn HostIntrospect,
    body: &BodyHandle,
    center: [f64; 3],
    tol: f64,
) -> Result<Option<HostId>, OpError> {
    let mut faces = Vec::new();
    for id in host.list_faces(body) {
        let surface = host.face_geometry(id)?;
        let first_edge = match host.face_edges(id).first() {
            Some(e) => Some(host.edge_geometry(*e)?),
            None => None,
        };
        faces.push((id, surface, first_edge));
    }
    let found = top_face(&faces, center, tol);
    debug!(?found, ?center, "top face");
    Ok(found)
}

pub fn select_cylinder_face(
    host: &dyn HostIntrospect,
    body: &BodyHandle,
    radius: f64,
    tol: f64,
) -> Result<Option<HostId>, OpError> {
    let faces = host
        .list_faces(body)
        .into_iter()
        .map(|id| -> Result<_, OpError> { Ok((id, host.face_geometry(id)?)) })
        .collect::<Result<Vec<_>, OpError>>()?;
    let found = cylinder_face(&faces, radius, tol);
    debug!(?found, radius, "cylinder face");
    Ok(found)
}
