use crate::primitives::PrimitiveVertex;

/// Unit quad centered on the local origin, as two triangles.
///
/// WebGPU point-list primitives are always a single pixel, so the
/// "point" the original point shader drew with a point-size uniform is
/// rendered as a quad scaled to the configured point size instead.
pub fn point_vertices() -> Vec<PrimitiveVertex> {
    vec![
        PrimitiveVertex {
            position: [-0.5, -0.5, 0.0],
        },
        PrimitiveVertex {
            position: [0.5, -0.5, 0.0],
        },
        PrimitiveVertex {
            position: [0.5, 0.5, 0.0],
        },
        PrimitiveVertex {
            position: [-0.5, -0.5, 0.0],
        },
        PrimitiveVertex {
            position: [0.5, 0.5, 0.0],
        },
        PrimitiveVertex {
            position: [-0.5, 0.5, 0.0],
        },
    ]
}
