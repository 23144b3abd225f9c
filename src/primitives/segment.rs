use crate::primitives::PrimitiveVertex;

/// Unit line segment from the local origin along +x. The model matrix
/// rotates and scales it to span two accumulated chain positions.
pub fn segment_vertices() -> Vec<PrimitiveVertex> {
    vec![
        PrimitiveVertex {
            position: [0.0, 0.0, 0.0],
        },
        PrimitiveVertex {
            position: [1.0, 0.0, 0.0],
        },
    ]
}
