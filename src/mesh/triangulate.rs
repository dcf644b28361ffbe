//! Quad to triangle conversion.

/// Split each quad `[a, b, c, d]` into triangles `[a, b, c]` and `[a, c, d]`.
///
/// The diagonal is always `a–c`; no attempt is made to pick the shorter one.
pub fn quads_to_tris(cells: &[[usize; 4]]) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(cells.len() * 2);
    for &[a, b, c, d] in cells {
        triangles.push([a, b, c]);
        triangles.push([a, c, d]);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_diagonal() {
        let tris = quads_to_tris(&[[4, 5, 6, 7], [0, 1, 2, 3]]);
        assert_eq!(tris, vec![[4, 5, 6], [4, 6, 7], [0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_empty() {
        assert!(quads_to_tris(&[]).is_empty());
    }
}
