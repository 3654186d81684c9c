//! Dense linear algebra for the correlation-based tests.

/// Sample correlation matrix of `columns`. A zero-variance column yields
/// `NaN` in its row and column, which the tests treat as degenerate.
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    let p = columns.len();
    let n = columns.first().map_or(0, |c| c.len());
    let means: Vec<f64> = columns
        .iter()
        .map(|c| if n == 0 { 0.0 } else { c.iter().sum::<f64>() / n as f64 })
        .collect();

    let mut cov = vec![vec![0.0; p]; p];
    for i in 0..p {
        for j in i..p {
            let s: f64 = columns[i]
                .iter()
                .zip(columns[j].iter())
                .map(|(a, b)| (a - means[i]) * (b - means[j]))
                .sum();
            cov[i][j] = s;
            cov[j][i] = s;
        }
    }

    let mut corr = vec![vec![f64::NAN; p]; p];
    for i in 0..p {
        for j in 0..p {
            let denom = (cov[i][i] * cov[j][j]).sqrt();
            if denom > 0.0 {
                corr[i][j] = cov[i][j] / denom;
            }
        }
    }
    corr
}

/// The square submatrix of `m` over `indices`.
pub fn submatrix(m: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    indices
        .iter()
        .map(|&i| indices.iter().map(|&j| m[i][j]).collect())
        .collect()
}

/// Gauss-Jordan inverse with partial pivoting. `None` when a pivot falls
/// below `tolerance` or an entry is not finite.
pub fn invert(m: &[Vec<f64>], tolerance: f64) -> Option<Vec<Vec<f64>>> {
    let n = m.len();
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }
    let mut a: Vec<Vec<f64>> = m.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot][col].abs() < tolerance {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let d = a[col][col];
        for j in 0..n {
            a[col][j] /= d;
            inv[col][j] /= d;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

/// Partial correlation of `x` and `y` given `z`, read off the inverse of
/// the `(x, y, z)` correlation submatrix. `None` when the submatrix is
/// singular or the result is not a finite value in `[-1, 1]`.
pub fn partial_correlation(corr: &[Vec<f64>], x: usize, y: usize, z: &[usize], tolerance: f64) -> Option<f64> {
    let r = if z.is_empty() {
        corr[x][y]
    } else {
        let mut indices = vec![x, y];
        indices.extend_from_slice(z);
        let inv = invert(&submatrix(corr, &indices), tolerance)?;
        let denom = (inv[0][0] * inv[1][1]).sqrt();
        if !(denom > 0.0) {
            return None;
        }
        -inv[0][1] / denom
    };
    if r.is_finite() && r.abs() <= 1.0 + 1e-12 {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}
