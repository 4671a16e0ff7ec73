//! # Ruby Label Placement
//!
//! Positions the ruby labels of one line so that they do not overlap each
//! other or the line's edges, while moving each as little as possible from
//! its ideal (centred) position.
//!
//! With ideal centres `r`, widths `w`, and line width `L`, find centres `o`
//! minimising `Σ (o[i] - r[i])²` subject to
//!
//! ```text
//! o[0] - w[0]/2                  >= 0
//! o[i] - o[i-1]                  >= (w[i-1] + w[i]) / 2     for every i >= 1
//! o[n-1] + w[n-1]/2              <= L
//! ```
//!
//! Let `c` be the centres of the labels packed tightly from the left edge and
//! substitute `y = o - c`. The pairwise constraints become `y` non-decreasing,
//! and the edge constraints become `0 <= y <= U` with
//! `U = L - w[n-1]/2 - c[n-1]`. That is bounded isotonic regression of
//! `r - c`: pool-adjacent-violators gives the unbounded fit, and clamping it
//! to `[0, U]` gives the bounded optimum. The objective is strictly convex,
//! so the optimum is unique.
//!
//! When `U < 0` the labels are wider than the line together and no feasible
//! placement exists. The labels are then packed edge to edge and the overflow
//! is split evenly past both ends of the line, which is the least-squares
//! minimiser of the two edge violations with all non-overlap constraints
//! still exact.

/// Solved centres for one line's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub offsets: Vec<f64>,
    /// `false` if the labels did not fit the line and overflow both edges.
    pub feasible: bool,
}

/// Place labels with ideal centres `ideal` and widths `widths` on a line of
/// width `line_width`.
///
/// Returns `None` if any input is non-finite; callers keep the ideal offsets.
pub fn solve(ideal: &[f64], widths: &[f64], line_width: f64) -> Option<Placement> {
    debug_assert_eq!(ideal.len(), widths.len());
    let n = ideal.len().min(widths.len());
    if n == 0 {
        return Some(Placement {
            offsets: Vec::new(),
            feasible: true,
        });
    }

    let finite = line_width.is_finite()
        && ideal[..n].iter().all(|v| v.is_finite())
        && widths[..n].iter().all(|v| v.is_finite());
    if !finite {
        return None;
    }

    let mut packed = Vec::with_capacity(n);
    let mut c = 0.5 * widths[0];
    packed.push(c);
    for i in 1..n {
        c += 0.5 * (widths[i - 1] + widths[i]);
        packed.push(c);
    }

    let upper = line_width - 0.5 * widths[n - 1] - packed[n - 1];
    let (shift, feasible) = if upper >= 0.0 {
        let targets: Vec<f64> = (0..n).map(|i| ideal[i] - packed[i]).collect();
        let fitted = isotonic_fit(&targets)
            .into_iter()
            .map(|y| y.max(0.0).min(upper))
            .collect();
        (fitted, true)
    } else {
        (vec![0.5 * upper; n], false)
    };

    let offsets = packed.iter().zip(shift).map(|(c, y)| c + y).collect();
    Some(Placement { offsets, feasible })
}

/// Least-squares non-decreasing fit (pool adjacent violators).
fn isotonic_fit(targets: &[f64]) -> Vec<f64> {
    // (sum, count) per pooled block
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(targets.len());
    for &t in targets {
        blocks.push((t, 1));
        while blocks.len() >= 2 {
            let (s2, n2) = blocks[blocks.len() - 1];
            let (s1, n1) = blocks[blocks.len() - 2];
            if s1 / n1 as f64 <= s2 / n2 as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (s1 + s2, n1 + n2);
        }
    }

    let mut fitted = Vec::with_capacity(targets.len());
    for (sum, count) in blocks {
        let mean = sum / count as f64;
        fitted.extend(std::iter::repeat(mean).take(count));
    }
    fitted
}
