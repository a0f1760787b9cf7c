use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::f32::consts::TAU;

use super::{Chord, ChordEnd, ChordGroup};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordSet {
    pub groups: Vec<ChordGroup>,
    pub chords: Vec<Chord>,
}

/// Splits the circle among the rows of `matrix` in proportion to their sums,
/// leaving `pad_angle` after every segment. Subgroups inside a segment are
/// laid out largest first; ties keep column order. One chord is produced per
/// unordered pair with a non-zero entry, in row-major order, with the larger
/// side as source.
pub(super) fn compute_chords(matrix: &[Vec<f32>], pad_angle: f32) -> ChordSet {
    let n = matrix.len();
    if n == 0 {
        return ChordSet::default();
    }

    let value = |i: usize, j: usize| matrix[i].get(j).copied().unwrap_or(0.0).max(0.0);
    let group_sums: Vec<f32> = (0..n).map(|i| (0..n).map(|j| value(i, j)).sum()).collect();
    let total: f32 = group_sums.iter().sum();
    let available = (TAU - pad_angle * n as f32).max(0.0);
    // Without weight (or without room left after padding) segments collapse to
    // zero width and are spread evenly instead of stacking at 12 o'clock.
    let (k, dx) = if total > 0.0 && available > 0.0 {
        (available / total, pad_angle)
    } else {
        (0.0, TAU / n as f32)
    };

    let mut groups = Vec::with_capacity(n);
    let mut pairs: BTreeMap<(usize, usize), (Option<ChordEnd>, Option<ChordEnd>)> = BTreeMap::new();
    let mut x = 0.0f32;

    for i in 0..n {
        let x0 = x;
        let mut subgroups: Vec<usize> = (0..n).filter(|&j| value(i, j) > 0.0).collect();
        subgroups.sort_by(|&a, &b| {
            value(i, b)
                .partial_cmp(&value(i, a))
                .unwrap_or(Ordering::Equal)
        });
        for j in subgroups {
            let v = value(i, j);
            let end = ChordEnd {
                index: i,
                start_angle: x,
                end_angle: x + v * k,
                value: v,
            };
            x = end.end_angle;
            let entry = pairs.entry((i.min(j), i.max(j))).or_default();
            if i < j {
                entry.0 = Some(end);
            } else {
                entry.1 = Some(end);
                if i == j {
                    entry.0 = Some(end);
                }
            }
        }
        groups.push(ChordGroup {
            index: i,
            start_angle: x0,
            end_angle: x,
            value: group_sums[i],
        });
        x += dx;
    }

    let chords = pairs
        .into_values()
        .filter_map(|(source, target)| {
            let source = source.or(target)?;
            let target = target.unwrap_or(source);
            Some(if source.value < target.value {
                Chord {
                    source: target,
                    target: source,
                }
            } else {
                Chord { source, target }
            })
        })
        .collect();

    ChordSet { groups, chords }
}
