use super::scene::Polyline;
use crate::field::FieldData;
use crate::math::StatsHelper;
use crate::prelude::ContourConfig;
use std::collections::{HashMap, VecDeque};

/// Iso-contours of the potential at one level.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevel {
    pub level: f64,
    pub paths: Vec<Polyline>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

use Side::{Bottom, Left, Right, Top};

type Segment = (usize, usize);

/// Marching-squares extraction over the valid cells of the potential grid.
/// Cells touching a masked sample produce nothing, so contours never enter
/// the exclusion zones.
#[derive(Debug, Clone)]
pub struct ContourExtractor {
    levels: Vec<f64>,
}

impl ContourExtractor {
    /// `levels` must be sorted ascending.
    pub fn new(levels: Vec<f64>) -> Self {
        Self { levels }
    }

    pub fn from_config(config: &ContourConfig) -> Self {
        Self::new(StatsHelper::linspace(
            config.min_level,
            config.max_level,
            config.levels,
        ))
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn extract(&self, field: &FieldData) -> Vec<ContourLevel> {
        let n = field.grid().resolution();
        let v = &field.potential;
        let mut per_level: Vec<Vec<Segment>> = vec![Vec::new(); self.levels.len()];

        for j in 0..n - 1 {
            for i in 0..n - 1 {
                if !(field.is_valid(j, i)
                    && field.is_valid(j, i + 1)
                    && field.is_valid(j + 1, i + 1)
                    && field.is_valid(j + 1, i))
                {
                    continue;
                }
                let corners = [v[[j, i]], v[[j, i + 1]], v[[j + 1, i + 1]], v[[j + 1, i]]];
                let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);

                let first = self.levels.partition_point(|&level| level < lo);
                for (k, &level) in self.levels.iter().enumerate().skip(first) {
                    if level >= hi {
                        break;
                    }
                    let case = corners
                        .iter()
                        .enumerate()
                        .fold(0u8, |acc, (bit, &value)| {
                            acc | (u8::from(value > level) << bit)
                        });
                    let center_above = corners.iter().sum::<f64>() / 4.0 > level;
                    for (from, to) in cell_segments(case, center_above).into_iter().flatten() {
                        per_level[k].push((edge_id(n, j, i, from), edge_id(n, j, i, to)));
                    }
                }
            }
        }

        self.levels
            .iter()
            .zip(per_level)
            .map(|(&level, segments)| ContourLevel {
                level,
                paths: stitch(&segments)
                    .into_iter()
                    .map(|(edges, closed)| {
                        let points = edges
                            .into_iter()
                            .map(|edge| edge_point(field, n, edge, level))
                            .collect();
                        if closed {
                            Polyline::closed(points)
                        } else {
                            Polyline::open(points)
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Corner bits: 1 bottom-left, 2 bottom-right, 4 top-right, 8 top-left.
/// Saddles are resolved with the cell-center average.
fn cell_segments(case: u8, center_above: bool) -> [Option<(Side, Side)>; 2] {
    match case {
        1 | 14 => [Some((Left, Bottom)), None],
        2 | 13 => [Some((Bottom, Right)), None],
        3 | 12 => [Some((Left, Right)), None],
        4 | 11 => [Some((Right, Top)), None],
        6 | 9 => [Some((Bottom, Top)), None],
        7 | 8 => [Some((Left, Top)), None],
        5 if center_above => [Some((Bottom, Right)), Some((Top, Left))],
        5 => [Some((Left, Bottom)), Some((Right, Top))],
        10 if center_above => [Some((Left, Bottom)), Some((Right, Top))],
        10 => [Some((Bottom, Right)), Some((Top, Left))],
        _ => [None, None],
    }
}

/// Horizontal edge (j,i)-(j,i+1) → even id, vertical edge (j,i)-(j+1,i) → odd id.
fn edge_id(n: usize, j: usize, i: usize, side: Side) -> usize {
    match side {
        Bottom => 2 * (j * n + i),
        Top => 2 * ((j + 1) * n + i),
        Left => 2 * (j * n + i) + 1,
        Right => 2 * (j * n + i + 1) + 1,
    }
}

fn edge_point(field: &FieldData, n: usize, edge: usize, level: f64) -> (f64, f64) {
    let coords = field.grid().coords();
    let node = edge / 2;
    let (j, i) = (node / n, node % n);
    let v0 = field.potential[[j, i]];
    let (j1, i1) = if edge % 2 == 0 { (j, i + 1) } else { (j + 1, i) };
    let v1 = field.potential[[j1, i1]];
    let t = if v1 == v0 { 0.5 } else { (level - v0) / (v1 - v0) };
    (
        coords[i] + t * (coords[i1] - coords[i]),
        coords[j] + t * (coords[j1] - coords[j]),
    )
}

/// Joins segments that share an edge into chains of edge ids. Every interior
/// edge is shared by at most two segments.
fn stitch(segments: &[Segment]) -> Vec<(Vec<usize>, bool)> {
    let mut by_edge: HashMap<usize, Vec<usize>> = HashMap::new();
    for (index, &(a, b)) in segments.iter().enumerate() {
        by_edge.entry(a).or_default().push(index);
        by_edge.entry(b).or_default().push(index);
    }
    let mut visited = vec![false; segments.len()];

    let mut take = |edge: usize, visited: &mut Vec<bool>| -> Option<usize> {
        let candidates = by_edge.get_mut(&edge)?;
        let position = candidates.iter().position(|&s| !visited[s])?;
        let segment = candidates.swap_remove(position);
        visited[segment] = true;
        let (a, b) = segments[segment];
        Some(if a == edge { b } else { a })
    };

    let mut chains = Vec::new();
    for start in 0..segments.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let (a, b) = segments[start];
        let mut chain = VecDeque::from([a, b]);
        let mut closed = false;

        let mut tail = b;
        while let Some(next) = take(tail, &mut visited) {
            if next == a {
                closed = true;
                break;
            }
            chain.push_back(next);
            tail = next;
        }
        if !closed {
            let mut head = a;
            while let Some(next) = take(head, &mut visited) {
                chain.push_front(next);
                head = next;
            }
        }
        chains.push((chain.into_iter().collect(), closed));
    }
    chains
}
