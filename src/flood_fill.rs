// Reachability analysis
//
// Counts the cells reachable from a start cell through in-bounds, unoccupied
// cells. Iterative with an explicit stack so that large boards cannot
// overflow the call stack.

use crate::board::BoardModel;
use crate::types::Coord;

/// Number of cells reachable from `start`, including `start` itself.
/// Returns 0 when `start` is out of bounds or occupied.
pub fn flood_fill(board: &BoardModel, start: Coord) -> usize {
    let mut visited = vec![false; board.area()];
    let mut stack = vec![start];
    let mut area = 0;

    while let Some(pos) = stack.pop() {
        let idx = match board.index(&pos) {
            Some(idx) => idx,
            None => continue,
        };
        if visited[idx] || board.is_occupied(&pos) {
            continue;
        }
        visited[idx] = true;
        area += 1;
        stack.extend(pos.neighbors());
    }

    area
}

/// Largest region reachable from any free neighbour of `pos`.
/// Used for cells that are themselves occupied, such as a snake's head.
pub fn reachable_from_neighbors(board: &BoardModel, pos: Coord) -> usize {
    pos.neighbors()
        .iter()
        .map(|n| flood_fill(board, *n))
        .max()
        .unwrap_or(0)
}
