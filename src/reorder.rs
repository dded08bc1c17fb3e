//! Adjacent-swap reordering used by the admin move up/down controls.

/// Direction of a one-step move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Up,
    Down,
}

impl Move {
    fn target(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Move::Up => index.checked_sub(1),
            Move::Down => (index + 1 < len).then_some(index + 1),
        }
    }
}

/// New ordering with the entry at `index` swapped with its neighbour.
///
/// Returns `None` when the move would leave the list (first entry up, last
/// entry down, single-entry lists, out-of-range index); the caller then
/// issues no request.
pub fn swap_adjacent<T: Copy>(ids: &[T], index: usize, dir: Move) -> Option<Vec<T>> {
    if index >= ids.len() {
        return None;
    }
    let target = dir.target(index, ids.len())?;
    let mut out = ids.to_vec();
    out.swap(index, target);
    Some(out)
}

/// Same as [`swap_adjacent`] but locates the entry by value.
pub fn move_id<T: Copy + PartialEq>(ids: &[T], id: T, dir: Move) -> Option<Vec<T>> {
    let index = ids.iter().position(|x| *x == id)?;
    swap_adjacent(ids, index, dir)
}

/// Whether the control for `dir` is offered at `index` in a list of `len`.
pub fn can_move(index: usize, len: usize, dir: Move) -> bool {
    index < len && dir.target(index, len).is_some()
}
