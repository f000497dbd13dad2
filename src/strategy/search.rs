//! Bounded-depth worst-case search
//!
//! A candidate move is scored by playing it on a copy of the board, then
//! enumerating every way the rest of the round can unfold. The deciding
//! player assumes the opponents jointly pick whatever hurts them most, so a
//! move is worth the minimum over those round variations. Deeper searches
//! take the deciding player's best reply on each variation before taking the
//! minimum.
//!
//! The search is deterministic: the same board, order and evaluator always
//! produce the same scores and the same chosen move.

use log::trace;

use crate::{board::Board, cancel::CancelToken, strategy::Evaluator, Result, TurnError};

/// Scores `mv` for `player` looking `depth` rounds ahead
///
/// * depth 0 evaluates `board` as it stands.
/// * depth 1 plays `mv`, enumerates the rest of the round and returns the
///   lowest evaluation among the resulting boards.
/// * deeper searches take, on every variation, the best of the player's
///   distinct moves scored at `depth - 1`, then the lowest of those.
///
/// A player left without legal moves on a variation scores
/// `f64::NEG_INFINITY` there.
pub fn estimate_turn<B, E>(
    mv: &B::Move,
    depth: usize,
    evaluator: &E,
    player: B::Player,
    order: &[B::Player],
    board: &B,
    cancel: &CancelToken,
) -> Result<f64>
where
    B: Board,
    E: Evaluator<B> + ?Sized,
{
    if depth == 0 {
        return Ok(evaluator.evaluate(board, player));
    }
    cancel.check()?;

    let mut after = board.clone();
    after.apply_move(player, mv).for_each(drop);

    let mut worst = f64::INFINITY;
    for variation in round_variations(after, player, order, cancel)? {
        let score = if depth == 1 {
            evaluator.evaluate(&variation, player)
        } else {
            best_reply(&variation, depth - 1, evaluator, player, order, cancel)?
        };
        if score < worst {
            worst = score;
        }
    }
    Ok(worst)
}

/// Picks the move maximizing [`estimate_turn`]
///
/// Ties go to the first maximal move in the board's move order.
pub fn best_move<B, E>(
    board: &B,
    player: B::Player,
    order: &[B::Player],
    depth: usize,
    evaluator: &E,
    cancel: &CancelToken,
) -> Result<B::Move>
where
    B: Board,
    E: Evaluator<B> + ?Sized,
{
    let mut best: Option<(B::Move, f64)> = None;
    for mv in board.distinct_legal_moves(player) {
        let score = estimate_turn(&mv, depth, evaluator, player, order, board, cancel)?;
        trace!("{:?} scores {:?} for {:?} at depth {}", mv, score, player, depth);
        match &best {
            Some((_, best_score)) if score <= *best_score => {}
            _ => best = Some((mv, score)),
        }
    }
    best.map(|(mv, _)| mv).ok_or(TurnError::NoLegalMoves)
}

fn best_reply<B, E>(
    board: &B,
    depth: usize,
    evaluator: &E,
    player: B::Player,
    order: &[B::Player],
    cancel: &CancelToken,
) -> Result<f64>
where
    B: Board,
    E: Evaluator<B> + ?Sized,
{
    let mut best = f64::NEG_INFINITY;
    for mv in board.distinct_legal_moves(player) {
        let score = estimate_turn(&mv, depth, evaluator, player, order, board, cancel)?;
        if score > best {
            best = score;
        }
    }
    Ok(best)
}

/// Enumerates every board reachable once the round after `player`'s move is
/// over
///
/// Up to `order.len() - 1` further plies are played, each by the next live
/// player after the previous mover. A branch stops early when the turn comes
/// back to `player`, when nobody else is alive, or when the mover has no
/// legal move; its board is returned unchanged from that point.
pub fn round_variations<B: Board>(
    board: B,
    player: B::Player,
    order: &[B::Player],
    cancel: &CancelToken,
) -> Result<Vec<B>> {
    let plies = order.len().saturating_sub(1);
    let mut finished = Vec::new();
    let mut frontier = vec![(board, player)];

    for _ in 0..plies {
        let mut next = Vec::with_capacity(frontier.len());
        for (board, last) in frontier {
            cancel.check()?;
            let mover = match next_alive(&board, order, last) {
                Some(mover) if mover != player => mover,
                _ => {
                    finished.push(board);
                    continue;
                }
            };
            let moves = board.distinct_legal_moves(mover);
            if moves.is_empty() {
                finished.push(board);
                continue;
            }
            for mv in &moves {
                let mut child = board.clone();
                child.apply_move(mover, mv).for_each(drop);
                next.push((child, mover));
            }
        }
        frontier = next;
    }

    finished.extend(frontier.into_iter().map(|(board, _)| board));
    Ok(finished)
}

/// Returns the first live player after `after` in `order`, never `after` itself
fn next_alive<B: Board>(board: &B, order: &[B::Player], after: B::Player) -> Option<B::Player> {
    let len = order.len();
    let start = order.iter().position(|&p| p == after)?;
    (1..len)
        .map(|offset| order[(start + offset) % len])
        .find(|&candidate| board.is_alive(candidate))
}
