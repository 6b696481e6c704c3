use chess_rules::board::Board;
use chess_rules::error::{MoveError, RoomError};
use chess_rules::game::{apply_move, new_game, undo, ClickResult, Game, Phase, UndoResult};
use chess_rules::history::{History, Snapshot};
use chess_rules::legality::{all_legal_moves, is_in_check};
use chess_rules::room::{Lobby, RoomEvent};
use chess_rules::types::{
    CapturedLedger, CastleSide, CastlingRights, Color, Outcome, Piece, PieceKind, Position, Status,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn p(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

fn play(game: &mut Game, moves: &[((u8, u8), (u8, u8))]) -> Outcome {
    let mut outcome = Outcome::Ok;
    for &((fr, fc), (tr, tc)) in moves {
        outcome = game.apply_move(p(fr, fc), p(tr, tc)).unwrap();
    }
    outcome
}

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    let outcome = play(
        &mut game,
        &[
            ((6, 4), (4, 4)),
            ((1, 4), (3, 4)),
            ((7, 5), (4, 2)),
            ((0, 1), (2, 2)),
            ((7, 3), (3, 7)),
            ((0, 6), (2, 5)),
            ((3, 7), (1, 5)),
        ],
    );
    assert_eq!(outcome, Outcome::Checkmate(Color::White));
    assert_eq!(game.status(), Status::Checkmate(Color::White));
    assert_eq!(game.phase(), Phase::Checkmate(Color::White));
    assert_eq!(game.check(), Some(Color::Black));

    let taken: Vec<Piece> = game.ledger().captured_by(Color::White).collect();
    assert_eq!(taken, vec![Piece::new(PieceKind::Pawn, Color::Black)]);
    assert_eq!(game.ledger().captured_by(Color::Black).count(), 0);

    assert_eq!(
        game.apply_move(p(1, 0), p(2, 0)),
        Err(MoveError::GameOver(Status::Checkmate(Color::White)))
    );
    assert_eq!(game.click(p(6, 0)), ClickResult::Ignored);

    // taking back the mate reopens the game
    assert_eq!(game.undo(), UndoResult::Restored);
    assert_eq!(game.status(), Status::InProgress);
    assert_eq!(game.side_to_move(), Color::White);
    assert!(game.ledger().is_empty());
}

#[test]
fn castle_through_the_session() {
    // e4 e5, Nf3 Nc6, Bc4 Bc5 clears white's kingside
    let mut game = Game::new();
    play(
        &mut game,
        &[
            ((6, 4), (4, 4)),
            ((1, 4), (3, 4)),
            ((7, 6), (5, 5)),
            ((0, 1), (2, 2)),
            ((7, 5), (4, 2)),
            ((0, 5), (3, 2)),
        ],
    );
    assert!(game.legal_destinations(p(7, 4)).contains(&p(7, 6)));
    assert!(!game.legal_destinations(p(7, 4)).contains(&p(7, 2)));

    assert_eq!(game.apply_move(p(7, 4), p(7, 6)), Ok(Outcome::Ok));
    let board = game.board();
    assert_eq!(board.piece_at(p(7, 6)), Some(Piece::new(PieceKind::King, Color::White)));
    assert_eq!(board.piece_at(p(7, 5)), Some(Piece::new(PieceKind::Rook, Color::White)));
    assert_eq!(board.piece_at(p(7, 7)), None);
    assert!(game.rights().king_has_moved(Color::White));
    assert!(!game.rights().for_color(Color::White).get(CastleSide::Kingside));
    assert!(game.rights().for_color(Color::Black).get(CastleSide::Kingside));

    game.undo();
    assert_eq!(game.board().piece_at(p(7, 4)), Some(Piece::new(PieceKind::King, Color::White)));
    assert!(!game.rights().king_has_moved(Color::White));
}

#[test]
fn promotion_gives_a_queen_and_check() {
    // . . . . ♚ . . .
    // ♙ . . . . . . .
    // . . . . . . . .
    // . . . . . . . .
    // . . . . . . . .
    // . . . . . . . .
    // . . . . . . . .
    // . . . . ♔ . . .
    let board = Board::from_placement("4k3/P7/8/8/8/8/8/4K3").unwrap();
    let mut game = Game::from_board(board, Color::White, CastlingRights::none()).unwrap();
    assert_eq!(game.apply_move(p(1, 0), p(0, 0)), Ok(Outcome::Ok));
    assert_eq!(game.board().piece_at(p(0, 0)), Some(Piece::new(PieceKind::Queen, Color::White)));
    assert_eq!(game.board().piece_at(p(1, 0)), None);
    assert_eq!(game.check(), Some(Color::Black));
}

#[test]
fn click_flow_selects_switches_and_moves() {
    let mut game = Game::new();
    assert_eq!(game.click(p(3, 3)), ClickResult::Ignored);
    assert_eq!(game.click(p(7, 6)), ClickResult::Selected(vec![p(5, 5), p(5, 7)]));
    // clicking another own piece switches the selection
    assert!(matches!(game.click(p(6, 4)), ClickResult::Selected(_)));
    assert_eq!(game.click(p(4, 4)), ClickResult::Moved(Outcome::Ok));
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert_eq!(game.side_to_move(), Color::Black);

    assert!(matches!(game.click(p(1, 3)), ClickResult::Selected(_)));
    assert_eq!(game.click(p(4, 0)), ClickResult::Deselected);
    assert_eq!(game.selection(), None);
}

#[test]
fn stateless_api_leaves_inputs_alone() {
    let state = new_game();
    let rights = CastlingRights::new();
    let ledger = CapturedLedger::new();
    let mut history = History::new();

    let before = Snapshot {
        state,
        rights,
        ledger: ledger.clone(),
    };
    let result = apply_move(&state, &rights, &ledger, p(6, 3), p(4, 3)).unwrap();
    history.push(before.clone());

    assert_eq!(state, new_game());
    assert_eq!(result.state.side_to_move, Color::Black);
    assert_eq!(result.outcome, Outcome::Ok);
    assert_eq!(undo(&mut history), Some(before));
    assert_eq!(undo(&mut history), None);

    assert_eq!(
        apply_move(&state, &rights, &ledger, p(6, 3), p(3, 3)),
        Err(MoveError::IllegalMove {
            from: p(6, 3),
            to: p(3, 3)
        })
    );
}

#[test]
fn random_playouts_keep_the_rules() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..4 {
        let mut game = Game::new();
        let mut plies = 0;
        while plies < 120 && !game.status().is_over() {
            let mover = game.side_to_move();
            let moves = all_legal_moves(game.board(), mover, game.rights());
            let Some(&(from, to)) = moves.choose(&mut rng) else {
                panic!("in-progress game without moves");
            };
            game.apply_move(from, to).unwrap();
            plies += 1;

            let board = game.board();
            assert!(board.find_king(Color::White).is_some());
            assert!(board.find_king(Color::Black).is_some());
            assert!(!is_in_check(board, mover));
            assert_eq!(game.side_to_move(), mover.other_color());
            assert_eq!(game.history().len(), plies);
        }

        while game.can_undo() {
            game.undo();
        }
        assert_eq!(game.snapshot(), Game::new().snapshot());
    }
}

#[test]
fn two_players_share_a_room() {
    let mut lobby = Lobby::new();
    let id = lobby.create_room();
    let white = lobby.join(&id).unwrap();
    let black = lobby.join(&id).unwrap();
    assert_eq!(white[0], RoomEvent::ColorAssigned { color: Color::White });
    assert_eq!(black[0], RoomEvent::ColorAssigned { color: Color::Black });
    assert_eq!(lobby.join(&id), Err(RoomError::Full(id.clone())));

    // fool's mate
    let moves = [
        (Color::White, p(6, 5), p(5, 5)),
        (Color::Black, p(1, 4), p(3, 4)),
        (Color::White, p(6, 6), p(4, 6)),
        (Color::Black, p(0, 3), p(4, 7)),
    ];
    let mut last = None;
    for (color, from, to) in moves {
        last = Some(lobby.submit_move(&id, color, from, to).unwrap());
    }
    match last {
        Some(RoomEvent::MoveApplied { outcome, snapshot, .. }) => {
            assert_eq!(outcome, Outcome::Checkmate(Color::Black));
            assert_eq!(snapshot.state.check, Some(Color::White));
        }
        other => panic!("unexpected event {other:?}"),
    }

    assert_eq!(
        lobby.submit_move(&id, Color::White, p(6, 0), p(5, 0)),
        Err(RoomError::Move(MoveError::GameOver(Status::Checkmate(Color::Black))))
    );
    assert!(matches!(
        lobby.undo(&id),
        Ok(Some(RoomEvent::Undone { can_undo: true, .. }))
    ));
}

#[test]
fn snapshots_survive_json_transport() {
    let mut game = Game::new();
    play(&mut game, &[((6, 4), (4, 4)), ((1, 3), (3, 3)), ((4, 4), (3, 3))]);
    let snapshot = game.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert_eq!(back.ledger.len(), 1);
}
