//! Perft conformance against the canonical node-count tables, plus the
//! castling and en-passant generation scenarios. The deep entries are
//! `#[ignore]`d; run them with `cargo test --release -- --ignored`.

use chess::board::{init_attack_tables, Board, MoveKind, MoveList, START_FEN, TRICKY_FEN};
use chess::utils::perft;

const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn perft_of(fen: &str, depth: u32) -> u64 {
    init_attack_tables();
    let mut board = Board::from_fen(fen).expect("conformance FEN must parse");
    perft(&mut board, depth)
}

/// The legal moves of a position, as UCI strings, confirmed by make/unmake.
fn legal_moves(fen: &str) -> Vec<String> {
    init_attack_tables();
    let mut board = Board::from_fen(fen).expect("scenario FEN must parse");

    let mut list = MoveList::new();
    board.generate_moves(&mut list);

    let mut legal = Vec::new();
    for &m in list.iter() {
        if board.make_move(m, MoveKind::All) {
            board.undo_move(m);
            legal.push(m.to_string());
        }
    }
    legal
}

/******************************************\
|==========================================|
|            Perft Conformance             |
|==========================================|
\******************************************/

#[test]
fn perft_startpos() {
    assert_eq!(perft_of(START_FEN, 1), 20);
    assert_eq!(perft_of(START_FEN, 2), 400);
    assert_eq!(perft_of(START_FEN, 3), 8902);
    assert_eq!(perft_of(START_FEN, 4), 197281);
}

#[test]
fn perft_startpos_depth_5() {
    assert_eq!(perft_of(START_FEN, 5), 4865609);
}

#[test]
#[ignore = "119M nodes; run with --release -- --ignored"]
fn perft_startpos_depth_6() {
    assert_eq!(perft_of(START_FEN, 6), 119060324);
}

#[test]
fn perft_kiwipete() {
    assert_eq!(perft_of(TRICKY_FEN, 1), 48);
    assert_eq!(perft_of(TRICKY_FEN, 2), 2039);
    assert_eq!(perft_of(TRICKY_FEN, 3), 97862);
    assert_eq!(perft_of(TRICKY_FEN, 4), 4085603);
}

#[test]
#[ignore = "194M nodes; run with --release -- --ignored"]
fn perft_kiwipete_depth_5() {
    assert_eq!(perft_of(TRICKY_FEN, 5), 193690690);
}

#[test]
fn perft_position_3() {
    assert_eq!(perft_of(POSITION_3, 1), 14);
    assert_eq!(perft_of(POSITION_3, 2), 191);
    assert_eq!(perft_of(POSITION_3, 3), 2812);
    assert_eq!(perft_of(POSITION_3, 4), 43238);
    assert_eq!(perft_of(POSITION_3, 5), 674624);
}

#[test]
#[ignore = "11M nodes; run with --release -- --ignored"]
fn perft_position_3_depth_6() {
    assert_eq!(perft_of(POSITION_3, 6), 11030083);
}

#[test]
fn perft_position_4() {
    assert_eq!(perft_of(POSITION_4, 1), 6);
    assert_eq!(perft_of(POSITION_4, 2), 264);
    assert_eq!(perft_of(POSITION_4, 3), 9467);
    assert_eq!(perft_of(POSITION_4, 4), 422333);
}

#[test]
#[ignore = "16M nodes; run with --release -- --ignored"]
fn perft_position_4_depth_5() {
    assert_eq!(perft_of(POSITION_4, 5), 15833292);
}

#[test]
fn perft_position_5() {
    assert_eq!(perft_of(POSITION_5, 1), 44);
    assert_eq!(perft_of(POSITION_5, 2), 1486);
    assert_eq!(perft_of(POSITION_5, 3), 62379);
    assert_eq!(perft_of(POSITION_5, 4), 2103487);
}

#[test]
#[ignore = "90M nodes; run with --release -- --ignored"]
fn perft_position_5_depth_5() {
    assert_eq!(perft_of(POSITION_5, 5), 89941194);
}

/******************************************\
|==========================================|
|           Castling Scenarios             |
|==========================================|
\******************************************/

#[test]
fn castling_rights_govern_generated_moves() {
    let moves = legal_moves("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));

    let moves = legal_moves("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1");
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(
        !moves.contains(&"e1c1".to_string()),
        "queen-side castle must not appear without the right"
    );
}

/******************************************\
|==========================================|
|          En-Passant Scenario             |
|==========================================|
\******************************************/

#[test]
fn en_passant_generated_made_and_unmade_exactly() {
    const EP_FEN: &str = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";

    init_attack_tables();
    let mut board = Board::from_fen(EP_FEN).unwrap();
    let before = board.clone();

    let mut list = MoveList::new();
    board.generate_moves(&mut list);

    let ep_moves: Vec<_> = list.iter().copied().filter(|m| m.is_en_passant()).collect();
    assert_eq!(ep_moves.len(), 1, "exactly one en-passant capture expected");
    assert_eq!(ep_moves[0].to_string(), "e5f6");

    assert!(board.make_move(ep_moves[0], MoveKind::All));
    board.undo_move(ep_moves[0]);
    assert_eq!(board, before, "make/unmake must restore the position exactly");
}

/******************************************\
|==========================================|
|          Occupancy Invariants            |
|==========================================|
\******************************************/

#[test]
fn occupancies_stay_consistent_through_perft_positions() {
    use chess::core::{Bitboard, Colour, PieceType};

    init_attack_tables();

    for fen in [START_FEN, TRICKY_FEN, POSITION_3, POSITION_4, POSITION_5] {
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();

        let mut list = MoveList::new();
        board.generate_moves(&mut list);

        for &m in list.iter() {
            if !board.make_move(m, MoveKind::All) {
                assert_eq!(board, before, "rejected {m} must leave {fen} unchanged");
                continue;
            }

            for colour in Colour::iter() {
                let mut union = Bitboard::EMPTY;
                for pt in PieceType::iter() {
                    let bb = board.piece_type_bb(colour, pt);
                    assert!(
                        (union & bb).is_empty(),
                        "piece bitboards overlap after {m} in {fen}"
                    );
                    union |= bb;
                }
                assert_eq!(
                    union,
                    board.occupied_bb(colour),
                    "occupancy out of sync after {m} in {fen}"
                );
                assert!(
                    board.piece_type_bb(colour, PieceType::King).is_singleton(),
                    "king count broken after {m} in {fen}"
                );
            }
            assert_eq!(
                board.all_occupied_bb(),
                board.occupied_bb(Colour::White) | board.occupied_bb(Colour::Black)
            );

            if let Some(ep_sq) = board.ep() {
                use chess::core::Rank;
                let expected = match board.stm() {
                    Colour::White => Rank::Rank6,
                    Colour::Black => Rank::Rank3,
                };
                assert_eq!(ep_sq.rank(), expected, "ep rank invariant after {m}");
            }

            board.undo_move(m);
            assert_eq!(board, before, "round-trip of {m} broke {fen}");
        }
    }
}
