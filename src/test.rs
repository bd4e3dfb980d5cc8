#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use proptest::prelude::*;

    use crate::{
        board::{Board, Color, Coordinate, Direction},
        evaluator::{evaluate, LOSS_SCORE, WIN_SCORE},
        moves::{Move, MoveKind},
        player::{MachinePlayer, Player},
        search::{SearchConfig, Solver},
        PIECES_PER_COLOR,
    };

    // White links its left and right columns
    const WHITE_NETWORK: &str = "
        ........
        ........
        W.W..W.W
        ........
        ........
        ..W..W..
        ........
        ........";

    // the same network without its last piece
    const WHITE_NEARLY_NETWORK: &str = "
        ........
        ........
        W.W..W..
        ........
        ........
        ..W..W..
        ........
        ........";

    // six pieces across the board, every link pointing right
    const WHITE_STRAIGHT_LINE: &str = "
        ........
        ........
        ........
        WW.WW.WW
        ........
        ........
        ........
        ........";

    // reaches the far edge with only five pieces
    const WHITE_SHORT_CHAIN: &str = "
        ........
        ........
        W.W.....
        .......W
        ........
        ..W..W..
        ........
        ........";

    // the first link of WHITE_NETWORK is cut by a black piece
    const WHITE_BLOCKED: &str = "
        ........
        ........
        WBW..W.W
        ........
        ........
        ..W..W..
        ........
        ........";

    // all ten black pieces placed, (4, 4) and (5, 5) form a pair
    const BLACK_ALL_PLACED: &str = "
        ........
        .B.B.B..
        ........
        .B....B.
        ....B...
        .B...B..
        ........
        .B.B....";

    const MIDGAME: &str = "
        ........
        ..B.....
        W....W..
        ...B....
        ..W..B..
        ........
        ....B...
        ........";

    const CORNERS: [Coordinate; 4] = [
        Coordinate::new(0, 0),
        Coordinate::new(0, 7),
        Coordinate::new(7, 0),
        Coordinate::new(7, 7),
    ];

    /// Plain minimax without pruning, for checking the alpha-beta search
    fn exhaustive_search(
        board: &mut Board,
        color: Color,
        maximizing: bool,
        depth: usize,
        alternate_colors: bool,
        node_count: &mut usize,
    ) -> (Option<Move>, i32) {
        *node_count += 1;
        if board.has_network(color) {
            return (None, WIN_SCORE);
        }
        if board.has_network(color.opponent()) {
            return (None, LOSS_SCORE);
        }
        if depth == 0 {
            return (None, evaluate(board, color));
        }

        let mover = if maximizing || !alternate_colors {
            color
        } else {
            color.opponent()
        };
        let mut best = (None, if maximizing { i32::MIN } else { i32::MAX });
        for candidate in board.legal_moves(mover) {
            board.apply(candidate, mover);
            let (_, score) = exhaustive_search(
                board,
                color,
                !maximizing,
                depth - 1,
                alternate_colors,
                node_count,
            );
            board.undo(candidate, mover);
            if (maximizing && score > best.1) || (!maximizing && score < best.1) {
                best = (Some(candidate), score);
            }
        }
        best
    }

    fn assert_pruning_matches_exhaustive(
        diagram: &str,
        color: Color,
        config: SearchConfig,
    ) -> Result<()> {
        let mut board = Board::from_diagram(diagram)?;
        let before = board;

        let mut exhaustive_nodes = 0;
        let (expected_move, expected_score) = exhaustive_search(
            &mut board,
            color,
            true,
            config.depth,
            config.alternate_colors,
            &mut exhaustive_nodes,
        );

        let mut solver = Solver::new(&mut board, color).with_config(config);
        let (score, best_move) = solver.solve();
        let pruned_nodes = solver.node_count;

        assert_eq!(score, expected_score);
        assert_eq!(best_move, expected_move);
        assert!(pruned_nodes <= exhaustive_nodes);
        // the search leaves the board as it found it
        assert_eq!(board, before);
        Ok(())
    }

    #[test]
    pub fn diagram_parsing() -> Result<()> {
        let board = Board::from_diagram(WHITE_NETWORK)?;
        assert_eq!(board.num_pieces(Color::White), 6);
        assert_eq!(board.reserve(Color::White), PIECES_PER_COLOR - 6);
        assert_eq!(board.reserve(Color::Black), PIECES_PER_COLOR);
        assert_eq!(Board::from_diagram(board.to_string())?, board);

        assert!(Board::from_diagram("W.......\n".repeat(8)).is_err());
        assert!(Board::from_diagram(".X......\n".repeat(8)).is_err());
        assert!(Board::from_diagram("........\n".repeat(7)).is_err());
        assert!(Board::from_diagram(".BBBBBB.\n".repeat(2) + &"........\n".repeat(6)).is_err());
        Ok(())
    }

    #[test]
    pub fn out_of_range_reads_are_empty() -> Result<()> {
        let board = Board::from_diagram(WHITE_NETWORK)?;
        assert!(board.read(-1, 2).is_empty());
        assert!(board.read(8, 2).is_empty());
        assert!(board.read(0, 100).is_empty());
        assert_eq!(board.read(0, 2).color(), Some(Color::White));
        Ok(())
    }

    #[test]
    pub fn move_text_and_wire_forms() -> Result<()> {
        assert_eq!("3 4".parse::<Move>()?, Move::add(3, 4));
        assert_eq!(" 3 4 2 2 ".parse::<Move>()?, Move::step(3, 4, 2, 2));
        assert_eq!(Move::step(3, 4, 2, 2).to_string(), "3 4 2 2");
        assert!("9 1".parse::<Move>().is_err());
        assert!("1".parse::<Move>().is_err());
        assert!("1 2 3".parse::<Move>().is_err());

        let step = Move::step(6, 1, 2, 5);
        let mut wire = Vec::new();
        step.write_to(&mut wire)?;
        assert_eq!(wire, vec![MoveKind::Step as u8, 6, 1, 2, 5]);
        assert_eq!(Move::read_from(&mut wire.as_slice())?, step);

        assert!(Move::read_from(&mut &[2u8, 1, 1][..]).is_err());
        assert!(Move::read_from(&mut &[0u8, 8, 1][..]).is_err());
        assert!(Move::read_from(&mut &[1u8, 1, 1][..]).is_err());
        Ok(())
    }

    #[test]
    pub fn corners_are_never_legal() -> Result<()> {
        for diagram in [WHITE_NETWORK, BLACK_ALL_PLACED, MIDGAME].iter() {
            let board = Board::from_diagram(diagram)?;
            for &color in [Color::Black, Color::White].iter() {
                for &corner in CORNERS.iter() {
                    assert!(!board.is_legal(Move::Add { to: corner }, color));
                    for from in board.pieces(color) {
                        assert!(!board.is_legal(Move::Step { to: corner, from }, color));
                    }
                }
                assert!(board
                    .legal_moves(color)
                    .iter()
                    .all(|candidate| !candidate.to().is_corner()));
            }
        }
        Ok(())
    }

    #[test]
    pub fn goal_edges_are_closed_to_the_opponent() {
        let board = Board::new();
        // column 0 belongs to White, row 0 to Black
        assert!(board.is_legal(Move::add(0, 3), Color::White));
        assert!(!board.is_legal(Move::add(0, 3), Color::Black));
        assert!(board.is_legal(Move::add(3, 0), Color::Black));
        assert!(!board.is_legal(Move::add(3, 0), Color::White));
        assert!(!board.is_legal(Move::add(3, 7), Color::White));
        assert!(!board.is_legal(Move::add(7, 3), Color::Black));
    }

    #[test]
    pub fn empty_board_moves() {
        let board = Board::new();
        let white_moves = board.legal_moves(Color::White);
        let black_moves = board.legal_moves(Color::Black);

        assert_eq!(white_moves.len(), 48);
        assert_eq!(black_moves.len(), 48);
        assert_eq!(white_moves[0], Move::add(0, 1));
        assert_eq!(black_moves[0], Move::add(1, 0));
        // no stepping while pieces are left in reserve
        assert!(!board.is_legal(Move::step(3, 3, 2, 2), Color::White));
    }

    #[test]
    pub fn cluster_rules() -> Result<()> {
        let board = Board::from_diagram(
            "
            ........
            ........
            ..B.....
            ...B....
            ........
            ........
            ........
            ........",
        )?;
        // touching the end of a pair
        assert!(!board.is_legal(Move::add(4, 4), Color::Black));
        // touching both pieces of a pair
        assert!(!board.is_legal(Move::add(3, 2), Color::Black));
        assert!(board.is_legal(Move::add(5, 5), Color::Black));
        // the other color is unaffected
        assert!(board.is_legal(Move::add(4, 4), Color::White));

        let mut single = Board::new();
        single.apply(Move::add(2, 2), Color::Black);
        assert!(single.is_legal(Move::add(3, 3), Color::Black));
        Ok(())
    }

    #[test]
    pub fn step_rules() -> Result<()> {
        let board = Board::from_diagram(BLACK_ALL_PLACED)?;
        assert_eq!(board.reserve(Color::Black), 0);

        assert!(!board.is_legal(Move::add(6, 6), Color::Black));
        // the stepping piece leaves its pair behind
        assert!(board.is_legal(Move::step(6, 6, 5, 5), Color::Black));
        // (5, 5) would gain a second neighbour
        assert!(!board.is_legal(Move::step(5, 6, 1, 1), Color::Black));
        assert!(!board.is_legal(Move::step(5, 5, 5, 5), Color::Black));
        // only own pieces can step
        assert!(!board.is_legal(Move::step(6, 6, 2, 2), Color::Black));
        assert!(!board.is_legal(Move::step(2, 3, 0, 3), Color::Black));
        // White still has its reserve
        assert!(!board.is_legal(Move::step(6, 6, 5, 5), Color::White));

        let moves = board.legal_moves(Color::Black);
        assert!(moves.contains(&Move::step(6, 6, 5, 5)));
        assert!(moves
            .iter()
            .all(|candidate| candidate.kind() == MoveKind::Step));
        Ok(())
    }

    #[test]
    pub fn ray_connections() -> Result<()> {
        let board = Board::from_diagram(
            "
            ........
            ........
            ..W..W..
            ........
            ..B.....
            ........
            ..W.....
            ........",
        )?;
        let connections: Vec<_> = board.connections(Coordinate::new(2, 2)).collect();
        assert_eq!(connections, vec![(Coordinate::new(5, 2), Direction::Right)]);

        assert!(board.connections(Coordinate::new(2, 6)).is_empty());
        assert!(board.connections(Coordinate::new(2, 4)).is_empty());
        assert!(board.connections(Coordinate::new(3, 3)).is_empty());

        let connections: Vec<_> = board.connections(Coordinate::new(5, 2)).collect();
        assert_eq!(connections, vec![(Coordinate::new(2, 2), Direction::Left)]);
        Ok(())
    }

    #[test]
    pub fn network_detection() -> Result<()> {
        let board = Board::from_diagram(WHITE_NETWORK)?;
        assert!(board.has_network(Color::White));
        assert!(!board.has_network(Color::Black));

        let network = board.find_network(Color::White).unwrap_or_default();
        assert_eq!(
            network,
            vec![
                Coordinate::new(0, 2),
                Coordinate::new(2, 2),
                Coordinate::new(5, 5),
                Coordinate::new(2, 5),
                Coordinate::new(5, 2),
                Coordinate::new(7, 2),
            ]
        );

        assert!(!Board::from_diagram(WHITE_STRAIGHT_LINE)?.has_network(Color::White));
        assert!(!Board::from_diagram(WHITE_SHORT_CHAIN)?.has_network(Color::White));
        assert!(!Board::from_diagram(WHITE_BLOCKED)?.has_network(Color::White));
        assert!(!Board::from_diagram(WHITE_NEARLY_NETWORK)?.has_network(Color::White));
        Ok(())
    }

    #[test]
    pub fn winner_after_a_move() -> Result<()> {
        let board = Board::from_diagram(WHITE_NETWORK)?;
        assert_eq!(board.winner(Color::White), Some(Color::White));
        assert_eq!(board.winner(Color::Black), Some(Color::White));
        assert_eq!(Board::new().winner(Color::White), None);
        Ok(())
    }

    #[test]
    pub fn longest_chains() -> Result<()> {
        assert_eq!(Board::new().longest_chain(Color::White), 0);
        assert_eq!(Board::from_diagram(WHITE_NETWORK)?.longest_chain(Color::White), 6);
        assert_eq!(Board::from_diagram(WHITE_SHORT_CHAIN)?.longest_chain(Color::White), 5);
        assert_eq!(Board::from_diagram(WHITE_BLOCKED)?.longest_chain(Color::White), 1);
        assert_eq!(
            Board::from_diagram(WHITE_NEARLY_NETWORK)?.longest_chain(Color::White),
            5
        );
        // no piece on the start edge
        assert_eq!(Board::from_diagram(BLACK_ALL_PLACED)?.longest_chain(Color::White), 0);
        Ok(())
    }

    #[test]
    pub fn evaluation() -> Result<()> {
        assert_eq!(evaluate(&Board::new(), Color::White), 0);

        let mut board = Board::new();
        board.apply(Move::add(0, 3), Color::White);
        assert_eq!(evaluate(&board, Color::White), 15);
        assert_eq!(evaluate(&board, Color::Black), -15);

        let won = Board::from_diagram(WHITE_NETWORK)?;
        assert_eq!(evaluate(&won, Color::White), WIN_SCORE);
        assert_eq!(evaluate(&won, Color::Black), LOSS_SCORE);
        Ok(())
    }

    #[test]
    pub fn pruning_matches_exhaustive_search() -> Result<()> {
        let shallow = SearchConfig::default().with_depth(2);
        assert_pruning_matches_exhaustive(MIDGAME, Color::White, shallow)?;
        assert_pruning_matches_exhaustive(MIDGAME, Color::Black, shallow)?;
        assert_pruning_matches_exhaustive(
            MIDGAME,
            Color::White,
            shallow.with_alternate_colors(false),
        )?;
        assert_pruning_matches_exhaustive(WHITE_NEARLY_NETWORK, Color::Black, shallow)?;
        assert_pruning_matches_exhaustive(BLACK_ALL_PLACED, Color::Black, shallow)?;
        assert_pruning_matches_exhaustive(WHITE_NEARLY_NETWORK, Color::White, shallow.with_depth(3))?;
        Ok(())
    }

    #[test]
    pub fn pruning_skips_nodes() -> Result<()> {
        let mut board = Board::from_diagram(MIDGAME)?;
        let mut exhaustive_nodes = 0;
        exhaustive_search(&mut board, Color::White, true, 2, true, &mut exhaustive_nodes);

        let mut solver = Solver::new(&mut board, Color::White)
            .with_config(SearchConfig::default().with_depth(2));
        solver.solve();
        assert!(solver.node_count < exhaustive_nodes);
        Ok(())
    }

    #[test]
    pub fn completes_a_network() -> Result<()> {
        for &depth in [1, 2].iter() {
            let mut board = Board::from_diagram(WHITE_NEARLY_NETWORK)?;
            let mut solver = Solver::new(&mut board, Color::White)
                .with_config(SearchConfig::default().with_depth(depth));
            let (score, best_move) = solver.solve();
            assert_eq!(score, WIN_SCORE);

            let best_move = best_move.ok_or_else(|| anyhow::anyhow!("no move found"))?;
            board.apply(best_move, Color::White);
            assert!(board.has_network(Color::White));
        }
        Ok(())
    }

    #[test]
    pub fn decided_positions_have_no_best_move() -> Result<()> {
        let mut board = Board::from_diagram(WHITE_NETWORK)?;
        assert_eq!(Solver::new(&mut board, Color::White).solve(), (WIN_SCORE, None));
        assert_eq!(Solver::new(&mut board, Color::Black).solve(), (LOSS_SCORE, None));
        Ok(())
    }

    #[test]
    pub fn machine_player() {
        let config = SearchConfig::default().with_depth(1);
        let mut player = MachinePlayer::with_config(Color::Black, config);
        assert_eq!(player.color(), Color::Black);

        // illegal moves leave the board untouched
        let before = *player.board();
        assert!(!player.opponent_move(Move::add(0, 0)));
        assert!(!player.opponent_move(Move::add(3, 0)));
        assert!(!player.force_move(Move::add(0, 3)));
        assert_eq!(*player.board(), before);

        assert!(player.opponent_move(Move::add(0, 3)));
        assert!(player.force_move(Move::add(3, 0)));
        assert_eq!(player.board().num_pieces(Color::White), 1);
        assert_eq!(player.board().num_pieces(Color::Black), 1);

        let chosen = player.choose_move();
        assert!(chosen.is_some());
        assert_eq!(player.board().num_pieces(Color::Black), 2);
        if let Some(chosen) = chosen {
            assert!(!player.board().is_legal(chosen, Color::Black));
        }
    }

    #[test]
    pub fn machine_player_takes_the_win() {
        let config = SearchConfig::default().with_depth(2);
        let mut player = MachinePlayer::with_config(Color::White, config);
        for &(x, y) in [(0, 2), (2, 2), (2, 5), (5, 5), (5, 2)].iter() {
            assert!(player.force_move(Move::add(x, y)));
        }
        assert!(player.choose_move().is_some());
        assert!(player.board().has_network(Color::White));
    }

    proptest! {
        #[test]
        fn random_games_keep_invariants(choices in prop::collection::vec(any::<usize>(), 0..48)) {
            let mut board = Board::new();
            let mut color = Color::White;

            for choice in choices {
                let moves = board.legal_moves(color);
                for &candidate in moves.iter() {
                    prop_assert!(board.is_legal(candidate, color));
                    prop_assert!(!candidate.to().is_corner());

                    let before = board;
                    board.apply(candidate, color);
                    board.undo(candidate, color);
                    prop_assert_eq!(board, before);
                }

                if moves.is_empty() {
                    break;
                }
                board.apply(moves[choice % moves.len()], color);
                for &side in [Color::Black, Color::White].iter() {
                    prop_assert_eq!(board.reserve(side) + board.num_pieces(side), PIECES_PER_COLOR);
                }
                color = color.opponent();
            }
        }
    }
}
