// ═══════════════════════════════════════════════════════════════════════
// Test suite for the board model, pathfinder and turn protocol
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::types::*;
    use crate::grid::Board;
    use crate::input::{self, InputError, TokenReader};
    use crate::output::{format_action, format_turn};
    use crate::pathing::{self, AttackPath};
    use crate::setup::{self, RandomBoardSpec};
    use std::io::Cursor;

    // ── Helpers ──────────────────────────────────────────────────────────

    fn p(x: u8, y: u8) -> Pos {
        Pos::new(x, y)
    }

    /// Open board with a wall down column 6.
    fn split_board() -> Board {
        let rows: Vec<String> = (0..HEIGHT)
            .map(|y| {
                (0..WIDTH)
                    .map(|x| match (x, y) {
                        (0, 0) => 'O',
                        (11, 11) => 'X',
                        (6, _) => '#',
                        _ => '.',
                    })
                    .collect()
            })
            .collect();
        let layout = input::parse_rows(&rows).unwrap();
        Board::new(layout, p(0, 0), p(11, 11))
    }

    fn assert_contiguous(path: &AttackPath) {
        for pair in path.cells().windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    const SAMPLE_TURN: &str = "\
2
3 3
8 8
100 5 80 6
OOo.........
............
............
............
............
.....#......
............
............
............
............
............
..........xX
4
0 0 0 0
1 0 11 11
1 2 10 11
0 1 1 0
2
0 7 1 2 0
1 12 2 9 11
";

    // ═════════════════════════════════════════════════════════════════════
    // GRID TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_neighbor_cardinality() {
        let board = setup::open_board();
        assert_eq!(board.neighbors(p(0, 0)).len(), 2);
        assert_eq!(board.neighbors(p(11, 0)).len(), 2);
        assert_eq!(board.neighbors(p(0, 11)).len(), 2);
        assert_eq!(board.neighbors(p(11, 11)).len(), 2);
        assert_eq!(board.neighbors(p(5, 0)).len(), 3);
        assert_eq!(board.neighbors(p(0, 7)).len(), 3);
        assert_eq!(board.neighbors(p(11, 4)).len(), 3);
        assert_eq!(board.neighbors(p(5, 5)).len(), 4);
    }

    #[test]
    fn test_neighbor_order_is_down_up_right_left() {
        let board = setup::open_board();
        assert_eq!(board.neighbors(p(5, 5)), vec![p(5, 6), p(5, 4), p(6, 5), p(4, 5)]);
    }

    #[test]
    fn test_neighbors_symmetric() {
        for seed in 0..10 {
            let turn = setup::random_turn(seed, &RandomBoardSpec::default());
            let board = &turn.board;
            for cell in board.cells() {
                for n in board.neighbors(cell.pos) {
                    assert!(board.neighbors(n).contains(&cell.pos),
                        "{:?} lists {:?} but not the reverse (seed {})", cell.pos, n, seed);
                }
            }
        }
    }

    #[test]
    fn test_neighbors_skip_impassable() {
        let board = split_board();
        let around = board.neighbors(p(5, 3));
        assert!(!around.contains(&p(6, 3)));
        assert_eq!(around.len(), 3);
        assert!(board.get(p(6, 3)).is_none());
    }

    #[test]
    fn test_distance() {
        assert_eq!(p(0, 0).distance(p(11, 11)), 22);
        assert_eq!(p(3, 4).distance(p(3, 4)), 0);
        assert_eq!(p(3, 4).distance(p(4, 4)), 1);
        assert_eq!(p(7, 2).distance(p(2, 7)), 10);
    }

    #[test]
    fn test_ownership_values() {
        assert_eq!(Ownership::from_glyph('O').unwrap().value(), 2);
        assert_eq!(Ownership::from_glyph('o').unwrap().value(), 1);
        assert_eq!(Ownership::from_glyph('.').unwrap().value(), 0);
        assert_eq!(Ownership::from_glyph('x').unwrap().value(), -1);
        assert_eq!(Ownership::from_glyph('X').unwrap().value(), -2);
        assert!(Ownership::from_glyph('#').is_none());
        assert!(!Ownership::MineInactive.is_friendly());
        assert!(!Ownership::MineInactive.is_unclaimed());
    }

    #[test]
    fn test_frontier_on_open_board() {
        let board = setup::open_board();
        assert_eq!(board.frontier(), vec![p(1, 0), p(0, 1)]);
    }

    #[test]
    fn test_frontier_matches_definition() {
        for seed in 0..10 {
            let turn = setup::random_turn(seed, &RandomBoardSpec::default());
            let board = &turn.board;
            let frontier = board.frontier();
            for cell in board.cells() {
                let touches = board.neighbor_cells(cell.pos).any(|n| n.ownership.is_friendly());
                let expected = cell.ownership.is_unclaimed() && touches;
                assert_eq!(frontier.contains(&cell.pos), expected,
                    "frontier mismatch at {:?} (seed {})", cell.pos, seed);
            }
        }
    }

    #[test]
    fn test_friendly_queries() {
        let mut board = setup::open_board();
        board.set_ownership(p(1, 0), Ownership::MineActive);
        board.set_ownership(p(2, 0), Ownership::MineActive);
        board.place(p(1, 0), Piece::unit(1, true, 1));
        board.place(p(2, 0), Piece::unit(2, true, 2));
        board.place(p(5, 5), Piece::unit(3, true, 1));

        assert_eq!(board.friendly_cells(), vec![p(0, 0), p(1, 0), p(2, 0)]);
        assert_eq!(board.friendly_cells_with_rank(1), vec![p(1, 0)]);
        assert_eq!(board.friendly_cells_with_rank(2), vec![p(2, 0)]);
        assert!(board.friendly_cells_with_rank(3).is_empty());
        // Counting units ignores territory.
        assert_eq!(board.count_friendly_units(1), 2);
    }

    #[test]
    fn test_move_occupant_adjacent() {
        let mut board = setup::open_board();
        board.place(p(3, 3), Piece::unit(9, true, 2));
        assert!(board.move_occupant(p(3, 3), p(3, 4)));
        assert!(board.get(p(3, 3)).unwrap().is_empty());
        assert_eq!(board.piece_at(p(3, 4)).unwrap().id, 9);
    }

    #[test]
    fn test_move_occupant_rejects_non_adjacent() {
        let mut board = setup::open_board();
        board.place(p(3, 3), Piece::unit(9, true, 2));
        assert!(!board.move_occupant(p(3, 3), p(4, 4)));
        assert!(!board.move_occupant(p(3, 3), p(3, 3)));
        assert_eq!(board.piece_at(p(3, 3)).unwrap().id, 9);
        assert!(board.get(p(4, 4)).unwrap().is_empty());
    }

    #[test]
    fn test_move_occupant_captures() {
        let mut board = setup::open_board();
        board.place(p(3, 3), Piece::unit(9, true, 3));
        board.place(p(4, 3), Piece::unit(10, false, 1));
        assert!(board.move_occupant(p(3, 3), p(4, 3)));
        let piece = board.piece_at(p(4, 3)).unwrap();
        assert!(piece.friendly);
        assert_eq!(piece.id, 9);
    }

    #[test]
    fn test_next_unit_id_exceeds_observed() {
        let mut board = setup::open_board();
        board.observe_id(41);
        board.observe_id(7);
        board.observe_id(FIXTURE_ID);
        assert_eq!(board.next_unit_id(), 42);
        assert_eq!(board.next_unit_id(), 43);
    }

    #[test]
    fn test_place_tower_registers_it() {
        let mut board = setup::open_board();
        board.place(p(4, 4), Piece::tower(false, MAX_RANK));
        assert_eq!(board.towers, vec![p(4, 4)]);
        assert!(board.guarded_by_enemy_tower(p(4, 5)));
        assert!(!board.guarded_by_enemy_tower(p(5, 5)));
    }

    // ═════════════════════════════════════════════════════════════════════
    // PATHFINDER TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_cost_model() {
        let mut board = setup::open_board();
        board.place(p(2, 2), Piece::unit(1, false, 1));
        board.place(p(3, 2), Piece::unit(2, true, 1));
        board.place(p(4, 2), Piece::unit(3, false, 2));
        board.place(p(8, 8), Piece::tower(false, MAX_RANK));

        assert_eq!(pathing::cost(&board, p(5, 5)), 0);
        assert_eq!(pathing::cost(&board, p(8, 9)), 30);
        assert_eq!(pathing::cost(&board, p(2, 2)), 20);
        assert_eq!(pathing::cost(&board, p(3, 2)), 20);
        assert_eq!(pathing::cost(&board, p(4, 2)), 30);
        assert_eq!(pathing::cost(&board, p(8, 8)), 30);

        assert_eq!(pathing::claim_cost(&board, p(5, 5)), 10);
        assert_eq!(pathing::claim_cost(&board, p(8, 9)), 30);
        assert_eq!(pathing::claim_cost(&board, p(2, 2)), 20);
    }

    #[test]
    fn test_friendly_towers_do_not_guard() {
        let mut board = setup::open_board();
        board.place(p(8, 8), Piece::tower(true, 1));
        assert_eq!(pathing::cost(&board, p(8, 9)), 0);
    }

    #[test]
    fn test_claim_action() {
        let mut board = setup::open_board();
        board.place(p(2, 2), Piece::unit(1, false, 1));
        board.place(p(3, 2), Piece::unit(2, true, 3));
        board.place(p(4, 2), Piece::tower(true, 1));
        board.place(p(5, 2), Piece::unit(4, false, 3));

        assert_eq!(pathing::claim_action(&board, p(6, 6)), Some((1, 10)));
        assert_eq!(pathing::claim_action(&board, p(2, 2)), Some((2, 20)));
        assert_eq!(pathing::claim_action(&board, p(3, 2)), None);
        assert_eq!(pathing::claim_action(&board, p(4, 2)), None);
        assert_eq!(pathing::claim_action(&board, p(5, 2)), Some((3, 30)));
    }

    #[test]
    fn test_friendly_ground_costs_nothing() {
        let mut board = setup::open_board();
        board.set_ownership(p(3, 3), Ownership::MineActive);
        board.set_ownership(p(3, 4), Ownership::MineActive);
        board.place(p(3, 4), Piece::unit(1, true, 1));

        assert_eq!(pathing::claim_action(&board, p(3, 3)), None);
        assert_eq!(pathing::claim_action(&board, p(3, 4)), Some((2, 20)));
        // The search still weighs every step.
        assert_eq!(pathing::claim_cost(&board, p(3, 3)), 10);
        assert_eq!(pathing::evaluate_path(&board, &[p(3, 3), p(3, 4), p(3, 5)]), 30);
    }

    #[test]
    fn test_attack_path_degenerate() {
        let board = setup::open_board();
        let path = pathing::compute_attack_path(&board, p(4, 4), p(4, 4));
        assert_eq!(path.cells(), &[p(4, 4)]);
        assert!(path.corridor().is_empty());
        assert_eq!(path.cost(&board), 0);

        let greedy = pathing::find_shortest_path(&board, p(4, 4), p(4, 4));
        assert_eq!(greedy.cells(), &[p(4, 4)]);
        assert_eq!(greedy.cost(&board), 0);
    }

    #[test]
    fn test_attack_path_unreachable() {
        let board = split_board();
        assert!(pathing::compute_attack_path(&board, p(1, 0), p(11, 11)).is_empty());
        assert!(pathing::find_shortest_path(&board, p(1, 0), p(11, 11)).is_empty());
    }

    #[test]
    fn test_attack_path_open_board() {
        let board = setup::open_board();
        let path = pathing::compute_attack_path(&board, p(1, 0), p(11, 11));
        assert_eq!(path.target(), Some(p(11, 11)));
        assert_eq!(path.origin(), Some(p(1, 0)));
        assert_eq!(path.cells().len(), 22);
        assert_eq!(path.cost(&board), 210);
        assert_contiguous(&path);
        assert_eq!(path.steps().next().unwrap().distance(p(1, 0)), 1);
    }

    #[test]
    fn test_attack_path_routes_around_strong_units() {
        let mut board = setup::open_board();
        board.place(p(2, 5), Piece::unit(1, false, 2));
        board.place(p(3, 5), Piece::unit(2, false, 2));
        let path = pathing::compute_attack_path(&board, p(0, 5), p(4, 5));
        assert!(!path.cells().contains(&p(2, 5)));
        assert!(!path.cells().contains(&p(3, 5)));
        assert_eq!(path.cost(&board), 60);
        assert_contiguous(&path);
    }

    #[test]
    fn test_attack_path_avoids_own_hq() {
        let board = setup::open_board();
        let path = pathing::compute_attack_path(&board, p(1, 0), p(0, 1));
        assert!(!path.cells().contains(&p(0, 0)));
        assert_eq!(path.cells().len(), 3);
    }

    #[test]
    fn test_bounded_search_exhausts() {
        let board = setup::open_board();
        let result = pathing::bounded_attack_path(&board, p(1, 0), p(11, 11), 3);
        assert_eq!(result, pathing::Search::Exhausted);
    }

    #[test]
    fn test_greedy_corridor_shape() {
        let board = setup::open_board();
        let path = pathing::find_shortest_path(&board, p(1, 0), p(11, 11));
        assert!(!path.is_empty());
        assert_eq!(path.target(), Some(p(11, 11)));
        assert_eq!(path.origin(), Some(p(1, 0)));
        assert_contiguous(&path);
        for &cell in path.corridor() {
            assert!(!board.get(cell).unwrap().ownership.is_friendly());
        }
    }

    #[test]
    fn test_astar_never_worse_than_greedy() {
        let mut compared = 0;
        for seed in 0..30 {
            let turn = setup::random_turn(seed, &RandomBoardSpec::default());
            let board = &turn.board;
            for origin in board.friendly_cells() {
                let greedy = pathing::find_shortest_path(board, origin, board.enemy_hq);
                if greedy.is_empty() {
                    continue;
                }
                let optimal = pathing::compute_attack_path(board, origin, board.enemy_hq);
                assert!(!optimal.is_empty(), "A* missed a reachable goal (seed {})", seed);
                assert!(optimal.cost(board) <= greedy.cost(board),
                    "A* {} > greedy {} from {:?} (seed {})",
                    optimal.cost(board), greedy.cost(board), origin, seed);
                compared += 1;
            }
        }
        assert!(compared > 0, "no comparable pairs generated");
    }

    #[test]
    fn test_evaluate_path_monotone() {
        let board = setup::open_board();
        let path = pathing::compute_attack_path(&board, p(1, 0), p(11, 11));
        let corridor = path.corridor();
        let mut previous = 0;
        for len in 0..=corridor.len() {
            let cost = pathing::evaluate_path(&board, &corridor[..len]);
            assert!(cost >= previous);
            assert!(cost >= 0);
            previous = cost;
        }
        assert_eq!(pathing::evaluate_path(&board, &[]), 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // INPUT / OUTPUT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_read_sample_turn() {
        let mut reader = TokenReader::new(Cursor::new(SAMPLE_TURN));
        let spots = input::read_mine_spots(&mut reader).unwrap();
        assert_eq!(spots, vec![MineSpot { pos: p(3, 3) }, MineSpot { pos: p(8, 8) }]);

        let turn = input::read_turn(&mut reader, 3).unwrap().expect("one turn");
        assert_eq!((turn.gold, turn.income, turn.opponent_gold, turn.opponent_income), (100, 5, 80, 6));

        let board = &turn.board;
        assert_eq!(board.my_hq, p(0, 0));
        assert_eq!(board.enemy_hq, p(11, 11));
        assert!(board.get(p(5, 5)).is_none());
        assert_eq!(board.get(p(2, 0)).unwrap().ownership, Ownership::MineInactive);
        assert_eq!(board.mines, vec![p(1, 0)]);
        assert_eq!(board.towers, vec![p(10, 11)]);

        let tower = board.piece_at(p(10, 11)).unwrap();
        assert!(tower.is_tower() && !tower.friendly);
        let mine = board.piece_at(p(2, 0)).unwrap();
        assert_eq!((mine.id, mine.rank, mine.friendly), (7, 1, true));
        let theirs = board.piece_at(p(9, 11)).unwrap();
        assert_eq!((theirs.id, theirs.rank, theirs.friendly), (12, 2, false));

        assert_eq!(board.last_id, 12);
        assert!(input::read_turn(&mut reader, 12).unwrap().is_none());
    }

    #[test]
    fn test_carried_id_survives_lower_ids() {
        let text = SAMPLE_TURN.replacen("2\n3 3\n8 8\n", "", 1);
        let mut reader = TokenReader::new(Cursor::new(text));
        let turn = input::read_turn(&mut reader, 50).unwrap().unwrap();
        assert_eq!(turn.board.last_id, 50);
    }

    #[test]
    fn test_bad_glyph_rejected() {
        let text = SAMPLE_TURN.replacen("2\n3 3\n8 8\n", "", 1).replacen("OOo", "OO?", 1);
        let mut reader = TokenReader::new(Cursor::new(text));
        match input::read_turn(&mut reader, 0) {
            Err(InputError::BadGlyph { x: 2, y: 0, glyph: '?' }) => {}
            other => panic!("Expected BadGlyph, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_on_wall_rejected() {
        let text = SAMPLE_TURN.replacen("2\n3 3\n8 8\n", "", 1).replacen("0 7 1 2 0", "0 7 1 5 5", 1);
        let mut reader = TokenReader::new(Cursor::new(text));
        match input::read_turn(&mut reader, 0) {
            Err(InputError::Impassable { x: 5, y: 5 }) => {}
            other => panic!("Expected Impassable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_hq_rejected() {
        let rows = setup::open_board().render();
        let result = setup::turn_from_rows(&rows, 10, &[], &[]);
        assert!(matches!(result, Err(InputError::MissingHeadquarters("friendly"))));
    }

    #[test]
    fn test_truncated_turn_is_error() {
        let mut reader = TokenReader::new(Cursor::new("100 5 80\n"));
        assert!(matches!(input::read_turn(&mut reader, 0), Err(InputError::UnexpectedEof)));
    }

    #[test]
    fn test_render_round_trips_rows() {
        let board = split_board();
        let rows = board.render();
        assert_eq!(rows.len(), HEIGHT);
        assert_eq!(rows[0], "O.....#.....");
        assert_eq!(input::parse_rows(&rows).unwrap().len(), NUM_CELLS);
    }

    #[test]
    fn test_format_actions() {
        assert_eq!(format_action(&Action::Move { id: 4, to: p(3, 7) }), "MOVE 4 3 7");
        assert_eq!(format_action(&Action::Train { rank: 2, at: p(1, 0) }), "TRAIN 2 1 0");
        assert_eq!(format_action(&Action::Build { structure: Structure::Mine, at: p(5, 6) }), "BUILD MINE 5 6");
        assert_eq!(format_action(&Action::Build { structure: Structure::Tower, at: p(0, 2) }), "BUILD TOWER 0 2");
        assert_eq!(format_turn(&[]), "WAIT");
        assert_eq!(
            format_turn(&[Action::Train { rank: 1, at: p(1, 0) }, Action::Move { id: 2, to: p(2, 2) }]),
            "TRAIN 1 1 0;MOVE 2 2 2"
        );
    }

    #[test]
    fn test_action_costs() {
        assert_eq!(Action::Train { rank: 1, at: p(0, 0) }.cost(), 10);
        assert_eq!(Action::Train { rank: 2, at: p(0, 0) }.cost(), 20);
        assert_eq!(Action::Train { rank: 3, at: p(0, 0) }.cost(), 30);
        assert_eq!(Action::Build { structure: Structure::Mine, at: p(0, 0) }.cost(), 20);
        assert_eq!(Action::Build { structure: Structure::Tower, at: p(0, 0) }.cost(), 15);
        assert_eq!(Action::Move { id: 1, to: p(0, 0) }.cost(), 0);
        assert_eq!(Action::Wait.cost(), 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SETUP / DETERMINISM TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_random_turn_deterministic() {
        let spec = RandomBoardSpec::default();
        let a = setup::random_turn(777, &spec);
        let b = setup::random_turn(777, &spec);
        assert_eq!(a.board.render(), b.board.render());
        let pieces = |t: &Turn| t.board.cells().filter_map(|c| c.piece().copied()).collect::<Vec<_>>();
        assert_eq!(pieces(&a), pieces(&b));
    }

    #[test]
    fn test_random_turn_populates_sides() {
        let spec = RandomBoardSpec::default();
        let turn = setup::random_turn(5, &spec);
        let board = &turn.board;
        let friendly = board.cells().filter(|c| c.piece().is_some_and(|p| p.friendly && p.is_unit())).count();
        let enemy = board.cells().filter(|c| c.piece().is_some_and(|p| p.is_enemy_unit())).count();
        assert_eq!(friendly, spec.friendly_units);
        assert_eq!(enemy, spec.enemy_units);
        assert_eq!(board.towers.len(), spec.enemy_towers);
        assert_eq!(turn.gold, spec.gold);
        assert!(board.last_id >= (spec.friendly_units + spec.enemy_units) as u32);
    }

    #[test]
    fn test_turn_snapshot_json() {
        let turn = setup::random_turn(9, &RandomBoardSpec::default());
        let record = TurnRecord { mine_spots: setup::random_mine_spots(9, &turn.board, 4), turn };
        let json = serde_json::to_string(&record).unwrap();
        let back: TurnRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mine_spots, record.mine_spots);
        assert_eq!(back.turn.board.render(), record.turn.board.render());
        assert_eq!(back.turn.board.last_id, record.turn.board.last_id);
    }
}
