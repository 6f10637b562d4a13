//! Integration tests for panelcut-packer.

use panelcut_core::geometry::{EdgeBanding, Grain, LaminationType, Rotation};
use panelcut_core::result::{StrategyUsed, UnplacedReason};
use panelcut_core::solver::{Algorithm, MoveOptions, PackOptions, SortStrategy};
use panelcut_core::SaConfig;
use panelcut_packer::{
    pack, pack_annealed, pack_optimized, pack_sorted, score_v2, verify_layout, LayoutResult,
    PartSpec, StockSheetSpec,
};

fn cabinet_parts() -> Vec<PartSpec> {
    vec![
        PartSpec::new("SIDE", 720.0, 560.0).with_quantity(4),
        PartSpec::new("SHELF", 764.0, 540.0).with_quantity(6),
        PartSpec::new("BACK", 1200.0, 780.0).with_quantity(2),
        PartSpec::new("DOOR", 715.0, 396.0)
            .with_quantity(4)
            .with_grain(Grain::Length),
        PartSpec::new("DRAWER", 450.0, 150.0)
            .with_quantity(6)
            .with_grain(Grain::Width),
        PartSpec::new("RAIL", 764.0, 100.0).with_quantity(4),
    ]
}

fn board() -> StockSheetSpec {
    StockSheetSpec::new("MDF-18", 2750.0, 1830.0).with_kerf(4.0)
}

fn requested(parts: &[PartSpec]) -> usize {
    parts.iter().map(|p| p.quantity).sum()
}

fn all_layouts(parts: &[PartSpec], sheets: &[StockSheetSpec]) -> Vec<LayoutResult> {
    let mut layouts = Vec::new();
    for algorithm in [Algorithm::Guillotine, Algorithm::Legacy] {
        let options = PackOptions::default().with_algorithm(algorithm);
        layouts.push(pack(parts, sheets, &options).unwrap());
        layouts.push(pack_optimized(parts, sheets, &options).unwrap());
        for strategy in SortStrategy::ALL {
            layouts.push(pack_sorted(parts, sheets, &options, strategy).unwrap());
        }
    }
    layouts
}

mod layout_properties {
    use super::*;

    #[test]
    fn test_every_unit_accounted_for() {
        let parts = cabinet_parts();
        let sheets = vec![board()];

        for result in all_layouts(&parts, &sheets) {
            assert_eq!(
                result.placed_count() + result.unplaced_count(),
                requested(&parts)
            );
        }
    }

    #[test]
    fn test_layouts_verify() {
        let parts = cabinet_parts();
        let sheets = vec![
            StockSheetSpec::new("SMALL", 1200.0, 800.0)
                .with_quantity(2)
                .with_kerf(3.0),
            board(),
        ];

        for result in all_layouts(&parts, &sheets) {
            verify_layout(&result, &parts).unwrap();
        }
    }

    #[test]
    fn test_grain_respected() {
        let parts = cabinet_parts();
        let sheets = vec![board()];

        for result in all_layouts(&parts, &sheets) {
            for (_, p) in result.placements() {
                match parts[p.part_index].grain {
                    Grain::Length => assert_eq!(p.rotation, Rotation::Deg0),
                    Grain::Width => assert_eq!(p.rotation, Rotation::Deg90),
                    Grain::Any => {}
                }
            }
        }
    }

    #[test]
    fn test_placements_inside_sheet() {
        let parts = cabinet_parts();
        let sheets = vec![board()];

        for result in all_layouts(&parts, &sheets) {
            for sheet in &result.sheets {
                for p in &sheet.placements {
                    assert!(p.x >= 0.0 && p.y >= 0.0);
                    assert!(p.x + p.width <= sheet.length + 1e-9);
                    assert!(p.y + p.height <= sheet.width + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_waste_identity() {
        let parts = cabinet_parts();
        let sheets = vec![board()];

        for result in all_layouts(&parts, &sheets) {
            let sheet_area: f64 = result.sheets.iter().map(|s| s.area()).sum();
            let used: f64 = result.placements().map(|(_, p)| p.area()).sum();
            assert_eq!(result.stats.waste_area, sheet_area - used);
        }
    }

    #[test]
    fn test_deterministic() {
        let parts = cabinet_parts();
        let sheets = vec![board()];
        let options = PackOptions::default();

        let a = pack_optimized(&parts, &sheets, &options).unwrap();
        let b = pack_optimized(&parts, &sheets, &options).unwrap();
        assert_eq!(a.strategy_used, b.strategy_used);
        for (sa, sb) in a.sheets.iter().zip(&b.sheets) {
            assert_eq!(sa.placements, sb.placements);
            assert_eq!(sa.cuts, sb.cuts);
        }
    }
}

mod accounting_tests {
    use super::*;

    #[test]
    fn test_single_part_waste() {
        let parts = vec![PartSpec::new("P", 1000.0, 500.0)];
        let sheets = vec![StockSheetSpec::new("S", 2750.0, 1830.0)];

        let result = pack(&parts, &sheets, &PackOptions::default()).unwrap();
        assert_eq!(result.sheet_count(), 1);
        assert_eq!(result.stats.waste_area, 4_532_500.0);
    }

    #[test]
    fn test_edge_banding_by_lamination() {
        let sheets = vec![StockSheetSpec::new("S", 2750.0, 1830.0)];
        let plain = vec![PartSpec::new("P", 1000.0, 500.0)
            .with_quantity(2)
            .with_edge_banding(EdgeBanding::all())];

        let result = pack(&plain, &sheets, &PackOptions::default()).unwrap();
        assert_eq!(result.stats.edge_banding_16mm, 6000.0);
        assert_eq!(result.stats.edge_banding_32mm, 0.0);

        let backed = vec![plain[0].clone().with_lamination(LaminationType::WithBacker)];
        let result = pack(&backed, &sheets, &PackOptions::default()).unwrap();
        assert_eq!(result.stats.edge_banding_16mm, 0.0);
        assert_eq!(result.stats.edge_banding_32mm, 6000.0);
    }

    #[test]
    fn test_oversized_part_opens_no_sheet() {
        let parts = vec![PartSpec::new("HUGE", 3000.0, 2000.0).with_quantity(2)];
        let sheets = vec![board()];

        for algorithm in [Algorithm::Guillotine, Algorithm::Legacy] {
            let options = PackOptions::default().with_algorithm(algorithm);
            let result = pack_optimized(&parts, &sheets, &options).unwrap();

            assert_eq!(result.sheet_count(), 0);
            assert_eq!(result.unplaced.len(), 1);
            assert_eq!(result.unplaced[0].quantity, 2);
            assert_eq!(result.unplaced[0].reason, UnplacedReason::TooLargeForSheet);
        }
    }

    #[test]
    fn test_limited_stock() {
        let parts = vec![PartSpec::new("Q", 1000.0, 1000.0).with_quantity(5)];
        let sheets = vec![StockSheetSpec::new("S", 2000.0, 1000.0).with_quantity(2)];

        let result = pack(&parts, &sheets, &PackOptions::default()).unwrap();
        assert_eq!(result.sheet_count(), 2);
        assert_eq!(result.placed_count(), 4);
        assert_eq!(result.unplaced[0].reason, UnplacedReason::InsufficientStock);
        verify_layout(&result, &parts).unwrap();
    }

    #[test]
    fn test_empty_parts() {
        let result = pack(&[], &[board()], &PackOptions::default()).unwrap();
        assert_eq!(result.sheet_count(), 0);
        assert_eq!(result.stats.yield_ratio, 0.0);
        assert_eq!(result.strategy_used, Some(StrategyUsed::InputOrder));
    }
}

mod performance_tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_two_hundred_parts_under_a_second() {
        let parts = vec![PartSpec::new("P", 500.0, 300.0).with_quantity(200)];
        let sheets = vec![StockSheetSpec::new("S", 2750.0, 1830.0)];

        let start = Instant::now();
        let result = pack_optimized(&parts, &sheets, &PackOptions::default()).unwrap();
        let elapsed = start.elapsed();

        assert!(result.all_placed());
        assert_eq!(result.placed_count(), 200);
        assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
    }
}

mod annealing_tests {
    use super::*;

    #[test]
    fn test_annealed_never_worse_than_optimized() {
        let parts = cabinet_parts();
        let sheet = board();
        let baseline = pack_optimized(&parts, &[sheet.clone()], &PackOptions::default()).unwrap();

        let moves = MoveOptions::default().with_seed(2024);
        let result =
            pack_annealed(&parts, &sheet, 150, &SaConfig::default(), &moves, None, None).unwrap();

        assert!(score_v2(&result, sheet.area()) >= score_v2(&baseline, sheet.area()));
        assert_eq!(result.placed_count(), baseline.placed_count());
        verify_layout(&result, &parts).unwrap();
    }

    #[test]
    fn test_annealing_reports_progress() {
        let parts = cabinet_parts();
        let sheet = board();
        let scheduling = SaConfig::default().with_progress_interval(std::time::Duration::ZERO);
        let mut count = 0usize;
        let mut last_running = true;
        let mut on_progress = |p: &panelcut_core::SaProgress| {
            count += 1;
            last_running = p.running;
        };

        pack_annealed(
            &parts,
            &sheet,
            50,
            &scheduling,
            &MoveOptions::default().with_seed(1),
            Some(&mut on_progress),
            None,
        )
        .unwrap();

        assert!(count >= 1);
        assert!(!last_running);
    }

    #[test]
    fn test_annealing_rejects_bad_schedule() {
        let scheduling = SaConfig::default().with_final_temp(100.0);
        let result = pack_annealed(
            &cabinet_parts(),
            &board(),
            50,
            &scheduling,
            &MoveOptions::default(),
            None,
            None,
        );
        assert!(result.is_err());
    }
}
