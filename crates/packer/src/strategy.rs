//! Deterministic ordering strategies and the multi-strategy optimizer.

use crate::accounting::{build_result, PackOutcome};
use crate::expand::{expand_parts, sort_units, UnitPart};
use crate::scoring::score;
use crate::{guillotine, shelf};
use panelcut_core::geometry::{validate_inputs, PartSpec, StockSheetSpec};
use panelcut_core::result::{LayoutResult, StrategyUsed};
use panelcut_core::solver::{Algorithm, PackOptions, SortStrategy};
use panelcut_core::Result;
use std::cmp::Ordering;

/// Runs the configured placement heuristic over `units` in order.
pub fn run_packer(
    units: &[UnitPart],
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    options: &PackOptions,
) -> LayoutResult {
    let outcome: PackOutcome = match options.algorithm {
        Algorithm::Guillotine => guillotine::pack_units(units, parts, sheets, options.allow_rotation),
        Algorithm::Legacy => shelf::pack_units(units, parts, sheets, options.allow_rotation),
    };
    build_result(parts, outcome)
}

/// Area used to normalize scores: the first sheet type with stock.
pub fn reference_sheet_area(sheets: &[StockSheetSpec]) -> f64 {
    sheets
        .iter()
        .find(|s| s.is_available())
        .or_else(|| sheets.first())
        .map_or(0.0, StockSheetSpec::area)
}

/// Packs after one deterministic sort.
pub fn pack_sorted(
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    options: &PackOptions,
    strategy: SortStrategy,
) -> Result<LayoutResult> {
    validate_inputs(parts, sheets)?;
    let mut units = expand_parts(parts);
    sort_units(&mut units, strategy);
    Ok(run_packer(&units, parts, sheets, options).with_strategy(StrategyUsed::Sorted(strategy)))
}

/// Orders candidates: fewer unplaced units, fewer sheets, higher yield,
/// then higher score. `Less` means `a` is better.
pub fn compare_layouts(a: &LayoutResult, b: &LayoutResult, sheet_area: f64) -> Ordering {
    a.unplaced_count()
        .cmp(&b.unplaced_count())
        .then(a.sheets.len().cmp(&b.sheets.len()))
        .then(b.stats.yield_ratio.total_cmp(&a.stats.yield_ratio))
        .then(score(b, sheet_area).total_cmp(&score(a, sheet_area)))
}

/// Winner of the multi-strategy search.
#[derive(Debug, Clone)]
pub struct BestOf {
    /// The winning layout.
    pub result: LayoutResult,
    /// Sort order that produced it.
    pub strategy: SortStrategy,
    /// The units in the winning order.
    pub units: Vec<UnitPart>,
}

/// Packs once per sort order and keeps the best layout.
///
/// Inputs must already be validated. Ties keep the earlier strategy.
pub fn best_of(parts: &[PartSpec], sheets: &[StockSheetSpec], options: &PackOptions) -> BestOf {
    let sheet_area = reference_sheet_area(sheets);
    let base = expand_parts(parts);
    let mut best: Option<BestOf> = None;

    for strategy in SortStrategy::ALL {
        let mut units = base.clone();
        sort_units(&mut units, strategy);
        let result = run_packer(&units, parts, sheets, options);

        log::debug!(
            "strategy {}: sheets={}, yield={:.4}, unplaced={}, score={:.4}",
            strategy,
            result.sheet_count(),
            result.stats.yield_ratio,
            result.unplaced_count(),
            score(&result, sheet_area)
        );

        let better = best.as_ref().map_or(true, |b| {
            compare_layouts(&result, &b.result, sheet_area) == Ordering::Less
        });
        if better {
            best = Some(BestOf {
                result,
                strategy,
                units,
            });
        }
    }

    let mut best = best.unwrap_or_else(|| BestOf {
        result: LayoutResult::new(),
        strategy: SortStrategy::Area,
        units: Vec::new(),
    });
    log::info!(
        "multi-strategy winner: {} ({} sheets, yield {})",
        best.strategy,
        best.result.sheet_count(),
        best.result.yield_percent()
    );
    best.result.strategy_used = Some(StrategyUsed::BestOf(best.strategy));
    best
}

/// Packs under every sort order and returns the best layout.
pub fn pack_optimized(
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    options: &PackOptions,
) -> Result<LayoutResult> {
    validate_inputs(parts, sheets)?;
    Ok(best_of(parts, sheets, options).result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_sorted_labels_strategy() {
        let parts = vec![PartSpec::new("A", 100.0, 100.0)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];
        let result =
            pack_sorted(&parts, &sheets, &PackOptions::default(), SortStrategy::Width).unwrap();
        assert_eq!(result.strategy_used, Some(StrategyUsed::Sorted(SortStrategy::Width)));
    }

    #[test]
    fn test_best_of_is_deterministic() {
        let parts = vec![
            PartSpec::new("SIDE", 720.0, 560.0).with_quantity(4),
            PartSpec::new("SHELF", 764.0, 540.0).with_quantity(6),
            PartSpec::new("BACK", 1200.0, 780.0).with_quantity(2),
            PartSpec::new("RAIL", 764.0, 100.0).with_quantity(4),
        ];
        let sheets = vec![StockSheetSpec::new("S", 2750.0, 1830.0).with_kerf(4.0)];
        let options = PackOptions::default();

        let a = best_of(&parts, &sheets, &options);
        let b = best_of(&parts, &sheets, &options);
        assert_eq!(a.strategy, b.strategy);
        assert_eq!(a.result.sheet_count(), b.result.sheet_count());
        assert_eq!(a.units, b.units);
        assert_eq!(a.result.placed_count(), 16);
    }

    #[test]
    fn test_compare_prefers_fewer_sheets() {
        let parts = vec![PartSpec::new("Q", 500.0, 500.0).with_quantity(4)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];
        let options = PackOptions::default();

        let units = expand_parts(&parts);
        let one_sheet = run_packer(&units, &parts, &sheets, &options);
        let small = vec![StockSheetSpec::new("S", 500.0, 500.0)];
        let four_sheets = run_packer(&units, &parts, &small, &options);

        assert_eq!(
            compare_layouts(&one_sheet, &four_sheets, 1e6),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_prefers_higher_yield_on_equal_sheets() {
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];
        let options = PackOptions::default();
        let pack_one = |part: PartSpec| {
            let parts = vec![part];
            run_packer(&expand_parts(&parts), &parts, &sheets, &options)
        };
        let sparse = pack_one(PartSpec::new("SMALL", 500.0, 500.0));
        let dense = pack_one(PartSpec::new("LARGE", 800.0, 800.0));

        assert_eq!(sparse.sheet_count(), dense.sheet_count());
        assert!(dense.stats.yield_ratio > sparse.stats.yield_ratio);
        assert_eq!(compare_layouts(&dense, &sparse, 1e6), Ordering::Less);
        assert_eq!(compare_layouts(&sparse, &dense, 1e6), Ordering::Greater);
    }

    #[test]
    fn test_full_tie_keeps_first_declared_strategy() {
        // Every sort order yields the same layout for a single square part
        let parts = vec![PartSpec::new("SQ", 400.0, 400.0).with_quantity(3)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];
        let options = PackOptions::default();

        let first = pack_sorted(&parts, &sheets, &options, SortStrategy::ALL[0]).unwrap();
        for strategy in SortStrategy::ALL {
            let other = pack_sorted(&parts, &sheets, &options, strategy).unwrap();
            assert_eq!(compare_layouts(&first, &other, 1e6), Ordering::Equal);
        }

        let best = best_of(&parts, &sheets, &options);
        assert_eq!(best.strategy, SortStrategy::Area);
        assert_eq!(
            best.result.strategy_used,
            Some(StrategyUsed::BestOf(SortStrategy::Area))
        );
    }

    #[test]
    fn test_reference_area_skips_empty_stock() {
        let sheets = vec![
            StockSheetSpec::new("GONE", 100.0, 100.0).with_quantity(0),
            StockSheetSpec::new("S", 1000.0, 500.0),
        ];
        assert_eq!(reference_sheet_area(&sheets), 500_000.0);
        assert_eq!(reference_sheet_area(&[]), 0.0);
    }
}
