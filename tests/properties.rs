use perf_lab::{
    C, Grid, Region, calc_complex_numbers, escape_time, is_prime, unique_paths_dp,
    unique_paths_recursive,
};
use proptest::prelude::*;

fn sieve(limit: usize) -> Vec<bool> {
    let mut flags = vec![true; limit + 1];
    flags[0] = false;
    if limit >= 1 {
        flags[1] = false;
    }
    let mut i = 2;
    while i * i <= limit {
        if flags[i] {
            let mut j = i * i;
            while j <= limit {
                flags[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    flags
}

#[test]
fn trial_division_matches_sieve() {
    let flags = sieve(20_000);
    for (n, &expected) in flags.iter().enumerate() {
        assert_eq!(is_prime(n as u64), expected, "n = {n}");
    }
}

fn grid_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1usize..7, 1usize..7).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(prop_oneof![3 => Just(0u8), 1 => Just(1u8)], cols), rows)
    })
}

proptest! {
    #[test]
    fn escape_time_within_budget(re in -3.0f64..3.0, im in -3.0f64..3.0, max_iter in 0u32..200) {
        let n = escape_time(C::new(re, im), C::new(-0.62772, -0.42193), max_iter);
        prop_assert!(n <= max_iter);
    }

    #[test]
    fn smaller_budget_truncates(re in -2.0f64..2.0, im in -2.0f64..2.0, small in 0u32..100, extra in 0u32..100) {
        let c = C::new(-0.62772, -0.42193);
        let z = C::new(re, im);
        let short = escape_time(z, c, small);
        let long = escape_time(z, c, small + extra);
        prop_assert_eq!(short, long.min(small));
    }

    #[test]
    fn grid_is_rectangular(width in 1usize..80) {
        let grid = calc_complex_numbers(Region::default(), width).unwrap();
        prop_assert_eq!(grid.points.len(), grid.width * grid.height);
        prop_assert!(grid.width == width || grid.width == width + 1);
        prop_assert!(grid.height == width || grid.height == width + 1);
    }

    #[test]
    fn recursive_and_tabulated_paths_agree(cells in grid_strategy()) {
        let grid = Grid::new(cells).unwrap();
        prop_assert_eq!(unique_paths_recursive(&grid), unique_paths_dp(&grid));
    }
}
