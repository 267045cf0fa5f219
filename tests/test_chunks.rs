//! Tests for chunk-level allocation planning and parallel updates


use test_utils::*;
use wavesim_dispersion::prelude::*;

const ELECTRIC: [Component; 3] = [Component::Ex, Component::Ey, Component::Ez];

fn electric_fields(grid: &ChunkGrid, seed: u64) -> FieldTable {
    let n = grid.ntot();
    field_table(
        ELECTRIC
            .iter()
            .enumerate()
            .map(|(k, &c)| (c, random_array(n, seed + k as u64)))
            .collect(),
    )
}

/// Four chunks in a row; only chunk 1 carries material, with an
/// offdiagonal coupling of Ey into P[Ex]
fn material_row(grid: &ChunkGrid) -> ChunkSet {
    let n = grid.ntot();
    let config = SusceptibilityConfig::from_toml_str(
        r#"
        [[lorentzian]]
        frequency = 1.1
        gamma = 0.05

        [[lorentzian]]
        frequency = 0.4
        gamma = 0.3
        no_omega_0_denominator = true
        "#,
    )
    .unwrap();
    let template = config.build_chain(&SigmaTensor::new(n)).unwrap();

    let chunks = (0..4usize)
        .map(|id| {
            let mut chain = template.clone();
            if id == 1 {
                for s in chain.iter_mut() {
                    let sigma = s.base_mut().sigma_mut();
                    sigma.set(Component::Ex, Direction::X, random_array(n, 40)).unwrap();
                    sigma.set(Component::Ex, Direction::Y, random_array(n, 41)).unwrap();
                }
            }
            let neighbors = [id.checked_sub(1), Some(id + 1).filter(|&j| j < 4)]
                .into_iter()
                .flatten()
                .collect();
            Chunk::new(id, grid.clone(), chain, electric_fields(grid, 100 * id as u64))
                .with_neighbors(neighbors)
        })
        .collect();
    ChunkSet::new(chunks)
}

#[test]
fn test_allocation_is_uniform_across_borders() {
    let grid = ChunkGrid::d3(3, 3, 3);
    let mut set = material_row(&grid);
    let plan = set.setup().unwrap();

    for entry in 0..2 {
        assert!(plan.needs_p(entry, Component::Ex));
        assert!(!plan.needs_p(entry, Component::Ey));
        assert!(!plan.needs_p(entry, Component::Ez));
    }
    assert_eq!(plan.copies, 1);
    assert_eq!(plan.exchanged_components(), vec![Component::Ey]);

    assert!(set.is_allocation_uniform());
    for chunk in &set.chunks {
        assert_eq!(
            chunk.allocated_components(),
            vec![vec![Component::Ex], vec![Component::Ex]]
        );
        // the sigma flags were reconciled, so dark chunks agree too
        for s in chunk.chain.iter() {
            assert!(!s.base().sigma().is_trivial(Component::Ex, Direction::Y));
            assert!(s.needs_w_notowned(Component::Ey, &chunk.w));
        }
    }
    assert_eq!(set.total_internal_data(), 4 * 2 * grid.ntot());
}

#[test]
fn test_parallel_step_matches_sequential() {
    let grid = ChunkGrid::d3(4, 3, 2);
    let mut parallel = material_row(&grid);
    parallel.setup().unwrap();
    let mut sequential = parallel.clone();

    for _ in 0..5 {
        parallel.step_polarization(0.05);
        for chunk in &mut sequential.chunks {
            chunk.step_polarization(0.05);
        }
    }

    for (a, b) in parallel.chunks.iter().zip(&sequential.chunks) {
        for (sa, sb) in a.states.iter().zip(&b.states) {
            assert_eq!(sa.p.get(Component::Ex, 0), sb.p.get(Component::Ex, 0));
            assert_eq!(sa.scratch, sb.scratch);
        }
    }

    let lit = &parallel.chunks[1];
    let total = total_polarization(&lit.states, Component::Ex, 0).unwrap();
    assert!(total.norm_squared() > 0.0);

    let dark = &parallel.chunks[2];
    let total = total_polarization(&dark.states, Component::Ex, 0).unwrap();
    assert_eq!(total.norm_squared(), 0.0);
}

#[test]
fn test_complex_fields_allocate_both_copies() {
    let grid = ChunkGrid::d2(3, 3);
    let n = grid.ntot();
    let sigma = SigmaTensor::new(n)
        .with(Component::Ez, Direction::Z, GridArray::from_scalar(n, 1.0))
        .unwrap();
    let mut chain = SusceptibilityChain::new();
    chain.push(Box::new(LorentzianSusceptibility::new(sigma, 1.0, 0.1, false)));

    let mut w = FieldTable::new();
    w.set(Component::Ez, 0, GridArray::from_scalar(n, 1.0));
    w.set(Component::Ez, 1, GridArray::from_scalar(n, -1.0));

    let mut set = ChunkSet::new(vec![Chunk::new(0, grid.clone(), chain, w)]);
    let plan = set.setup().unwrap();
    assert_eq!(plan.copies, NUM_COPIES);
    assert_eq!(set.total_internal_data(), 2 * n);

    set.step_polarization(0.1);
    let state = &set.chunks[0].states[0];
    let i = grid.owned_index(&[1, 1]);
    let re = state.p.get(Component::Ez, 0).unwrap()[i];
    let im = state.p.get(Component::Ez, 1).unwrap()[i];
    assert!(re > 0.0);
    assert_eq!(im, -re);
}
