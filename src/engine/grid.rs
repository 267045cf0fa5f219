//! Grid topology for a single chunk of a domain-decomposed Yee grid
//!
//! A chunk stores its owned points plus one mirrored (not-owned) layer on
//! each side of every active axis. Points are addressed by a flat index;
//! neighbours along an axis are reached by adding the axis stride.

/// Number of spatial direction tags
pub const NUM_DIRECTIONS: usize = 5;

/// Number of field component tags
pub const NUM_COMPONENTS: usize = 20;

/// Width of the mirrored boundary layer on each side of an active axis
pub const BOUNDARY_WIDTH: usize = 1;

/// Spatial axis tag (Cartesian and cylindrical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    X,
    Y,
    Z,
    R,
    P,
}

impl Direction {
    pub const ALL: [Direction; NUM_DIRECTIONS] = [
        Direction::X,
        Direction::Y,
        Direction::Z,
        Direction::R,
        Direction::P,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    fn is_cylindrical(self) -> bool {
        matches!(self, Direction::R | Direction::P)
    }
}

/// Kind of simulated field a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Electric,
    Magnetic,
    Displacement,
    Induction,
}

/// Field component: a field kind along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Ex,
    Ey,
    Ez,
    Er,
    Ep,
    Hx,
    Hy,
    Hz,
    Hr,
    Hp,
    Dx,
    Dy,
    Dz,
    Dr,
    Dp,
    Bx,
    By,
    Bz,
    Br,
    Bp,
}

impl Component {
    pub const ALL: [Component; NUM_COMPONENTS] = [
        Component::Ex,
        Component::Ey,
        Component::Ez,
        Component::Er,
        Component::Ep,
        Component::Hx,
        Component::Hy,
        Component::Hz,
        Component::Hr,
        Component::Hp,
        Component::Dx,
        Component::Dy,
        Component::Dz,
        Component::Dr,
        Component::Dp,
        Component::Bx,
        Component::By,
        Component::Bz,
        Component::Br,
        Component::Bp,
    ];

    /// Build the component of `kind` pointing along `direction`
    pub fn new(kind: FieldKind, direction: Direction) -> Self {
        Self::ALL[kind as usize * NUM_DIRECTIONS + direction.index()]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FieldKind {
        match self.index() / NUM_DIRECTIONS {
            0 => FieldKind::Electric,
            1 => FieldKind::Magnetic,
            2 => FieldKind::Displacement,
            _ => FieldKind::Induction,
        }
    }

    /// Axis this component points along
    pub fn direction(self) -> Direction {
        Direction::ALL[self.index() % NUM_DIRECTIONS]
    }

    /// Same field kind, rotated onto `direction`
    pub fn with_direction(self, direction: Direction) -> Self {
        Self::new(self.kind(), direction)
    }

    pub fn is_electric(self) -> bool {
        self.kind() == FieldKind::Electric
    }

    pub fn is_magnetic(self) -> bool {
        self.kind() == FieldKind::Magnetic
    }
}

/// Dimensionality of the simulation grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    D1,
    D2,
    D3,
    Cylindrical,
}

impl Dimensionality {
    /// Axes that carry grid points, slowest-varying first
    pub fn active_directions(self) -> &'static [Direction] {
        match self {
            Dimensionality::D1 => &[Direction::Z],
            Dimensionality::D2 => &[Direction::X, Direction::Y],
            Dimensionality::D3 => &[Direction::X, Direction::Y, Direction::Z],
            Dimensionality::Cylindrical => &[Direction::Z, Direction::R],
        }
    }

    pub fn has_direction(self, direction: Direction) -> bool {
        self.active_directions().contains(&direction)
    }

    /// Rotate `direction` by `shift` positions in the cyclic order of this
    /// grid (X→Y→Z for Cartesian axes, R→P→Z for cylindrical ones)
    pub fn cycle_direction(self, direction: Direction, shift: usize) -> Direction {
        let cylindrical = direction.is_cylindrical()
            || (direction == Direction::Z && self == Dimensionality::Cylindrical);
        let cycle = if cylindrical {
            [Direction::R, Direction::P, Direction::Z]
        } else {
            [Direction::X, Direction::Y, Direction::Z]
        };
        let pos = cycle.iter().position(|&d| d == direction).unwrap_or(0);
        cycle[(pos + shift) % 3]
    }
}

/// Add a signed stride to a flat point index
#[inline(always)]
pub fn shift(i: usize, stride: isize) -> usize {
    i.wrapping_add_signed(stride)
}

/// Layout of one chunk: owned points plus mirrored boundary layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkGrid {
    dim: Dimensionality,
    /// Owned points per direction (1 for inactive directions)
    owned: [usize; NUM_DIRECTIONS],
    /// Flat-index stride per direction (0 for inactive directions)
    stride: [usize; NUM_DIRECTIONS],
    ntot: usize,
}

impl ChunkGrid {
    /// Create a chunk with `owned[k]` owned points along the k-th active axis
    /// of `dim` (in [`Dimensionality::active_directions`] order)
    pub fn new(dim: Dimensionality, owned: &[usize]) -> Self {
        let mut owned_per_dir = [1; NUM_DIRECTIONS];
        for (&d, &n) in dim.active_directions().iter().zip(owned) {
            owned_per_dir[d.index()] = n.max(1);
        }

        let mut stride = [0; NUM_DIRECTIONS];
        let mut running = 1;
        for &d in dim.active_directions().iter().rev() {
            stride[d.index()] = running;
            running *= owned_per_dir[d.index()] + 2 * BOUNDARY_WIDTH;
        }

        Self {
            dim,
            owned: owned_per_dir,
            stride,
            ntot: running,
        }
    }

    pub fn d1(nz: usize) -> Self {
        Self::new(Dimensionality::D1, &[nz])
    }

    pub fn d2(nx: usize, ny: usize) -> Self {
        Self::new(Dimensionality::D2, &[nx, ny])
    }

    pub fn d3(nx: usize, ny: usize, nz: usize) -> Self {
        Self::new(Dimensionality::D3, &[nx, ny, nz])
    }

    pub fn cylindrical(nr: usize, nz: usize) -> Self {
        Self::new(Dimensionality::Cylindrical, &[nz, nr])
    }

    pub fn dim(&self) -> Dimensionality {
        self.dim
    }

    /// Total number of stored points, owned and mirrored
    pub fn ntot(&self) -> usize {
        self.ntot
    }

    /// Number of points this chunk is authoritative for
    pub fn owned_count(&self) -> usize {
        self.dim
            .active_directions()
            .iter()
            .map(|d| self.owned[d.index()])
            .product()
    }

    /// Owned points along `direction`
    pub fn owned_extent(&self, direction: Direction) -> usize {
        self.owned[direction.index()]
    }

    /// Flat-index distance between neighbours along `direction`
    pub fn stride(&self, direction: Direction) -> usize {
        self.stride[direction.index()]
    }

    /// Stride along `direction` as seen from component `c`: magnetic
    /// components sit half a cell on the other side, so the sign flips
    pub fn signed_stride(&self, c: Component, direction: Direction) -> isize {
        let s = self.stride(direction) as isize;
        if c.is_magnetic() {
            -s
        } else {
            s
        }
    }

    /// Flat index of a stored position given in active-axis order, where
    /// coordinate 0 is the lower mirrored layer
    pub fn index_at(&self, pos: &[usize]) -> usize {
        self.dim
            .active_directions()
            .iter()
            .zip(pos)
            .map(|(d, &p)| p * self.stride(*d))
            .sum()
    }

    /// Flat index of an owned position (coordinates start at the first
    /// owned point)
    pub fn owned_index(&self, pos: &[usize]) -> usize {
        self.dim
            .active_directions()
            .iter()
            .zip(pos)
            .map(|(d, &p)| (p + BOUNDARY_WIDTH) * self.stride(*d))
            .sum()
    }

    /// Call `f` with the flat index of every owned point, in memory order
    #[inline]
    pub fn for_each_owned<F: FnMut(usize)>(&self, mut f: F) {
        let mut loops = [(0, 1, 0); 3];
        for (slot, &d) in self.dim.active_directions().iter().enumerate() {
            loops[slot] = (
                BOUNDARY_WIDTH,
                BOUNDARY_WIDTH + self.owned[d.index()],
                self.stride(d),
            );
        }
        let [(a0, a1, sa), (b0, b1, sb), (c0, c1, sc)] = loops;

        for a in a0..a1 {
            let base_a = a * sa;
            for b in b0..b1 {
                let base_b = base_a + b * sb;
                for c in c0..c1 {
                    f(base_b + c * sc);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_roundtrip() {
        for c in Component::ALL {
            assert_eq!(Component::new(c.kind(), c.direction()), c);
        }
        assert_eq!(Component::Ex.with_direction(Direction::Z), Component::Ez);
        assert_eq!(Component::Hp.with_direction(Direction::R), Component::Hr);
        assert!(Component::Ey.is_electric());
        assert!(Component::Hz.is_magnetic());
        assert!(!Component::Dx.is_electric() && !Component::Bx.is_magnetic());
    }

    #[test]
    fn test_cycle_direction() {
        let d3 = Dimensionality::D3;
        assert_eq!(d3.cycle_direction(Direction::X, 1), Direction::Y);
        assert_eq!(d3.cycle_direction(Direction::X, 2), Direction::Z);
        assert_eq!(d3.cycle_direction(Direction::Z, 1), Direction::X);

        let cyl = Dimensionality::Cylindrical;
        assert_eq!(cyl.cycle_direction(Direction::R, 1), Direction::P);
        assert_eq!(cyl.cycle_direction(Direction::P, 1), Direction::Z);
        assert_eq!(cyl.cycle_direction(Direction::Z, 1), Direction::R);
    }

    #[test]
    fn test_strides_and_counts() {
        let grid = ChunkGrid::d3(4, 3, 2);
        assert_eq!(grid.ntot(), 6 * 5 * 4);
        assert_eq!(grid.owned_count(), 24);
        assert_eq!(grid.stride(Direction::Z), 1);
        assert_eq!(grid.stride(Direction::Y), 4);
        assert_eq!(grid.stride(Direction::X), 20);
        assert_eq!(grid.stride(Direction::R), 0);
        assert_eq!(grid.signed_stride(Component::Hx, Direction::Y), -4);
        assert_eq!(grid.signed_stride(Component::Ex, Direction::Y), 4);

        let cyl = ChunkGrid::cylindrical(5, 2);
        assert_eq!(cyl.stride(Direction::R), 1);
        assert_eq!(cyl.stride(Direction::Z), 7);
        assert_eq!(cyl.stride(Direction::P), 0);
    }

    #[test]
    fn test_owned_iteration_skips_boundary_layer() {
        let grid = ChunkGrid::d2(3, 2);
        let mut seen = Vec::new();
        grid.for_each_owned(|i| seen.push(i));

        assert_eq!(seen.len(), grid.owned_count());
        assert_eq!(seen[0], grid.owned_index(&[0, 0]));
        assert_eq!(*seen.last().unwrap(), grid.owned_index(&[2, 1]));
        assert!(!seen.contains(&grid.index_at(&[0, 0])));

        // every owned point has both neighbours stored along each axis
        for &i in &seen {
            for &d in grid.dim().active_directions() {
                let s = grid.stride(d) as isize;
                assert!(shift(i, s) < grid.ntot());
                assert!(i >= grid.stride(d));
            }
        }
    }
}
