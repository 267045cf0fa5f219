//! Lorentzian (damped harmonic oscillator) susceptibility
//!
//! Each polarization component obeys
//!
//! d²P/dt² + 2πγ dP/dt + (2πf₀)² P = (2πf₀)² σ W
//!
//! discretized with central differences on the staggered grid. The update
//! only needs the current and previous P, so the previous value is kept in
//! the scratch buffer and no separate velocity field is stored.

use crate::config::LorentzianParams;
use crate::domain::fields::{FieldTable, NUM_COPIES};
use crate::domain::sigma::SigmaTensor;
use crate::domain::susceptibility::{Susceptibility, SusceptibilityBase};
use crate::engine::array::GridArray;
use crate::engine::grid::{shift, ChunkGrid, Component};
use crate::error::Result;
use num_complex::Complex64;
use num_traits::Zero;
use std::f64::consts::PI;

/// Damped harmonic oscillator susceptibility
#[derive(Debug, Clone)]
pub struct LorentzianSusceptibility {
    base: SusceptibilityBase,
    /// Resonance frequency f₀ (in units where ω = 2πf)
    omega_0: f64,
    /// Damping rate γ (same units as f₀)
    gamma: f64,
    /// Drop the restoring-force term from the update normalization
    no_omega_0_denominator: bool,
}

impl LorentzianSusceptibility {
    pub fn new(sigma: SigmaTensor, omega_0: f64, gamma: f64, no_omega_0_denominator: bool) -> Self {
        Self {
            base: SusceptibilityBase::new(sigma),
            omega_0,
            gamma,
            no_omega_0_denominator,
        }
    }

    /// Drude-like variant: the ω₀² factor only scales the drive, giving a
    /// frequency-independent conductivity limit for small damping
    pub fn drude(sigma: SigmaTensor, frequency: f64, gamma: f64) -> Self {
        Self::new(sigma, frequency, gamma, true)
    }

    /// Build from validated configuration parameters
    pub fn from_params(sigma: SigmaTensor, params: &LorentzianParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(
            sigma,
            params.frequency,
            params.gamma,
            params.no_omega_0_denominator,
        ))
    }

    pub fn omega_0(&self) -> f64 {
        self.omega_0
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn no_omega_0_denominator(&self) -> bool {
        self.no_omega_0_denominator
    }

    /// Frequency-domain susceptibility χ(f) for a local coupling `sigma`
    pub fn chi1(&self, freq: f64, sigma: f64) -> Complex64 {
        if sigma == 0.0 {
            return Complex64::zero();
        }
        let w0sqr = self.omega_0 * self.omega_0;
        let denom = if self.no_omega_0_denominator {
            Complex64::new(-freq * freq, -self.gamma * freq)
        } else {
            Complex64::new(w0sqr - freq * freq, -self.gamma * freq)
        };
        sigma * w0sqr / denom
    }

    /// Per-step constants of the two-level recurrence
    pub fn coefficients(&self, dt: f64) -> LorentzianCoefficients {
        LorentzianCoefficients::new(self.omega_0, self.gamma, self.no_omega_0_denominator, dt)
    }
}

/// Constants of the update
///
/// p_new = gamma1inv · [p·(2 − omega0dtsqr_denom) − gamma1·p_prev + omega0dtsqr·drive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorentzianCoefficients {
    /// (2πf₀)² dt²
    pub omega0dtsqr: f64,
    /// omega0dtsqr, or 0 when the denominator term is suppressed
    pub omega0dtsqr_denom: f64,
    /// 1 − 2πγ dt/2
    pub gamma1: f64,
    /// 1 / (1 + 2πγ dt/2)
    pub gamma1inv: f64,
}

impl LorentzianCoefficients {
    pub fn new(omega_0: f64, gamma: f64, no_omega_0_denominator: bool, dt: f64) -> Self {
        let omega2pi = 2.0 * PI * omega_0;
        let g2pi = gamma * 2.0 * PI;
        let omega0dtsqr = omega2pi * omega2pi * dt * dt;
        Self {
            omega0dtsqr,
            omega0dtsqr_denom: if no_omega_0_denominator {
                0.0
            } else {
                omega0dtsqr
            },
            gamma1: 1.0 - g2pi * dt / 2.0,
            gamma1inv: 1.0 / (1.0 + g2pi * dt / 2.0),
        }
    }

    /// One step of the recurrence at a single point
    #[inline(always)]
    pub fn advance(&self, pcur: f64, pprev: f64, drive: f64) -> f64 {
        self.gamma1inv
            * (pcur * (2.0 - self.omega0dtsqr_denom) - self.gamma1 * pprev
                + self.omega0dtsqr * drive)
    }
}

/// Offdiagonal coupling of P[c] to the field along another axis
#[derive(Debug, Clone, Copy)]
struct OffDiagonal<'a> {
    sigma: &'a GridArray,
    field: &'a GridArray,
    /// Signed stride along the coupled field's axis
    stride: isize,
}

impl OffDiagonal<'_> {
    /// Stable four-point average of σ·W onto the grid of P[c].
    ///
    /// W lives half a cell away along both its own axis and the axis of c,
    /// so the two W values straddling each of the points i and i + own are
    /// averaged before weighting with σ there.
    #[inline(always)]
    fn at(&self, i: usize, own: isize) -> f64 {
        let g = self.field;
        let u = self.sigma;
        let sx = self.stride;
        let is = shift(i, own);
        0.25 * ((g[i] + g[shift(i, -sx)]) * u[i] + (g[is] + g[shift(is, -sx)]) * u[is])
    }
}

impl Susceptibility for LorentzianSusceptibility {
    fn base(&self) -> &SusceptibilityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SusceptibilityBase {
        &mut self.base
    }

    fn clone_box(&self) -> Box<dyn Susceptibility> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        if self.no_omega_0_denominator {
            "drude"
        } else {
            "lorentzian"
        }
    }

    /// The internal data is a backup of P from the previous timestep, one
    /// grid's worth per allocated (component, copy) pair. The backup shares
    /// the flat index space of P, so it covers every stored point, owned
    /// and mirrored (`grid.ntot()`), not only `grid.owned_count()`.
    fn num_internal_data(&self, p: &FieldTable, grid: &ChunkGrid) -> usize {
        p.allocated_pairs() * grid.ntot()
    }

    fn update_p(
        &self,
        p: &mut FieldTable,
        w: &FieldTable,
        _w_prev: &FieldTable,
        dt: f64,
        grid: &ChunkGrid,
        scratch: &mut [f64],
    ) {
        let k = self.coefficients(dt);
        let sigma = self.base.sigma();
        let ntot = grid.ntot();
        let mut offset = 0;

        for c in Component::ALL {
            for cmp in 0..NUM_COPIES {
                let Some(pc) = p.get_mut(c, cmp) else {
                    continue;
                };
                let pp = &mut scratch[offset..offset + ntot];
                offset += ntot;

                let d = c.direction();
                let (Some(wc), Some(s)) = (w.get(c, cmp), sigma.get(c, d)) else {
                    continue;
                };

                let is = grid.signed_stride(c, d);
                let offdiag = move |shift_by: usize| {
                    let dk = grid.dim().cycle_direction(d, shift_by);
                    let field = w.get(c.with_direction(dk), cmp)?;
                    let coef = sigma.nontrivial(c, dk)?;
                    Some(OffDiagonal {
                        sigma: coef,
                        field,
                        stride: grid.signed_stride(c, dk),
                    })
                };
                let (mut o1, mut o2) = (offdiag(1), offdiag(2));

                // make the first slot the non-trivial one if possible
                if o1.is_none() && o2.is_some() {
                    std::mem::swap(&mut o1, &mut o2);
                }

                match (o1, o2) {
                    (Some(o1), Some(o2)) => {
                        log::trace!("{} P[{:?}][{}]: 3x3 anisotropic", self.name(), c, cmp);
                        grid.for_each_owned(|i| {
                            let pcur = pc[i];
                            pc[i] = k.advance(
                                pcur,
                                pp[i],
                                s[i] * wc[i] + o1.at(i, is) + o2.at(i, is),
                            );
                            pp[i] = pcur;
                        });
                    }
                    (Some(o1), None) => {
                        log::trace!("{} P[{:?}][{}]: 2x2 anisotropic", self.name(), c, cmp);
                        grid.for_each_owned(|i| {
                            let pcur = pc[i];
                            pc[i] = k.advance(pcur, pp[i], s[i] * wc[i] + o1.at(i, is));
                            pp[i] = pcur;
                        });
                    }
                    _ => {
                        log::trace!("{} P[{:?}][{}]: isotropic", self.name(), c, cmp);
                        grid.for_each_owned(|i| {
                            let pcur = pc[i];
                            pc[i] = k.advance(pcur, pp[i], s[i] * wc[i]);
                            pp[i] = pcur;
                        });
                    }
                }
            }
        }
    }
}
