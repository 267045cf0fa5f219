//! TOML configuration for susceptibility chains.
//!
//! ```toml
//! [[lorentzian]]
//! frequency = 1.1
//! gamma = 0.05
//!
//! [[lorentzian]]
//! frequency = 1.0
//! gamma = 0.2
//! no_omega_0_denominator = true
//! ```

use crate::domain::chain::SusceptibilityChain;
use crate::domain::lorentzian::LorentzianSusceptibility;
use crate::domain::sigma::SigmaTensor;
use crate::error::{Result, SusceptibilityError};
use serde::{Deserialize, Serialize};

/// Parameters of one Lorentzian oscillator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LorentzianParams {
    /// Resonance frequency f₀ (ω₀ = 2πf₀).
    pub frequency: f64,
    /// Damping rate γ.
    #[serde(default)]
    pub gamma: f64,
    /// Suppress the ω₀² term in the update normalization (Drude limit).
    #[serde(default)]
    pub no_omega_0_denominator: bool,
}

impl LorentzianParams {
    /// Reject non-finite or negative parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(SusceptibilityError::InvalidParameter {
                name: "frequency",
                value: self.frequency,
            });
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(SusceptibilityError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        Ok(())
    }
}

/// Ordered list of susceptibilities making up one material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SusceptibilityConfig {
    #[serde(default)]
    pub lorentzian: Vec<LorentzianParams>,
}

impl SusceptibilityConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SusceptibilityConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.lorentzian.iter().try_for_each(LorentzianParams::validate)
    }

    /// Build a chain in configuration order, each entry with its own copy
    /// of `sigma`.
    pub fn build_chain(&self, sigma: &SigmaTensor) -> Result<SusceptibilityChain> {
        let mut chain = SusceptibilityChain::new();
        for params in &self.lorentzian {
            chain.push(Box::new(LorentzianSusceptibility::from_params(
                sigma.clone(),
                params,
            )?));
        }
        log::debug!("built susceptibility chain with {} entries", chain.len());
        Ok(chain)
    }
}
