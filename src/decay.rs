use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Equivalent to multiplying by `r` once per time step and flooring the result at
/// v<sub>f</sub>, since the floor is absorbing.
#[derive(Debug, Clone, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Multiplicative {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(Error::InvalidDecay(format!(
                "rate must be in (0, 1], got {rate}"
            )));
        }
        if vi < vf {
            return Err(Error::InvalidDecay(format!(
                "start value {vi} is below the floor {vf}"
            )));
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Default for Multiplicative {
    fn default() -> Self {
        Self {
            rate: 0.995,
            vi: 1.0,
            vf: 0.01,
        }
    }
}

impl Decay for Multiplicative {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}
