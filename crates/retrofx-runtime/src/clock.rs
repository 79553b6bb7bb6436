//! Fixed-quantum accumulator
//!
//! Every simulated component advances in discrete steps of a fixed length
//! while the host reports arbitrary frame times. Unlike a catch-up game
//! clock, a quantum timer fires at most once per host frame and discards
//! any surplus when it does.

/// How the accumulated time is compared against the quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Fire once accumulated time is strictly greater than the quantum
    Exceeds,
    /// Fire once accumulated time is greater than or equal to the quantum
    Reaches,
}

#[derive(Debug, Clone)]
pub struct QuantumTimer {
    /// Step length in milliseconds
    pub quantum_ms: f64,
    pub threshold: Threshold,
    accumulated: f64,
}

impl QuantumTimer {
    /// Timer that fires when accumulated time exceeds `quantum_ms`
    pub fn exceeding(quantum_ms: f64) -> Self {
        Self {
            quantum_ms,
            threshold: Threshold::Exceeds,
            accumulated: 0.0,
        }
    }

    /// Timer that fires when accumulated time reaches `quantum_ms`
    pub fn reaching(quantum_ms: f64) -> Self {
        Self {
            quantum_ms,
            threshold: Threshold::Reaches,
            accumulated: 0.0,
        }
    }

    /// Add elapsed host time. Returns true when one step should run; the
    /// accumulator restarts from zero in that case.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.accumulated += elapsed_ms;
        let fire = match self.threshold {
            Threshold::Exceeds => self.accumulated > self.quantum_ms,
            Threshold::Reaches => self.accumulated >= self.quantum_ms,
        };
        if fire {
            self.accumulated = 0.0;
        }
        fire
    }

    /// Time accumulated since the last step
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
