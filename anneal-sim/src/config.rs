use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schedule::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Sequential,
    Parallel,
    Multispin,
    Quantum,
}

impl TryFrom<&str> for Engine {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "parallel" => Ok(Self::Parallel),
            "multispin" => Ok(Self::Multispin),
            "quantum" => Ok(Self::Quantum),
            _ => Err(format!(
                "unknown engine '{s}', expected 'sequential', 'parallel', 'multispin' or 'quantum'"
            )),
        }
    }
}

fn validate_quantum_config(cfg: &QuantumConfig) -> Result<(), ValidationError> {
    if cfg.n_slices < 1 {
        return Err(ValidationError::new("n_slices must be >= 1"));
    }
    if !(cfg.temperature.is_finite() && cfg.temperature > 0.0) {
        return Err(ValidationError::new("temperature must be finite and > 0"));
    }
    Ok(())
}

/// Path-integral parameters; the schedule then holds transverse fields.
#[derive(Debug, Clone, Copy, PartialEq, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_quantum_config"))]
pub struct QuantumConfig {
    pub n_slices: usize,
    pub temperature: f32,
}

fn validate_anneal_config(cfg: &AnnealConfig) -> Result<(), ValidationError> {
    if cfg.sweeps < 1 {
        return Err(ValidationError::new("sweeps must be >= 1"));
    }
    if cfg.schedule.steps < 1 {
        return Err(ValidationError::new("schedule steps must be >= 1"));
    }
    if cfg.n_workers == Some(0) {
        return Err(ValidationError::new("n_workers must be >= 1"));
    }
    if cfg.engine == Engine::Quantum && cfg.quantum.is_none() {
        return Err(ValidationError::new(
            "engine 'quantum' requires n_slices and temperature",
        ));
    }
    Ok(())
}

/// One annealing run: which engine, how many sweeps per schedule value, and
/// the schedule (temperatures, or transverse fields for `quantum`).
#[derive(Debug, Clone, PartialEq, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_anneal_config"))]
pub struct AnnealConfig {
    pub engine: Engine,
    pub sweeps: usize,
    pub schedule: Schedule,
    /// Worker threads for `parallel`; defaults to the rayon global pool size.
    #[serde(default)]
    pub n_workers: Option<usize>,
    #[validate]
    #[serde(default)]
    pub quantum: Option<QuantumConfig>,
}

impl AnnealConfig {
    /// Independent configurations the engine evolves side by side.
    pub fn n_systems(&self) -> usize {
        match self.engine {
            Engine::Sequential | Engine::Parallel => 1,
            Engine::Multispin => crate::mcmc::multispin::REPLICAS,
            Engine::Quantum => self.quantum.map_or(1, |q| q.n_slices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleKind;

    fn base(engine: Engine) -> AnnealConfig {
        AnnealConfig {
            engine,
            sweeps: 10,
            schedule: Schedule {
                kind: ScheduleKind::Geometric,
                start: 3.0,
                end: 0.05,
                steps: 20,
            },
            n_workers: None,
            quantum: None,
        }
    }

    #[test]
    fn test_engine_parse() {
        assert_eq!(Engine::try_from("multispin"), Ok(Engine::Multispin));
        assert!(Engine::try_from("gibbs").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(base(Engine::Sequential).validate().is_ok());

        let mut cfg = base(Engine::Sequential);
        cfg.sweeps = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = base(Engine::Parallel);
        cfg.n_workers = Some(0);
        assert!(cfg.validate().is_err());

        let mut cfg = base(Engine::Quantum);
        assert!(cfg.validate().is_err());
        cfg.quantum = Some(QuantumConfig {
            n_slices: 0,
            temperature: 0.05,
        });
        assert!(cfg.validate().is_err());
        cfg.quantum = Some(QuantumConfig {
            n_slices: 8,
            temperature: 0.05,
        });
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.n_systems(), 8);
    }

    #[test]
    fn test_from_json() {
        let cfg: AnnealConfig = serde_json::from_str(
            r#"{
                "engine": "quantum",
                "sweeps": 5,
                "schedule": {"kind": "linear", "start": 3.0, "end": 0.01, "steps": 30},
                "quantum": {"n_slices": 16, "temperature": 0.02}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.engine, Engine::Quantum);
        assert_eq!(cfg.n_workers, None);
        assert_eq!(cfg.quantum.unwrap().n_slices, 16);
        assert!(cfg.validate().is_ok());
    }
}
