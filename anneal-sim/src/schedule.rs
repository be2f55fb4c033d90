use serde::{Deserialize, Serialize};

use crate::error::{AnnealError, AnnealResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Linear,
    Geometric,
}

impl TryFrom<&str> for ScheduleKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "linear" => Ok(Self::Linear),
            "geometric" => Ok(Self::Geometric),
            _ => Err(format!(
                "unknown schedule kind '{s}', expected 'linear' or 'geometric'"
            )),
        }
    }
}

/// Endpoints and resolution of an annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub kind: ScheduleKind,
    pub start: f32,
    pub end: f32,
    pub steps: usize,
}

impl Schedule {
    /// Materialize the control values, `start` first and `end` last.
    pub fn values(&self) -> AnnealResult<Vec<f32>> {
        match self.kind {
            ScheduleKind::Linear => Self::linear(self.start, self.end, self.steps),
            ScheduleKind::Geometric => Self::geometric(self.start, self.end, self.steps),
        }
    }

    /// `steps` evenly spaced values from `start` to `end`.
    pub fn linear(start: f32, end: f32, steps: usize) -> AnnealResult<Vec<f32>> {
        check_endpoints(start, end, steps)?;
        if steps == 1 {
            return Ok(vec![start]);
        }
        let last = (steps - 1) as f64;
        Ok((0..steps)
            .map(|k| {
                let t = k as f64 / last;
                (start as f64 + t * (end as f64 - start as f64)) as f32
            })
            .collect())
    }

    /// `steps` values from `start` to `end` with a constant ratio.
    pub fn geometric(start: f32, end: f32, steps: usize) -> AnnealResult<Vec<f32>> {
        check_endpoints(start, end, steps)?;
        if steps == 1 {
            return Ok(vec![start]);
        }
        let ratio = (end as f64 / start as f64).powf(1.0 / (steps - 1) as f64);
        Ok((0..steps)
            .map(|k| (start as f64 * ratio.powi(k as i32)) as f32)
            .collect())
    }
}

fn check_endpoints(start: f32, end: f32, steps: usize) -> AnnealResult<()> {
    if steps == 0 {
        return Err(AnnealError::Schedule("steps must be >= 1".to_string()));
    }
    for (name, v) in [("start", start), ("end", end)] {
        if !(v.is_finite() && v > 0.0) {
            return Err(AnnealError::Schedule(format!(
                "{name} must be finite and > 0, got {v}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let v = Schedule::linear(3.0, 1.0, 5).unwrap();
        assert_eq!(v, vec![3.0, 2.5, 2.0, 1.5, 1.0]);
        assert_eq!(Schedule::linear(0.7, 0.1, 1).unwrap(), vec![0.7]);
    }

    #[test]
    fn test_geometric() {
        let v = Schedule::geometric(10.0, 0.01, 4).unwrap();
        assert_eq!(v.len(), 4);
        for (got, want) in v.iter().zip([10.0f32, 1.0, 0.1, 0.01]) {
            assert!((got - want).abs() <= want * 1e-5, "{got} vs {want}");
        }
    }

    #[test]
    fn test_invalid() {
        assert!(Schedule::linear(1.0, 0.5, 0).is_err());
        assert!(Schedule::geometric(0.0, 1.0, 3).is_err());
        assert!(Schedule::linear(1.0, -1.0, 3).is_err());
    }

    #[test]
    fn test_kind_parse_and_values() {
        assert_eq!(ScheduleKind::try_from("geometric"), Ok(ScheduleKind::Geometric));
        assert!(ScheduleKind::try_from("cosine").is_err());
        let s = Schedule {
            kind: ScheduleKind::Linear,
            start: 2.0,
            end: 1.0,
            steps: 3,
        };
        assert_eq!(s.values().unwrap(), vec![2.0, 1.5, 1.0]);
    }
}
