//! Node-count sizing for the target cluster.
//!
//! CPU and RAM are packed independently; whichever needs more nodes decides,
//! then the HA reserve is added on top.

use crate::error::{EngineError, Result};
use crate::types::{EstateTotals, SizingPolicy};

impl SizingPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(self.consolidation_ratio > 0.0) || !self.consolidation_ratio.is_finite() {
            return Err(EngineError::invalid_policy(format!(
                "consolidation ratio must be greater than 0 (got {})",
                self.consolidation_ratio
            )));
        }
        if !(0.0..1.0).contains(&self.overhead_fraction) {
            return Err(EngineError::invalid_policy(format!(
                "overhead fraction must be in [0, 1) (got {})",
                self.overhead_fraction
            )));
        }
        if self.node_cores == 0 {
            return Err(EngineError::invalid_policy("node must have at least one core"));
        }
        if !(self.node_ram_gib > 0.0) || !self.node_ram_gib.is_finite() {
            return Err(EngineError::invalid_policy(format!(
                "node RAM must be greater than 0 GiB (got {})",
                self.node_ram_gib
            )));
        }
        Ok(())
    }

    pub fn effective_cores(&self) -> f64 {
        f64::from(self.node_cores) * (1.0 - self.overhead_fraction)
    }

    pub fn effective_ram_gib(&self) -> f64 {
        self.node_ram_gib * (1.0 - self.overhead_fraction)
    }
}

/// Demand expressed in nodes along each resource dimension, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDemand {
    pub by_cpu: f64,
    pub by_ram: f64,
}

impl NodeDemand {
    pub fn bottleneck(&self) -> f64 {
        self.by_cpu.max(self.by_ram)
    }
}

pub fn node_demand(totals: &EstateTotals, policy: &SizingPolicy) -> Result<NodeDemand> {
    policy.validate()?;
    let by_cpu = (totals.total_vcpu / policy.consolidation_ratio) / policy.effective_cores();
    let by_ram = totals.total_ram_gib / policy.effective_ram_gib();
    Ok(NodeDemand { by_cpu, by_ram })
}

/// `ceil(max(cpu-bound, ram-bound)) + ha_margin`; never below `ha_margin`.
pub fn required_nodes(totals: &EstateTotals, policy: &SizingPolicy) -> Result<u32> {
    let demand = node_demand(totals, policy)?;
    let compute = demand.bottleneck().max(0.0).ceil();
    Ok((compute as u32).saturating_add(policy.ha_margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn policy(cores: u32, ram: f64, overhead: f64, ratio: f64) -> SizingPolicy {
        SizingPolicy {
            node_cores: cores,
            node_ram_gib: ram,
            overhead_fraction: overhead,
            consolidation_ratio: ratio,
            ha_margin: 1,
        }
    }

    fn totals(vcpu: f64, ram_gib: f64) -> EstateTotals {
        EstateTotals {
            total_vcpu: vcpu,
            total_ram_gib: ram_gib,
            ..EstateTotals::default()
        }
    }

    #[test]
    fn ram_bound_estate() {
        // 100 x (8 vCPU, 16 GiB) on 16c/64GiB nodes at 4:1
        let p = policy(16, 64.0, 0.0, 4.0);
        let t = totals(800.0, 1600.0);
        let d = node_demand(&t, &p).unwrap();
        assert_eq!(d.by_cpu, 12.5);
        assert_eq!(d.by_ram, 25.0);
        assert_eq!(required_nodes(&t, &p).unwrap(), 26);
    }

    #[test]
    fn cpu_bound_estate_rounds_up() {
        let p = policy(32, 1024.0, 0.0, 2.0);
        let t = totals(1000.0, 100.0);
        // 1000 / 2 / 32 = 15.625
        assert_eq!(required_nodes(&t, &p).unwrap(), 17);
    }

    #[test]
    fn overhead_shrinks_usable_capacity() {
        let p = policy(32, 256.0, 0.25, 4.0);
        assert_eq!(p.effective_cores(), 24.0);
        assert_eq!(p.effective_ram_gib(), 192.0);
        // 960 / 4 / 24 = 10 exactly
        assert_eq!(required_nodes(&totals(960.0, 0.0), &p).unwrap(), 11);
    }

    #[test]
    fn empty_estate_needs_only_the_ha_floor() {
        let mut p = policy(16, 64.0, 0.1, 4.0);
        p.ha_margin = 2;
        assert_eq!(required_nodes(&EstateTotals::default(), &p).unwrap(), 2);
    }

    #[test]
    fn rejects_bad_policies() {
        let t = totals(10.0, 10.0);
        for bad in [
            policy(16, 64.0, 0.0, 0.0),
            policy(16, 64.0, 0.0, -1.0),
            policy(16, 64.0, 0.0, f64::NAN),
            policy(16, 64.0, 1.0, 4.0),
            policy(0, 64.0, 0.0, 4.0),
            policy(16, 0.0, 0.0, 4.0),
        ] {
            assert!(matches!(
                required_nodes(&t, &bad),
                Err(EngineError::InvalidPolicy(_))
            ));
        }
    }

    proptest! {
        #[test]
        fn never_below_ha_floor(
            vcpu in 0.0f64..100_000.0,
            ram in 0.0f64..500_000.0,
            overhead in 0.0f64..0.3,
            ratio in 1.0f64..6.0,
            ha in 0u32..4,
        ) {
            let mut p = policy(32, 256.0, overhead, ratio);
            p.ha_margin = ha;
            let n = required_nodes(&totals(vcpu, ram), &p).unwrap();
            prop_assert!(n >= ha);
        }

        #[test]
        fn monotonic_in_demand(
            vcpu in 0.0f64..50_000.0,
            ram in 0.0f64..200_000.0,
            extra_vcpu in 0.0f64..10_000.0,
            extra_ram in 0.0f64..50_000.0,
        ) {
            let p = policy(24, 192.0, 0.1, 3.0);
            let base = required_nodes(&totals(vcpu, ram), &p).unwrap();
            prop_assert!(required_nodes(&totals(vcpu + extra_vcpu, ram), &p).unwrap() >= base);
            prop_assert!(required_nodes(&totals(vcpu, ram + extra_ram), &p).unwrap() >= base);
        }
    }
}
