//! Synthetic vInfo export for demos and tests.
//!
//! Mirrors the shape of a real RVTools vInfo sheet: grouped memory figures,
//! the long "OS according to the configuration file" header and a handful of
//! columns the analysis ignores.

use crate::error::Result;
use crate::util::format_int;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::io::Write;

const DEPARTMENTS: [&str; 5] = ["PROD", "DEV", "STAGING", "APP", "DB"];
const CPU_OPTIONS: [u32; 5] = [2, 4, 8, 16, 32];
const RAM_OPTIONS_MIB: [u64; 6] = [2048, 4096, 8192, 16384, 32768, 65536];
const DISK_OPTIONS_GIB: [u64; 5] = [40, 80, 100, 250, 500];
const OS_OPTIONS: [&str; 7] = [
    "Red Hat Enterprise Linux 7 (64-bit)",
    "Red Hat Enterprise Linux 8 (64-bit)",
    "Microsoft Windows Server 2019 (64-bit)",
    "Microsoft Windows Server 2022 (64-bit)",
    "Ubuntu Linux (64-bit)",
    "Oracle Linux 7 (64-bit)",
    "CentOS 7 (64-bit)",
];

const HEADERS: [&str; 11] = [
    "VM",
    "Powerstate",
    "CPUs",
    "Memory",
    "Total disk capacity MiB",
    "OS according to the configuration file",
    "DNS Name",
    "Connection state",
    "Guest state",
    "Datacenter",
    "Cluster",
];

// Field order must follow HEADERS; rows are written without serde headers.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "VM")]
    vm: String,
    #[serde(rename = "Powerstate")]
    powerstate: &'static str,
    #[serde(rename = "CPUs")]
    cpus: u32,
    #[serde(rename = "Memory")]
    memory: String,
    #[serde(rename = "Total disk capacity MiB")]
    disk_mib: String,
    #[serde(rename = "OS according to the configuration file")]
    os: &'static str,
    #[serde(rename = "DNS Name")]
    dns_name: String,
    #[serde(rename = "Connection state")]
    connection_state: &'static str,
    #[serde(rename = "Guest state")]
    guest_state: &'static str,
    #[serde(rename = "Datacenter")]
    datacenter: &'static str,
    #[serde(rename = "Cluster")]
    cluster: &'static str,
}

/// Write `count` synthetic VMs as CSV. The same seed always yields the same file.
pub fn write_sample<W: Write>(out: W, count: usize, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    // Written up front so an empty sample is still a loadable export.
    wtr.write_record(HEADERS)?;
    for i in 0..count {
        let dept = *pick(&DEPARTMENTS, &mut rng);
        let vm = format!("VM-{}-{:04}", dept, 1000 + i);
        let powered_on = rng.random_bool(0.9);
        let row = SampleRow {
            dns_name: format!("{}.internal.corp", vm.to_lowercase()),
            vm,
            powerstate: if powered_on { "poweredOn" } else { "poweredOff" },
            cpus: *pick(&CPU_OPTIONS, &mut rng),
            memory: format_int(*pick(&RAM_OPTIONS_MIB, &mut rng)),
            disk_mib: format_int(*pick(&DISK_OPTIONS_GIB, &mut rng) * 1024),
            os: *pick(&OS_OPTIONS, &mut rng),
            connection_state: "connected",
            guest_state: if powered_on { "running" } else { "notRunning" },
            datacenter: "Datacenter-01",
            cluster: "Cluster-A",
        };
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn pick<'a, T>(options: &'a [T], rng: &mut StdRng) -> &'a T {
    // Option lists are non-empty constants.
    options.choose(rng).unwrap_or(&options[0])
}
