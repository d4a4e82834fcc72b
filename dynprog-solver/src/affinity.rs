//! Best-effort pinning of workers to execution units
//!
//! Workers are spread over physical cores before hyper-threads are reused:
//! the preference order lists one logical CPU per physical core (cores on the
//! calling process's first socket first), followed by the remaining logical
//! CPUs. Pinning is only implemented on Linux; everywhere else, and whenever
//! the kernel refuses, workers simply run unpinned.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use std::thread;

use tracing::{debug, warn};

/// Whether solver workers get pinned to a preferred CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AffinityPolicy {
    /// Pin worker `w` to `preference_order()[w % len]`
    #[default]
    Preferred,
    /// Leave scheduling to the OS
    Disabled,
}

impl AffinityPolicy {
    /// CPU that worker `worker` should run on, if any.
    pub fn cpu_for(&self, worker: usize) -> Option<usize> {
        match self {
            Self::Disabled => None,
            Self::Preferred => {
                let order = CpuTopology::current().preference_order();
                (!order.is_empty()).then(|| order[worker % order.len()])
            }
        }
    }

    /// Pins the calling thread as worker `worker`.
    ///
    /// The returned guard restores the previous affinity mask when dropped.
    /// `None` means the thread stays unpinned.
    pub fn pin_worker(&self, worker: usize) -> Option<PinGuard> {
        let cpu = self.cpu_for(worker)?;
        pin_current_thread(cpu)
    }
}

/// Location of one logical CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuInfo {
    /// Logical CPU id as used by the scheduler
    pub id: usize,
    /// Physical package (socket)
    pub socket: usize,
    /// Physical core id within the socket
    pub core: usize,
}

/// Logical CPUs this process may run on, with their socket/core layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuTopology {
    cpus: Vec<CpuInfo>,
    order: Vec<usize>,
}

impl CpuTopology {
    /// Builds a topology from an explicit CPU list.
    pub fn from_cpus(mut cpus: Vec<CpuInfo>) -> Self {
        cpus.sort_by_key(|cpu| cpu.id);
        cpus.dedup_by_key(|cpu| cpu.id);
        let order = preference_order(&cpus);
        Self { cpus, order }
    }

    /// One core per logical CPU on a single socket.
    pub fn flat(count: usize) -> Self {
        Self::from_cpus(
            (0..count)
                .map(|id| CpuInfo {
                    id,
                    socket: 0,
                    core: id,
                })
                .collect(),
        )
    }

    /// Probes the machine. Falls back to a flat layout sized by
    /// [`thread::available_parallelism`] when the platform tells us nothing.
    pub fn detect() -> Self {
        match sys::allowed_cpus() {
            Some(cpus) if !cpus.is_empty() => Self::from_cpus(cpus),
            _ => {
                let count = thread::available_parallelism().map_or(1, |n| n.get());
                debug!(count, "cpu topology unavailable, assuming flat layout");
                Self::flat(count)
            }
        }
    }

    /// Process-wide topology, probed once.
    pub fn current() -> &'static CpuTopology {
        static TOPOLOGY: OnceLock<CpuTopology> = OnceLock::new();
        TOPOLOGY.get_or_init(Self::detect)
    }

    pub fn cpus(&self) -> &[CpuInfo] {
        &self.cpus
    }

    pub fn logical_cpus(&self) -> usize {
        self.cpus.len()
    }

    /// Number of distinct (socket, core) pairs
    pub fn physical_cores(&self) -> usize {
        self.cpus
            .iter()
            .map(|cpu| (cpu.socket, cpu.core))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn sockets(&self) -> usize {
        self.cpus
            .iter()
            .map(|cpu| cpu.socket)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Logical CPU ids in the order workers should occupy them.
    pub fn preference_order(&self) -> &[usize] {
        &self.order
    }
}

fn preference_order(cpus: &[CpuInfo]) -> Vec<usize> {
    let home = cpus.first().map(|cpu| cpu.socket);
    let rank = |cpu: &CpuInfo| (Some(cpu.socket) != home, cpu.socket, cpu.id);

    let mut seen = HashSet::new();
    let (mut primaries, mut siblings): (Vec<CpuInfo>, Vec<CpuInfo>) = cpus
        .iter()
        .copied()
        .partition(|cpu| seen.insert((cpu.socket, cpu.core)));
    primaries.sort_by_key(rank);
    siblings.sort_by_key(rank);

    primaries
        .into_iter()
        .chain(siblings)
        .map(|cpu| cpu.id)
        .collect()
}

/// Restores the thread's previous affinity mask on drop.
pub struct PinGuard {
    cpu: usize,
    #[cfg(target_os = "linux")]
    previous: libc::cpu_set_t,
}

impl PinGuard {
    /// CPU the thread is pinned to
    pub fn cpu(&self) -> usize {
        self.cpu
    }
}

impl fmt::Debug for PinGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinGuard").field("cpu", &self.cpu).finish()
    }
}

impl Drop for PinGuard {
    fn drop(&mut self) {
        if !sys::restore(self) {
            debug!(cpu = self.cpu, "could not restore previous affinity mask");
        }
    }
}

/// Pins the calling thread to `cpu`.
///
/// Returns `None` (and logs) when pinning is unsupported or refused.
pub fn pin_current_thread(cpu: usize) -> Option<PinGuard> {
    match sys::pin(cpu) {
        Ok(guard) => Some(guard),
        Err(reason) => {
            warn!(cpu, reason, "running unpinned");
            None
        }
    }
}

#[cfg(target_os = "linux")]
mod sys {
    use std::fs;
    use std::mem;

    use super::{CpuInfo, PinGuard};

    fn read_id(cpu: usize, name: &str) -> Option<usize> {
        let path = format!("/sys/devices/system/cpu/cpu{cpu}/topology/{name}");
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }

    fn current_mask() -> Option<libc::cpu_set_t> {
        let mut set: libc::cpu_set_t = unsafe { mem::zeroed() };
        let rc = unsafe { libc::sched_getaffinity(0, mem::size_of::<libc::cpu_set_t>(), &mut set) };
        (rc == 0).then_some(set)
    }

    fn set_mask(set: &libc::cpu_set_t) -> bool {
        unsafe { libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), set) == 0 }
    }

    pub(super) fn restore(guard: &PinGuard) -> bool {
        set_mask(&guard.previous)
    }

    pub(super) fn allowed_cpus() -> Option<Vec<CpuInfo>> {
        let set = current_mask()?;
        let cpus = (0..libc::CPU_SETSIZE as usize)
            .filter(|&id| unsafe { libc::CPU_ISSET(id, &set) })
            .map(|id| CpuInfo {
                id,
                socket: read_id(id, "physical_package_id").unwrap_or(0),
                core: read_id(id, "core_id").unwrap_or(id),
            })
            .collect();
        Some(cpus)
    }

    pub(super) fn pin(cpu: usize) -> Result<PinGuard, &'static str> {
        if cpu >= libc::CPU_SETSIZE as usize {
            return Err("cpu id beyond CPU_SETSIZE");
        }
        let previous = current_mask().ok_or("sched_getaffinity failed")?;

        let mut set: libc::cpu_set_t = unsafe { mem::zeroed() };
        unsafe { libc::CPU_SET(cpu, &mut set) };
        if !set_mask(&set) {
            return Err("sched_setaffinity failed");
        }
        Ok(PinGuard { cpu, previous })
    }
}

#[cfg(not(target_os = "linux"))]
mod sys {
    use super::{CpuInfo, PinGuard};

    pub(super) fn allowed_cpus() -> Option<Vec<CpuInfo>> {
        None
    }

    pub(super) fn pin(_cpu: usize) -> Result<PinGuard, &'static str> {
        Err("thread affinity is not supported on this platform")
    }

    pub(super) fn restore(_guard: &PinGuard) -> bool {
        true
    }
}
