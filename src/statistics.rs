use std::fmt;
use std::time::Duration;

/// Outcome counters for one simulation run.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub ticks: u64,
    pub crossings: usize,
    pub deaths: usize,
    pub planning_calls: usize,
    pub failed_plans: usize,
    pub moves: usize,
    pub waits: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Share of finished attempts that reached the far bank.
    pub fn success_rate(&self) -> f64 {
        let attempts = self.crossings + self.deaths;
        if attempts == 0 {
            0.0
        } else {
            self.crossings as f64 / attempts as f64
        }
    }

    /// Average ticks spent per successful crossing, if there was one.
    pub fn ticks_per_crossing(&self) -> Option<f64> {
        if self.crossings == 0 {
            None
        } else {
            Some(self.ticks as f64 / self.crossings as f64)
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticks simulated: {}", self.ticks)?;
        writeln!(f, "Crossings: {}", self.crossings)?;
        writeln!(f, "Deaths: {}", self.deaths)?;
        writeln!(f, "Success rate: {:.1}%", self.success_rate() * 100.0)?;
        writeln!(f, "Planning calls: {}", self.planning_calls)?;
        writeln!(f, "Failed plans (held position): {}", self.failed_plans)?;
        writeln!(f, "Moves: {} | Waits: {}", self.moves, self.waits)?;
        if let Some(ticks) = self.ticks_per_crossing() {
            writeln!(f, "Ticks per crossing: {:.1}", ticks)?;
        }
        Ok(())
    }
}

/// Wall-clock duration of every planning call, in call order.
#[derive(Debug, Clone, Default)]
pub struct TimingData {
    pub plan_times: Vec<Duration>,
}

impl TimingData {
    pub fn new() -> Self {
        TimingData::default()
    }

    /// Mean planning time; zero when nothing was planned.
    pub fn average_plan_time(&self) -> Duration {
        if self.plan_times.is_empty() {
            Duration::from_nanos(0)
        } else {
            let total: Duration = self.plan_times.iter().sum();
            total / self.plan_times.len() as u32
        }
    }

    pub fn max_plan_time(&self) -> Duration {
        self.plan_times.iter().max().copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.plan_times.len()
    }
}

impl fmt::Display for TimingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total planning calls: {}", self.total_calls())?;
        writeln!(f, "Average plan time: {:.2?}", self.average_plan_time())?;
        writeln!(f, "Slowest plan: {:.2?}", self.max_plan_time())
    }
}
