use std::fmt;
use std::time::Duration;

/// Summary of a set of solving times, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStatistics {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
}

impl TimeStatistics {
    pub fn new(times: &[Duration]) -> Self {
        let mut millis = times
            .iter()
            .map(|time| time.as_secs_f64() * 1000.0)
            .collect::<Vec<_>>();
        millis.sort_by(f64::total_cmp);

        let count = millis.len();
        let total = millis.iter().sum::<f64>();
        let mean = if count == 0 { 0.0 } else { total / count as f64 };
        let median = match count {
            0 => 0.0,
            count if count % 2 == 1 => millis[count / 2],
            count => (millis[count / 2 - 1] + millis[count / 2]) / 2.0,
        };
        // Sample variance
        let variance = if count < 2 {
            0.0
        } else {
            millis.iter().map(|time| (time - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        };

        Self {
            count,
            total,
            mean,
            median,
            variance,
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl fmt::Display for TimeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Time Statistics (ms) over {} runs", self.count)?;
        writeln!(f, "      time tot =   {:.3}", self.total)?;
        writeln!(f, "      time avg =   {:.3}", self.mean)?;
        writeln!(f, "      time med =   {:.3}", self.median)?;
        writeln!(f, "      time std =   {:.3}", self.standard_deviation())?;
        write!(f, "      time var =   {:.3}", self.variance)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TimeStatistics;

    #[test]
    fn statistics() {
        let times = [4, 1, 3, 2]
            .iter()
            .map(|&millis| Duration::from_millis(millis))
            .collect::<Vec<_>>();
        let statistics = TimeStatistics::new(&times);
        assert_eq!(statistics.count, 4);
        assert!((statistics.total - 10.0).abs() < 1e-9);
        assert!((statistics.mean - 2.5).abs() < 1e-9);
        assert!((statistics.median - 2.5).abs() < 1e-9);
        assert!((statistics.variance - 5.0 / 3.0).abs() < 1e-9);

        let odd = TimeStatistics::new(&times[..3]);
        assert!((odd.median - 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_times() {
        let statistics = TimeStatistics::new(&[]);
        assert_eq!(statistics.count, 0);
        assert_eq!(statistics.mean, 0.0);
        assert_eq!(statistics.standard_deviation(), 0.0);
    }
}
