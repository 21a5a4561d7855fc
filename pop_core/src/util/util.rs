/*
This file is part of the Population Calculator
Copyright (C) 2022 Novel-T

The Population Calculator is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::time::{Duration, Instant};

use log::info;

pub fn format_duration(d: Duration) -> String {
    let mut secs = d.as_secs();
    let hours = secs / 3600;
    secs = secs % 3600;
    let minutes = secs / 60;
    secs = secs % 60;

    let ms = d.as_millis() % 1000;

    format!("{}h {}m {}s {}ms", hours, minutes, secs, ms)
}

pub fn log_remaining_time(now: &Instant, num_processed: u32, num_total: u32) {
    let d = now.elapsed();
    let time_per_result = if num_processed == 0 {
        d
    } else {
        d / num_processed
    };
    let est_remaining_time = time_per_result * num_total.saturating_sub(num_processed);
    info!("Through {} of {}. Elapsed: {} Est. Remaining: {}",
          num_processed, num_total,
          format_duration(d),
          format_duration(est_remaining_time));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(3_723_045)), "1h 2m 3s 45ms");
        assert_eq!(format_duration(Duration::from_millis(0)), "0h 0m 0s 0ms");
    }
}
