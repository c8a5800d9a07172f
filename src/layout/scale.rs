use serde::Serialize;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;
const NICE_MAX_PASSES: usize = 10;

/// Linear map from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Extends the domain outward to multiples of the tick step.
    ///
    /// Repeats until the step stops changing, since widening the domain can
    /// move it to the next step size.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        if !(start.is_finite() && stop.is_finite()) || start == stop || count == 0 {
            return self;
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut previous: Option<f64> = None;
        for _ in 0..NICE_MAX_PASSES {
            let step = tick_increment(start, stop, count as f64);
            if previous == Some(step) {
                self.domain = if reversed { (stop, start) } else { (start, stop) };
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }

    /// Distance between adjacent ticks, in domain units.
    pub fn tick_step(&self, count: usize) -> f64 {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        if lo == hi || count == 0 {
            return 0.0;
        }
        let inc = tick_increment(lo, hi, count as f64);
        if inc < 0.0 { -1.0 / inc } else { inc }
    }
}

/// Returns `(i1, i2, inc)`; a negative `inc` encodes a step of `1 / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

pub(crate) fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

pub(crate) fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reversed = stop < start;
    let (lo, hi) = if reversed { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reversed {
        out.reverse();
    }
    out
}

/// Default numeric tick label: grouped thousands, decimals from the step.
pub fn format_number_tick(value: f64, step: f64) -> String {
    let precision = decimals_for_step(step);
    let body = group_thousands(&format!("{:.*}", precision, value.abs()));
    with_sign(value, precision, body)
}

/// Currency tick label with two decimals, e.g. `$2.25`.
pub fn format_currency_tick(value: f64) -> String {
    let body = format!("${:.2}", value.abs());
    with_sign(value, 2, body)
}

fn with_sign(value: f64, precision: usize, body: String) -> String {
    let rounded_zero = format!("{:.*}", precision, value.abs())
        .chars()
        .all(|c| c == '0' || c == '.');
    if value < 0.0 && !rounded_zero {
        format!("\u{2212}{body}")
    } else {
        body
    }
}

fn decimals_for_step(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 0;
    }
    let exponent = step.log10().floor() as i32;
    (-exponent).max(0) as usize
}

fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_domain_onto_range() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_relative_eq!(scale.apply(2.5), 25.0);
        let inverted = LinearScale::new((0.0, 10.0), (500.0, 0.0));
        assert_relative_eq!(inverted.apply(10.0), 0.0);
        assert_relative_eq!(inverted.apply(0.0), 500.0);
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0)).nice(10);
        assert_eq!(scale.domain, (3.0, 3.0));
        assert_relative_eq!(scale.apply(3.0), 50.0);
    }

    #[test]
    fn nice_rounds_outward() {
        let scale = LinearScale::new((3675.0, 10067.0), (0.0, 750.0)).nice(10);
        assert_eq!(scale.domain, (3500.0, 10500.0));
        let gas = LinearScale::new((1.4, 3.31), (500.0, 0.0)).nice(10);
        assert_relative_eq!(gas.domain.0, 1.4, epsilon = 1e-9);
        assert_relative_eq!(gas.domain.1, 3.4, epsilon = 1e-9);
        let reversed = LinearScale::new((0.93, 0.02), (0.0, 1.0)).nice(10);
        assert_relative_eq!(reversed.domain.0, 1.0, epsilon = 1e-9);
        assert_relative_eq!(reversed.domain.1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn nice_keeps_domain_when_step_never_settles() {
        let scale = LinearScale::new((-1e308, 1e308), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain, (-1e308, 1e308));
    }

    #[test]
    fn ticks_cover_nice_domain() {
        let values = ticks(0.0, 1.0, 5.0);
        assert_eq!(values, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        let values = ticks(3500.0, 10500.0, 10.0);
        assert_eq!(values.first(), Some(&3500.0));
        assert_eq!(values.last(), Some(&10500.0));
        assert_eq!(values.len(), 15);
        assert_eq!(ticks(2.0, 2.0, 10.0), vec![2.0]);
    }

    #[test]
    fn formats_ticks() {
        assert_eq!(format_number_tick(3500.0, 500.0), "3,500");
        assert_eq!(format_number_tick(10500.0, 500.0), "10,500");
        assert_eq!(format_number_tick(0.25, 0.05), "0.25");
        assert_eq!(format_number_tick(-1200.0, 100.0), "\u{2212}1,200");
        assert_eq!(format_currency_tick(2.2), "$2.20");
        assert_eq!(format_currency_tick(-0.001), "$0.00");
    }

    #[test]
    fn tick_step_handles_fractional_steps() {
        let scale = LinearScale::new((1.4, 3.4), (0.0, 1.0));
        assert_relative_eq!(scale.tick_step(10), 0.2, epsilon = 1e-12);
    }
}
