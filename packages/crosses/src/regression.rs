//! Ordinary least-squares fit of end y against end x.

use traffic_map_crosses_models::RegressionLine;

/// Range the fitted line is sampled over, in pitch units.
pub const LINE_START: f64 = 50.0;
pub const LINE_END: f64 = 100.0;
pub const LINE_SAMPLES: usize = 50;

/// Fits `y = slope * x + intercept` by least squares.
///
/// Returns `None` for fewer than two points, mismatched lengths, or when
/// every x is the same (the slope is undefined).
#[must_use]
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<RegressionLine> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxx, sxy) = xs
        .iter()
        .zip(ys)
        .fold((0.0_f64, 0.0_f64), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (dx.mul_add(dx, sxx), dx.mul_add(y - mean_y, sxy))
        });
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);
    let predicted: Vec<f64> = xs.iter().map(|x| slope.mul_add(*x, intercept)).collect();

    Some(RegressionLine {
        slope,
        intercept,
        r2: r2_score(ys, &predicted),
        line: linspace(LINE_START, LINE_END, LINE_SAMPLES)
            .map(|x| (x, slope.mul_add(x, intercept)))
            .collect(),
    })
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// With zero variance in `actual` a perfect prediction scores 1.0 and
/// anything else 0.0.
#[must_use]
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// `samples` evenly spaced values from `start` to `end`, both included.
fn linspace(start: f64, end: f64, samples: usize) -> impl Iterator<Item = f64> {
    #[allow(clippy::cast_precision_loss)]
    let step = if samples > 1 {
        (end - start) / (samples - 1) as f64
    } else {
        0.0
    };
    (0..samples).map(move |i| {
        if i + 1 == samples && samples > 1 {
            end
        } else {
            #[allow(clippy::cast_precision_loss)]
            let offset = step * i as f64;
            start + offset
        }
    })
}
