//! Accuracy measurement
//!
//! Two views of a conversion error:
//! - per-channel code differences, for ITU Lab and sRGB byte buffers
//! - CIEDE2000 between sRGB buffers, with Lab taken from `palette` so the
//!   reference never shares code with the engine under test

use palette::color_difference::Ciede2000;
use palette::white_point::D65;
use palette::{FromColor, Lab, Srgb};

/// Statistics from a deltaE comparison
#[derive(Debug, Clone)]
pub struct DeltaEStats {
    /// Mean deltaE across all samples
    pub mean: f64,
    /// Maximum deltaE
    pub max: f64,
    /// 95th percentile deltaE
    pub p95: f64,
    /// Number of samples
    pub count: usize,
}

impl DeltaEStats {
    /// Check if all differences are imperceptible (deltaE < 1.0)
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    /// Check if differences are barely perceptible (deltaE < 2.0)
    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }

    /// Check if differences are acceptable (deltaE < 3.5)
    pub fn is_acceptable(&self) -> bool {
        self.max < 3.5
    }
}

/// Per-channel byte differences between two interleaved buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeDiffStats {
    /// Largest absolute difference on any channel
    pub max: u8,
    /// Pixels with at least one differing channel
    pub differing: usize,
    /// Number of pixels compared
    pub count: usize,
}

/// Reference CIELAB (D65, 2°) for an 8-bit sRGB pixel, computed by `palette`
pub fn reference_lab(rgb: [u8; 3]) -> [f64; 3] {
    let srgb = Srgb::<u8>::new(rgb[0], rgb[1], rgb[2]).into_format::<f64>();
    let lab: Lab<D65, f64> = Lab::from_color(srgb);
    [lab.l, lab.a, lab.b]
}

/// CIEDE2000 between two Lab colours
pub fn delta_e_2000(lab1: [f64; 3], lab2: [f64; 3]) -> f64 {
    let a = Lab::<D65, f64>::new(lab1[0], lab1[1], lab1[2]);
    let b = Lab::<D65, f64>::new(lab2[0], lab2[1], lab2[2]);
    a.difference(b)
}

/// Compare two RGB pixel buffers and compute deltaE statistics
pub fn compare_rgb_buffers(reference: &[u8], result: &[u8]) -> DeltaEStats {
    assert_eq!(reference.len(), result.len());
    assert_eq!(reference.len() % 3, 0);

    let mut delta_es: Vec<f64> = reference
        .chunks_exact(3)
        .zip(result.chunks_exact(3))
        .map(|(r, o)| {
            delta_e_2000(
                reference_lab([r[0], r[1], r[2]]),
                reference_lab([o[0], o[1], o[2]]),
            )
        })
        .collect();

    delta_es.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = delta_es.len();
    let mean = if count == 0 {
        0.0
    } else {
        delta_es.iter().sum::<f64>() / count as f64
    };
    let max = delta_es.last().copied().unwrap_or(0.0);
    let p95 = delta_es
        .get((count as f64 * 0.95) as usize)
        .copied()
        .unwrap_or(max);

    DeltaEStats {
        mean,
        max,
        p95,
        count,
    }
}

/// Compare two interleaved 3-channel byte buffers channel by channel
pub fn compare_codes(expected: &[u8], actual: &[u8]) -> CodeDiffStats {
    assert_eq!(expected.len(), actual.len());
    assert_eq!(expected.len() % 3, 0);

    let mut stats = CodeDiffStats::default();
    for (e, a) in expected.chunks_exact(3).zip(actual.chunks_exact(3)) {
        let worst = e.iter().zip(a).map(|(x, y)| x.abs_diff(*y)).max().unwrap_or(0);
        stats.max = stats.max.max(worst);
        if worst > 0 {
            stats.differing += 1;
        }
        stats.count += 1;
    }
    stats
}
