//! CIE Standard Illuminants for T.42
//!
//! The illuminant registry used by the G3FAX illuminant record. Tristimulus
//! values are percent scale (Yn = 100) for the 2° and 10° observers.
//!
//! Only the 2° entries that T.42 assigns a code to carry a 4-byte tag; the
//! remaining entries are reachable by name only.

use crate::color::Xyz;

/// A standard illuminant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illuminant {
    /// T.42 illuminant code, if the standard defines one
    pub tag: Option<[u8; 4]>,
    /// Display name
    pub name: &'static str,
    /// X tristimulus (percent)
    pub xn: f64,
    /// Y tristimulus (percent)
    pub yn: f64,
    /// Z tristimulus (percent)
    pub zn: f64,
}

impl Illuminant {
    const fn tagged(tag: [u8; 4], name: &'static str, xn: f64, yn: f64, zn: f64) -> Self {
        Self {
            tag: Some(tag),
            name,
            xn,
            yn,
            zn,
        }
    }

    const fn untagged(name: &'static str, xn: f64, yn: f64, zn: f64) -> Self {
        Self {
            tag: None,
            name,
            xn,
            yn,
            zn,
        }
    }

    /// White point normalized so that Y = 1
    pub fn white_point(&self) -> Xyz {
        Xyz::new(self.xn / 100.0, self.yn / 100.0, self.zn / 100.0)
    }

    /// Name without the observer suffix, e.g. "D65" for "CIE D65/2°"
    fn short_name(&self) -> &'static str {
        let name = self.name.strip_prefix("CIE ").unwrap_or(self.name);
        name.split('/').next().unwrap_or(name)
    }

    fn is_two_degree(&self) -> bool {
        self.name.ends_with("/2°")
    }
}

/// All known illuminants, 2° observer first within each pair
pub static ILLUMINANTS: &[Illuminant] = &[
    Illuminant::tagged(*b"\0D50", "CIE D50/2°", 96.422, 100.000, 82.521),
    Illuminant::untagged("CIE D50/10°", 96.720, 100.000, 81.427),
    Illuminant::untagged("CIE D55/2°", 95.682, 100.000, 92.149),
    Illuminant::untagged("CIE D55/10°", 95.799, 100.000, 90.926),
    Illuminant::tagged(*b"\0D65", "CIE D65/2°", 95.047, 100.000, 108.883),
    Illuminant::untagged("CIE D65/10°", 94.811, 100.000, 107.304),
    Illuminant::tagged(*b"\0D75", "CIE D75/2°", 94.972, 100.000, 122.638),
    Illuminant::untagged("CIE D75/10°", 94.416, 100.000, 120.641),
    Illuminant::tagged(*b"\0\0F2", "F02/2°", 99.186, 100.000, 67.393),
    Illuminant::untagged("F02/10°", 103.279, 100.000, 69.027),
    Illuminant::tagged(*b"\0\0F7", "F07/2°", 95.041, 100.000, 108.747),
    Illuminant::untagged("F07/10°", 95.792, 100.000, 107.686),
    Illuminant::tagged(*b"\0F11", "F11/2°", 100.962, 100.000, 64.350),
    Illuminant::untagged("F11/10°", 103.863, 100.000, 65.607),
    Illuminant::tagged(*b"\0\0SA", "A/2°", 109.850, 100.000, 35.585),
    Illuminant::untagged("A/10°", 111.144, 100.000, 35.200),
    Illuminant::tagged(*b"\0\0SC", "C/2°", 98.074, 100.000, 118.232),
    Illuminant::untagged("C/10°", 97.285, 100.000, 116.145),
];

/// Find an illuminant by its exact 4-byte T.42 code
pub fn lookup_illuminant(tag: &[u8; 4]) -> Option<&'static Illuminant> {
    ILLUMINANTS.iter().find(|ill| ill.tag.as_ref() == Some(tag))
}

/// Find an illuminant by display name or short name
///
/// Short names ("D65", "F2", "A") select the 2° observer entry. Matching is
/// case-insensitive.
pub fn lookup_illuminant_by_name(name: &str) -> Option<&'static Illuminant> {
    let wanted = name.trim();
    ILLUMINANTS
        .iter()
        .find(|ill| ill.name.eq_ignore_ascii_case(wanted))
        .or_else(|| {
            ILLUMINANTS.iter().find(|ill| {
                ill.is_two_degree() && short_name_matches(ill.short_name(), wanted)
            })
        })
}

/// "F2" and "F02" name the same lamp
fn short_name_matches(short: &str, wanted: &str) -> bool {
    if short.eq_ignore_ascii_case(wanted) {
        return true;
    }
    match (short.strip_prefix('F'), wanted.strip_prefix(['F', 'f'])) {
        (Some(a), Some(b)) => a.trim_start_matches('0') == b.trim_start_matches('0'),
        _ => false,
    }
}
